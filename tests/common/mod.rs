//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use axum::Router;
use rust_decimal::Decimal;

use weather_alerts::error::{AlertError, Result};
use weather_alerts::notify::BroadcastChannel;
use weather_alerts::pipeline::Pipeline;
use weather_alerts::policy::AlertPolicy;
use weather_alerts::reading::{RawObservation, Reading};
use weather_alerts::store::{MemoryReadingStore, ReadingStore};
use weather_alerts::weather::WeatherSource;

/// Canned provider answer for one city.
#[derive(Clone, Debug)]
pub enum Canned {
    Ok { temp: &'static str, description: &'static str },
    Status(u16, &'static str),
    Garbled,
}

/// Weather source answering from a fixed table; unknown cities get a 404.
#[derive(Default)]
pub struct StubSource {
    table: HashMap<String, Canned>,
    pub calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, city: &str, canned: Canned) -> Self {
        self.table.insert(city.to_string(), canned);
        self
    }

    pub fn ok(self, city: &str, temp: &'static str, description: &'static str) -> Self {
        self.with(city, Canned::Ok { temp, description })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl WeatherSource for StubSource {
    async fn current(&self, location: &str) -> Result<RawObservation> {
        self.calls.lock().unwrap().push(location.to_string());
        match self.table.get(location) {
            Some(Canned::Ok { temp, description }) => Ok(RawObservation::new(
                Decimal::from_str(temp).unwrap(),
                *description,
            )),
            Some(Canned::Status(status, body)) => Err(AlertError::Fetch {
                status: *status,
                body: body.to_string(),
            }),
            Some(Canned::Garbled) => Err(AlertError::Parse("garbled payload".into())),
            None => Err(AlertError::Fetch {
                status: 404,
                body: r#"{"cod":"404","message":"city not found"}"#.into(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Channel that remembers everything it was asked to do.
#[derive(Default)]
pub struct RecordingChannel {
    pub published: Mutex<Vec<(String, String)>>,
    pub subscribed: Mutex<Vec<String>>,
    pub reject_subscribe: bool,
    pub fail_publish: bool,
}

impl RecordingChannel {
    pub fn rejecting_subscribe() -> Self {
        Self {
            reject_subscribe: true,
            ..Self::default()
        }
    }

    pub fn failing_publish() -> Self {
        Self {
            fail_publish: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn subscribed(&self) -> Vec<String> {
        self.subscribed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BroadcastChannel for RecordingChannel {
    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        if self.fail_publish {
            return Err(AlertError::Notify("channel down".into()));
        }
        self.published
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }

    async fn subscribe(&self, contact: &str) -> Result<()> {
        if self.reject_subscribe {
            return Err(AlertError::Subscription(format!("{contact} is not a valid endpoint")));
        }
        self.subscribed.lock().unwrap().push(contact.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Reading store that rejects every write.
pub struct FailingStore;

#[async_trait::async_trait]
impl ReadingStore for FailingStore {
    async fn append(&self, _reading: &Reading) -> Result<()> {
        Err(AlertError::Persistence("table is read-only".into()))
    }

    async fn readings(&self) -> Result<Vec<Reading>> {
        Ok(Vec::new())
    }
}

/// Handles kept by the test so it can inspect side effects.
pub struct Harness {
    pub source: Arc<StubSource>,
    pub store: Arc<MemoryReadingStore>,
    pub channel: Arc<RecordingChannel>,
    pub pipeline: Pipeline,
}

pub fn harness(source: StubSource) -> Harness {
    harness_with_channel(source, RecordingChannel::default())
}

pub fn harness_with_channel(source: StubSource, channel: RecordingChannel) -> Harness {
    let source = Arc::new(source);
    let store = Arc::new(MemoryReadingStore::default());
    let channel = Arc::new(channel);
    let pipeline = Pipeline::new(
        source.clone(),
        store.clone(),
        channel.clone(),
        AlertPolicy::default(),
    );
    Harness {
        source,
        store,
        channel,
        pipeline,
    }
}

/// Serve `router` on an ephemeral localhost port; returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}
