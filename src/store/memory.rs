use std::sync::Mutex;

use crate::error::{AlertError, Result};
use crate::reading::{Reading, Subscription};
use crate::store::{same_subscription, ReadingStore, SubscriberDirectory};

/// In-process reading log; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    inner: Mutex<Vec<Reading>>,
}

impl MemoryReadingStore {
    pub fn len(&self) -> usize {
        self.inner.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn append(&self, reading: &Reading) -> Result<()> {
        let mut v = self
            .inner
            .lock()
            .map_err(|_| AlertError::Persistence("reading store mutex poisoned".into()))?;
        v.push(reading.clone());
        Ok(())
    }

    async fn readings(&self) -> Result<Vec<Reading>> {
        let v = self
            .inner
            .lock()
            .map_err(|_| AlertError::Persistence("reading store mutex poisoned".into()))?;
        Ok(v.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemorySubscriberDirectory {
    inner: Mutex<Vec<Subscription>>,
}

impl MemorySubscriberDirectory {
    pub fn with_subscriptions(subs: Vec<Subscription>) -> Self {
        Self {
            inner: Mutex::new(subs),
        }
    }
}

#[async_trait::async_trait]
impl SubscriberDirectory for MemorySubscriberDirectory {
    async fn all(&self) -> Result<Vec<Subscription>> {
        let v = self
            .inner
            .lock()
            .map_err(|_| AlertError::Persistence("subscriber mutex poisoned".into()))?;
        Ok(v.clone())
    }

    async fn add(&self, sub: Subscription) -> Result<bool> {
        let mut v = self
            .inner
            .lock()
            .map_err(|_| AlertError::Persistence("subscriber mutex poisoned".into()))?;
        if v.iter().any(|s| same_subscription(s, &sub)) {
            return Ok(false);
        }
        v.push(sub);
        Ok(true)
    }
}
