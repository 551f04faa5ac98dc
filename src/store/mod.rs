// src/store/mod.rs
//! Durable stores: an append-only reading log and the subscriber directory.

pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::config::{StoreConfig, StoreKind};
use crate::error::Result;
use crate::reading::{Reading, Subscription};

pub use file::{FileReadingStore, FileSubscriberDirectory};
pub use memory::{MemoryReadingStore, MemorySubscriberDirectory};

/// Append-only. Identity is (location, timestamp); nothing is updated or deleted.
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    async fn append(&self, reading: &Reading) -> Result<()>;
    /// Diagnostics/tests only; the alert flow never reads back.
    async fn readings(&self) -> Result<Vec<Reading>>;
}

#[async_trait::async_trait]
pub trait SubscriberDirectory: Send + Sync {
    async fn all(&self) -> Result<Vec<Subscription>>;
    /// Returns `false` when the same (contact, location) pair already exists.
    async fn add(&self, sub: Subscription) -> Result<bool>;
}

/// Same contact + same location, ignoring case and surrounding whitespace.
pub fn same_subscription(a: &Subscription, b: &Subscription) -> bool {
    a.contact.trim().eq_ignore_ascii_case(b.contact.trim())
        && a.location.trim().eq_ignore_ascii_case(b.location.trim())
}

pub type DynReadingStore = Arc<dyn ReadingStore>;
pub type DynSubscriberDirectory = Arc<dyn SubscriberDirectory>;

/// Build both stores for a deployment.
pub fn build_stores(cfg: &StoreConfig) -> (DynReadingStore, DynSubscriberDirectory) {
    match cfg.kind {
        StoreKind::File => (
            Arc::new(FileReadingStore::new(&cfg.readings_path)),
            Arc::new(FileSubscriberDirectory::new(&cfg.subscriptions_path)),
        ),
        StoreKind::Memory => (
            Arc::new(MemoryReadingStore::default()),
            Arc::new(MemorySubscriberDirectory::default()),
        ),
    }
}
