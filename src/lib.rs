// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod notify;
pub mod ondemand;
pub mod pipeline;
pub mod policy;
pub mod reading;
pub mod registration;
pub mod store;
pub mod weather;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::error::{AlertError, Result};
pub use crate::policy::{AlertDecision, AlertPolicy};
pub use crate::reading::{Reading, Subscription};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing for every binary. `RUST_LOG` wins over `default_filter`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
