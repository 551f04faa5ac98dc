// src/error.rs
//! Failure taxonomy shared by the adapter, stores, channels and the two entry
//! points (batch + on-demand).

/// Everything that can go wrong while checking weather or registering a contact.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// Upstream answered with a non-success status.
    #[error("weather provider returned HTTP {status}: {body}")]
    Fetch { status: u16, body: String },

    /// No upstream status at all (DNS, refused connection, TLS).
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Parse(String),

    #[error("store write rejected: {0}")]
    Persistence(String),

    #[error("subscribe rejected: {0}")]
    Subscription(String),

    #[error("notification publish failed: {0}")]
    Notify(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AlertError {
    /// Only an upstream non-success status is skippable inside a batch run.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, AlertError::Fetch { .. })
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
