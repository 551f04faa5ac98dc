//! Registration: enrol a contact on the broadcast channel, then record the
//! (contact, location) pair for the batch run.

use serde::{Deserialize, Serialize};

use crate::error::{AlertError, Result};
use crate::notify::DynChannel;
use crate::reading::Subscription;
use crate::store::DynSubscriberDirectory;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub contact: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub contact: String,
    pub location: String,
    /// `false` when this exact pair was already on file.
    pub created: bool,
}

pub struct Registrar {
    channel: DynChannel,
    directory: DynSubscriberDirectory,
}

impl Registrar {
    pub fn new(channel: DynChannel, directory: DynSubscriberDirectory) -> Self {
        Self { channel, directory }
    }

    pub async fn register(&self, contact: &str, location: &str) -> Result<RegistrationOutcome> {
        let contact = contact.trim();
        let location = location.trim();
        if contact.is_empty() || location.is_empty() {
            return Err(AlertError::InvalidInput(
                "Please enter both email and city.".into(),
            ));
        }

        // The channel enrolment comes first; nothing is recorded if it is refused.
        self.channel.subscribe(contact).await?;
        let created = self
            .directory
            .add(Subscription::new(contact, location))
            .await?;

        tracing::info!(contact, city = location, created, channel = self.channel.name(), "contact registered");
        Ok(RegistrationOutcome {
            contact: contact.to_string(),
            location: location.to_string(),
            created,
        })
    }
}
