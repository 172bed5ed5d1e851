//! Identity-provider lifecycle events.
//!
//! A verified webhook body is decoded exactly once into an [`IdentityEvent`];
//! everything downstream matches on the variant instead of re-reading JSON.

use serde::Deserialize;
use serde_json::Value;

use super::{ContactDetails, UserId, UserValidationError};

/// Event type emitted when the provider registers a user.
pub const USER_CREATED: &str = "user.created";
/// Event type emitted when a user's provider profile changes.
pub const USER_UPDATED: &str = "user.updated";
/// Event type emitted when the provider deletes a user.
pub const USER_DELETED: &str = "user.deleted";

/// Failures decoding a verified webhook body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventDecodeError {
    #[error("body is not an event envelope: {reason}")]
    Envelope { reason: String },
    #[error("`{event_type}` payload is malformed: {reason}")]
    Payload { event_type: String, reason: String },
    #[error("`{event_type}` carries an invalid user id: {source}")]
    UserId {
        event_type: String,
        #[source]
        source: UserValidationError,
    },
}

/// Phone number entry as published by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhoneNumberEntry {
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Email address entry as published by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmailAddressEntry {
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Return the value carried by the first entry of an optional list.
///
/// Absent when the list is missing, empty, or its first entry has no value.
/// Later entries are never consulted, even when the first is empty.
///
/// # Examples
/// ```
/// use kontaktar_backend::domain::identity_events::{first_or_absent, EmailAddressEntry};
///
/// let entries = vec![EmailAddressEntry { email_address: Some("a@b.is".into()) }];
/// assert_eq!(
///     first_or_absent(Some(entries.as_slice()), |e| e.email_address.as_deref()),
///     Some("a@b.is".to_owned())
/// );
///
/// let empty: Vec<EmailAddressEntry> = Vec::new();
/// assert_eq!(first_or_absent(Some(empty.as_slice()), |e| e.email_address.as_deref()), None);
/// ```
pub fn first_or_absent<T, F>(entries: Option<&[T]>, value: F) -> Option<String>
where
    F: FnOnce(&T) -> Option<&str>,
{
    entries
        .and_then(<[T]>::first)
        .and_then(value)
        .map(str::to_owned)
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    #[serde(default)]
    phone_numbers: Option<Vec<PhoneNumberEntry>>,
    #[serde(default)]
    email_addresses: Option<Vec<EmailAddressEntry>>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeletedData {
    #[serde(default)]
    id: Option<String>,
}

/// The provider's view of a user: identity plus contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    id: UserId,
    contact: ContactDetails,
}

impl ProviderUser {
    #[must_use]
    pub fn new(id: UserId, contact: ContactDetails) -> Self {
        Self { id, contact }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    fn from_data(event_type: &str, data: Value) -> Result<Self, EventDecodeError> {
        let data: UserData =
            serde_json::from_value(data).map_err(|err| EventDecodeError::Payload {
                event_type: event_type.to_owned(),
                reason: err.to_string(),
            })?;
        let id = parse_id(event_type, data.id)?;
        let contact = ContactDetails::new(
            first_or_absent(data.phone_numbers.as_deref(), |entry| {
                entry.phone_number.as_deref()
            }),
            first_or_absent(data.email_addresses.as_deref(), |entry| {
                entry.email_address.as_deref()
            }),
            data.username,
        );
        Ok(Self { id, contact })
    }
}

fn parse_id(event_type: &str, raw: String) -> Result<UserId, EventDecodeError> {
    UserId::new(raw).map_err(|source| EventDecodeError::UserId {
        event_type: event_type.to_owned(),
        source,
    })
}

/// A decoded identity-provider event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    Created(ProviderUser),
    Updated(ProviderUser),
    /// The provider may omit the id of a deleted object.
    Deleted { id: Option<UserId> },
    /// Any event type this service does not act on.
    Unknown(String),
}

impl IdentityEvent {
    /// Decode a webhook body.
    ///
    /// # Errors
    /// Fails when the body is not an object with a string `type`, or when a
    /// create or update lacks a valid `data.id`. Deletions and unknown event
    /// types always decode; a deletion with an unusable id carries `None`.
    pub fn decode(body: &[u8]) -> Result<Self, EventDecodeError> {
        let EventEnvelope { event_type, data } =
            serde_json::from_slice(body).map_err(|err| EventDecodeError::Envelope {
                reason: err.to_string(),
            })?;

        match event_type.as_str() {
            USER_CREATED => ProviderUser::from_data(USER_CREATED, data).map(Self::Created),
            USER_UPDATED => ProviderUser::from_data(USER_UPDATED, data).map(Self::Updated),
            USER_DELETED => {
                let id = serde_json::from_value::<DeletedData>(data)
                    .ok()
                    .and_then(|deleted| deleted.id)
                    .and_then(|raw| UserId::new(raw).ok());
                Ok(Self::Deleted { id })
            }
            other => Ok(Self::Unknown(other.to_owned())),
        }
    }

    /// Provider event type string.
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::Created(_) => USER_CREATED,
            Self::Updated(_) => USER_UPDATED,
            Self::Deleted { .. } => USER_DELETED,
            Self::Unknown(event_type) => event_type,
        }
    }

    /// Subject user id, when the event concerns a user.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Created(user) | Self::Updated(user) => Some(user.id()),
            Self::Deleted { id } => id.as_ref(),
            Self::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests;
