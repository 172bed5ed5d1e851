//! User data model.
//!
//! The identity provider owns the user identifier; this service mirrors the
//! contact details it publishes and keeps locally editable fields
//! (`display_name`) and the out-of-band `role` alongside them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted length of an identity-provider user id.
pub const USER_ID_MAX: usize = 255;
/// Maximum length of a display name, in characters.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must not have surrounding whitespace")]
    PaddedId,
    #[error("user id must be at most {max} characters")]
    IdTooLong { max: usize },
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("unknown role `{0}`")]
    UnknownRole(String),
}

/// Identity-provider user identifier (for example `user_2NNEqL2nrIRdJ194ndJqAHwEfxC`).
///
/// Opaque to this service: only emptiness, padding, and length are checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Self-service display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorisation role. Only changed out of band; no code path promotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Stored and serialised representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Contact details mirrored from the identity provider.
///
/// Blank values are stored as absent, never as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    phone_number: Option<String>,
    email: Option<String>,
    username: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ContactDetails {
    /// Build contact details, normalising blank values to `None`.
    #[must_use]
    pub fn new(
        phone_number: Option<String>,
        email: Option<String>,
        username: Option<String>,
    ) -> Self {
        Self {
            phone_number: non_blank(phone_number),
            email: non_blank(email),
            username: non_blank(username),
        }
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

/// Partial update applied by `UserRepository::update`.
///
/// `None` leaves the corresponding fields untouched. Contact details are
/// replaced as a unit, so absent values inside them clear the stored ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub contact: Option<ContactDetails>,
    pub display_name: Option<DisplayName>,
}

impl UserPatch {
    /// Patch replacing the provider-owned contact details.
    #[must_use]
    pub fn contact(contact: ContactDetails) -> Self {
        Self {
            contact: Some(contact),
            display_name: None,
        }
    }

    /// Patch setting the display name.
    #[must_use]
    pub fn display_name(display_name: DisplayName) -> Self {
        Self {
            contact: None,
            display_name: Some(display_name),
        }
    }

    /// Whether applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contact.is_none() && self.display_name.is_none()
    }
}

/// Local user record.
///
/// ## Invariants
/// - `id` and `created_at` never change after creation.
/// - `role` is [`Role::User`] for every record created by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    contact: ContactDetails,
    display_name: Option<DisplayName>,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// First sighting of a provider user: role `user`, no display name.
    #[must_use]
    pub fn register(id: UserId, contact: ContactDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            contact,
            display_name: None,
            role: Role::User,
            created_at,
        }
    }

    /// Rehydrate a stored record.
    #[must_use]
    pub fn from_parts(
        id: UserId,
        contact: ContactDetails,
        display_name: Option<DisplayName>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            contact,
            display_name,
            role,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a patch in place. Identity, role, and creation time are not
    /// reachable through a patch.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(contact) = &patch.contact {
            self.contact = contact.clone();
        }
        if let Some(display_name) = &patch.display_name {
            self.display_name = Some(display_name.clone());
        }
    }
}

/// Wire shape of [`User`], snake_case as the REST API has always exposed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: String,
    phone_number: Option<String>,
    email: Option<String>,
    username: Option<String>,
    display_name: Option<String>,
    role: Role,
    created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            contact,
            display_name,
            role,
            created_at,
        } = value;
        Self {
            id: id.into(),
            phone_number: contact.phone_number,
            email: contact.email,
            username: contact.username,
            display_name: display_name.map(Into::into),
            role,
            created_at,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Ok(Self::from_parts(
            UserId::new(value.id)?,
            ContactDetails::new(value.phone_number, value.email, value.username),
            value.display_name.map(DisplayName::new).transpose()?,
            value.role,
            value.created_at,
        ))
    }
}
