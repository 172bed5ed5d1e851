//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{ContactDetails, DisplayName, Role, User, UserId, UserPatch};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            phone_number,
            email,
            username,
            display_name,
            role,
            created_at,
        } = row;
        let id = UserId::new(id).map_err(|err| format!("stored user id: {err}"))?;
        let display_name = display_name
            .map(DisplayName::new)
            .transpose()
            .map_err(|err| format!("stored display name for {id}: {err}"))?;
        let role = role
            .parse::<Role>()
            .map_err(|err| format!("stored role for {id}: {err}"))?;
        Ok(User::from_parts(
            id,
            ContactDetails::new(phone_number, email, username),
            display_name,
            role,
            created_at,
        ))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub phone_number: Option<&'a str>,
    pub email: Option<&'a str>,
    pub username: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub role: &'static str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: user.id().as_ref(),
            phone_number: user.contact().phone_number(),
            email: user.contact().email(),
            username: user.contact().username(),
            display_name: user.display_name().map(AsRef::as_ref),
            role: user.role().as_str(),
            created_at: user.created_at(),
        }
    }
}

/// Changeset for partial updates.
///
/// The outer `Option` skips a column; `Some(None)` writes `NULL`, which is
/// how absent contact details clear stored ones.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub phone_number: Option<Option<&'a str>>,
    pub email: Option<Option<&'a str>>,
    pub username: Option<Option<&'a str>>,
    pub display_name: Option<&'a str>,
}

impl<'a> From<&'a UserPatch> for UserChangeset<'a> {
    fn from(patch: &'a UserPatch) -> Self {
        let mut changeset = Self {
            display_name: patch.display_name.as_ref().map(AsRef::as_ref),
            ..Self::default()
        };
        if let Some(contact) = &patch.contact {
            changeset.phone_number = Some(contact.phone_number());
            changeset.email = Some(contact.email());
            changeset.username = Some(contact.username());
        }
        changeset
    }
}
