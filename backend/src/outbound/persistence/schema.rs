//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations`; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Local mirror of identity-provider users.
    users (id) {
        /// Identity-provider user id.
        id -> Varchar,
        phone_number -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        username -> Nullable<Varchar>,
        /// Self-service display name, never written by the webhook path.
        display_name -> Nullable<Varchar>,
        /// `user` or `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}
