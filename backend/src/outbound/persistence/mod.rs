//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! # Example
//!
//! ```ignore
//! use kontaktar_backend::outbound::persistence::{DieselUserRepository, LazyDbPool, PoolConfig};
//!
//! let pool = LazyDbPool::new(PoolConfig::new("postgres://localhost/kontaktar"));
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, LazyDbPool, PoolConfig, PoolError};
