//! PostgreSQL persistence adapter using Diesel.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! ```ignore
//! use user_directory::outbound::persistence::{
//!     DbPool, DieselUserDirectoryRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/directory")).await?;
//! let repo = DieselUserDirectoryRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_user_directory_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_directory_repository::DieselUserDirectoryRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
