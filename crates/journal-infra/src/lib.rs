//! # Journal Infrastructure
//!
//! Concrete implementations of the ports defined in `journal-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `database` - SeaORM persistence (PostgreSQL and SQLite drivers)
//! - `auth` - Argon2 password hashing and JWT identity tokens

#[cfg(feature = "database")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "database")]
pub use database::{DatabaseConfig, DbConn, UnitOfWork};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
