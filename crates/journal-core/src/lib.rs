//! # Journal Core
//!
//! The domain layer of the learning journal.
//! Entities, validation rules, permissions and the operations layered on the
//! repository ports. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod forms;
pub mod permissions;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
