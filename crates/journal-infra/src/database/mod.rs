//! Persistence: SeaORM entities, repositories and the per-request unit of work.

mod base;
mod connections;
pub mod entity;
mod repositories;
mod unit_of_work;

pub use base::SeaRepository;
pub use connections::{DatabaseConfig, connect};
pub use repositories::{
    SeaCategoryRepository, SeaCommentRepository, SeaPostRepository, SeaUserRepository,
};
pub use sea_orm::DbConn;
pub use unit_of_work::UnitOfWork;
