//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::{DbErr, Migrator, MigratorTrait};

use journal_core::ports::{PasswordService, TokenService};
use journal_infra::database::connect;
use journal_infra::{Argon2PasswordService, DbConn, JwtConfig, JwtTokenService, UnitOfWork};

use crate::config::AppConfig;
use crate::middleware::error::AppResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub passwords: Arc<dyn PasswordService>,
    pub tokens: Arc<dyn TokenService>,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(db: DbConn, session: JwtConfig, cookie_secure: bool) -> Self {
        Self {
            db,
            passwords: Arc::new(Argon2PasswordService::new()),
            tokens: Arc::new(JwtTokenService::new(session)),
            cookie_secure,
        }
    }

    /// Connect to the configured database, migrating it if asked to.
    pub async fn init(config: &AppConfig) -> Result<Self, DbErr> {
        let db = connect(&config.database).await?;

        if config.auto_migrate {
            Migrator::up(&db, None).await?;
            tracing::info!("Database migrations applied");
        }

        tracing::info!("Application state initialized");
        Ok(Self::new(db, config.session.clone(), config.cookie_secure))
    }

    /// Open the transaction for one request.
    ///
    /// The pool may hold a single connection, so a handler must not touch
    /// `db` directly while its unit of work is open.
    pub async fn begin(&self) -> AppResult<UnitOfWork> {
        Ok(UnitOfWork::begin(&self.db).await?)
    }
}
