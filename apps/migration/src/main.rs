//! Migration CLI tool.
//!
//! `run_cli` installs its own tracing subscriber and reads `DATABASE_URL`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(migration::Migrator).await;
}
