//! # Learning Journal Server
//!
//! Actix-web application: route table, request extractors and handlers.
//! The binary in `main.rs` wires configuration, telemetry and the database
//! around [`handlers::configure_routes`].

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
pub mod views;
