// Re-export core modules for use by the binary or other consumers
pub mod auth;
pub mod config;
pub mod data;
pub mod rules;
pub mod server;
pub mod simulation;
pub mod store;

// Expose the types needed to stand up and drive a game service
pub use crate::config::ServerConfig;
pub use crate::server::{router, AppContext};
pub use crate::store::{GameLedger, LedgerError, SqliteLedger, UserId};
