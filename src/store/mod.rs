pub mod repository;
pub mod sqlite;

pub use repository::{GameLedger, LeaderboardEntry, LedgerError, UserId};
pub use sqlite::SqliteLedger;
