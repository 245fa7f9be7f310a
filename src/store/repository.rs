use std::fmt;

use serde::Serialize;

use crate::data::upgrades::UpgradeKind;
use crate::simulation::progression::{PlayerState, PurchaseError, PurchaseReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// One leaderboard row, ordered by blocks descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub blocks: i64,
}

#[derive(Debug)]
pub enum LedgerError {
    Sqlite(rusqlite::Error),
    UsernameTaken,
    UnknownUser(UserId),
    InsufficientFunds { cost: i64, blocks: i64 },
    InvalidData(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Sqlite(err) => write!(f, "ledger storage error: {}", err),
            LedgerError::UsernameTaken => write!(f, "username already taken"),
            LedgerError::UnknownUser(user) => write!(f, "no user with id {}", user.0),
            LedgerError::InsufficientFunds { cost, blocks } => {
                write!(f, "purchase costs {} but balance is {}", cost, blocks)
            }
            LedgerError::InvalidData(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

impl From<PurchaseError> for LedgerError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::InsufficientFunds { cost, blocks } => {
                Self::InsufficientFunds { cost, blocks }
            }
        }
    }
}

/// Data-access contract for per-user game state and upgrade progression.
///
/// Every mutating operation is a single atomic unit: its read-validate-write
/// sequence cannot interleave with another mutation of the same user.
pub trait GameLedger {
    /// Insert a new user with zeroed game state. The password arrives
    /// pre-hashed; plaintext never reaches the ledger.
    fn register_user(&mut self, username: &str, password_hash: &str) -> Result<UserId, LedgerError>;

    /// Resolve a username to its id and stored credential hash.
    fn credentials_for(&self, username: &str) -> Result<Option<(UserId, String)>, LedgerError>;

    fn username(&self, user: UserId) -> Result<String, LedgerError>;

    fn player_state(&self, user: UserId) -> Result<PlayerState, LedgerError>;

    /// Current level per catalog kind; kinds never purchased report level 0.
    fn upgrade_levels(&self, user: UserId) -> Result<Vec<(UpgradeKind, i64)>, LedgerError>;

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, LedgerError>;

    /// Credit one manual mine action and return the new blocks total.
    fn mine(&mut self, user: UserId) -> Result<i64, LedgerError>;

    /// Credit one passive accrual tick and return the new blocks total.
    fn passive_tick(&mut self, user: UserId) -> Result<i64, LedgerError>;

    /// Buy the next level of `kind`: debit the cost, bump the level, apply the
    /// effect. Commits all of it or none of it.
    fn purchase_upgrade(
        &mut self,
        user: UserId,
        kind: UpgradeKind,
    ) -> Result<PurchaseReceipt, LedgerError>;
}
