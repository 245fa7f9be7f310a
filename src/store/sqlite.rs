use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::data::upgrades::UpgradeKind;
use crate::simulation::accrual;
use crate::simulation::progression::{apply_purchase, PlayerState, PurchaseReceipt};
use crate::store::repository::{GameLedger, LeaderboardEntry, LedgerError, UserId};

const LEDGER_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  username TEXT NOT NULL UNIQUE,
  hash TEXT NOT NULL,
  blocks INTEGER NOT NULL DEFAULT 0,
  bpc INTEGER NOT NULL DEFAULT 0,
  bps INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS upgrades (
  user_id INTEGER NOT NULL REFERENCES users(id),
  type TEXT NOT NULL,
  level INTEGER NOT NULL DEFAULT 0,
  PRIMARY KEY (user_id, type)
);
"#;

/// SQLite-backed ledger. Mutations run inside a transaction so a failure
/// between the balance write and the level write leaves neither applied.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(LEDGER_SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(LEDGER_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Credit blocks outside the accrual path. Admin/fixture affordance, not
    /// reachable from the request surface.
    pub fn grant_blocks(&mut self, user: UserId, amount: i64) -> Result<(), LedgerError> {
        let changed = self.conn.execute(
            "UPDATE users SET blocks = blocks + ?1 WHERE id = ?2",
            params![amount, user.0],
        )?;
        if changed == 0 {
            return Err(LedgerError::UnknownUser(user));
        }
        Ok(())
    }
}

fn read_player_state(conn: &Connection, user: UserId) -> Result<PlayerState, LedgerError> {
    conn.query_row(
        "SELECT blocks, bpc, bps FROM users WHERE id = ?1",
        params![user.0],
        |row| {
            Ok(PlayerState {
                blocks: row.get(0)?,
                bpc: row.get(1)?,
                bps: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or(LedgerError::UnknownUser(user))
}

fn write_player_state(
    conn: &Connection,
    user: UserId,
    state: &PlayerState,
) -> Result<(), LedgerError> {
    conn.execute(
        "UPDATE users SET blocks = ?1, bpc = ?2, bps = ?3 WHERE id = ?4",
        params![state.blocks, state.bpc, state.bps, user.0],
    )?;
    Ok(())
}

fn read_level(conn: &Connection, user: UserId, kind: UpgradeKind) -> Result<i64, LedgerError> {
    let level = conn
        .query_row(
            "SELECT level FROM upgrades WHERE user_id = ?1 AND type = ?2",
            params![user.0, kind.as_str()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(level.unwrap_or(0))
}

impl GameLedger for SqliteLedger {
    fn register_user(&mut self, username: &str, password_hash: &str) -> Result<UserId, LedgerError> {
        let tx = self.conn.transaction()?;
        let existing = tx
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                params![username],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(LedgerError::UsernameTaken);
        }
        tx.execute(
            "INSERT INTO users (username, hash) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(UserId(id))
    }

    fn credentials_for(&self, username: &str) -> Result<Option<(UserId, String)>, LedgerError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, hash FROM users WHERE username = ?1",
                params![username],
                |row| Ok((UserId(row.get(0)?), row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    fn username(&self, user: UserId) -> Result<String, LedgerError> {
        self.conn
            .query_row(
                "SELECT username FROM users WHERE id = ?1",
                params![user.0],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(LedgerError::UnknownUser(user))
    }

    fn player_state(&self, user: UserId) -> Result<PlayerState, LedgerError> {
        read_player_state(&self.conn, user)
    }

    fn upgrade_levels(&self, user: UserId) -> Result<Vec<(UpgradeKind, i64)>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare("SELECT type, level FROM upgrades WHERE user_id = ?1")?;
        let mut rows = stmt.query(params![user.0])?;
        let mut by_kind: HashMap<UpgradeKind, i64> = HashMap::new();
        while let Some(row) = rows.next()? {
            let kind: String = row.get(0)?;
            let kind = kind
                .parse::<UpgradeKind>()
                .map_err(|err| LedgerError::InvalidData(err.to_string()))?;
            by_kind.insert(kind, row.get(1)?);
        }
        Ok(UpgradeKind::ALL
            .into_iter()
            .map(|kind| (kind, by_kind.get(&kind).copied().unwrap_or(0)))
            .collect())
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare("SELECT username, blocks FROM users ORDER BY blocks DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok(LeaderboardEntry {
                username: row.get(0)?,
                blocks: row.get(1)?,
            })
        })?;
        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }

    fn mine(&mut self, user: UserId) -> Result<i64, LedgerError> {
        let tx = self.conn.transaction()?;
        let state = read_player_state(&tx, user)?;
        let next = accrual::mine(state);
        if next.blocks != state.blocks {
            write_player_state(&tx, user, &next)?;
        }
        tx.commit()?;
        Ok(next.blocks)
    }

    fn passive_tick(&mut self, user: UserId) -> Result<i64, LedgerError> {
        let tx = self.conn.transaction()?;
        let state = read_player_state(&tx, user)?;
        let next = accrual::passive_tick(state);
        if next.blocks != state.blocks {
            write_player_state(&tx, user, &next)?;
        }
        tx.commit()?;
        Ok(next.blocks)
    }

    fn purchase_upgrade(
        &mut self,
        user: UserId,
        kind: UpgradeKind,
    ) -> Result<PurchaseReceipt, LedgerError> {
        // Dropping the transaction without commit rolls back, so a rejected or
        // failed purchase leaves no trace.
        let tx = self.conn.transaction()?;
        let state = read_player_state(&tx, user)?;
        let level = read_level(&tx, user, kind)?;
        let receipt = apply_purchase(state, kind, level)?;
        write_player_state(&tx, user, &receipt.state)?;
        tx.execute(
            "INSERT INTO upgrades (user_id, type, level) VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id, type) DO UPDATE SET level = excluded.level",
            params![user.0, kind.as_str(), receipt.level],
        )?;
        tx.commit()?;
        Ok(receipt)
    }
}
