use std::fmt;

use crate::data::upgrades::{AffectedStat, UpgradeKind};
use crate::rules::pricing::cost_at_level;

/// Per-user numeric game state, mirroring one row of the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerState {
    pub blocks: i64,
    pub bpc: i64,
    pub bps: i64,
}

/// Outcome of a successful purchase, priced for the purchase after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseReceipt {
    pub kind: UpgradeKind,
    pub state: PlayerState,
    pub level: i64,
    pub next_cost: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    InsufficientFunds { cost: i64, blocks: i64 },
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientFunds { cost, blocks } => {
                write!(f, "purchase costs {} but balance is {}", cost, blocks)
            }
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Take `kind` from `level` to `level + 1`: debit the cost, bump the level,
/// and add the upgrade's power to the stat it affects.
///
/// Rejects without touching anything when the balance cannot cover the cost.
pub fn apply_purchase(
    state: PlayerState,
    kind: UpgradeKind,
    level: i64,
) -> Result<PurchaseReceipt, PurchaseError> {
    let def = kind.definition();
    let cost = cost_at_level(&def, level);
    if state.blocks < cost {
        return Err(PurchaseError::InsufficientFunds {
            cost,
            blocks: state.blocks,
        });
    }

    let mut next = state;
    next.blocks -= cost;
    match def.stat {
        AffectedStat::Bpc => next.bpc += def.power,
        AffectedStat::Bps => next.bps += def.power,
    }

    let level = level + 1;
    Ok(PurchaseReceipt {
        kind,
        state: next,
        level,
        next_cost: cost_at_level(&def, level),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pickaxe_purchase_from_exact_balance() {
        let state = PlayerState {
            blocks: 10,
            bpc: 0,
            bps: 0,
        };
        let receipt = apply_purchase(state, UpgradeKind::Pickaxe, 0).unwrap();
        assert_eq!(receipt.state.blocks, 0);
        assert_eq!(receipt.state.bpc, 1);
        assert_eq!(receipt.state.bps, 0);
        assert_eq!(receipt.level, 1);
        assert_eq!(receipt.next_cost, 12);
    }

    #[test]
    fn underfunded_purchase_is_rejected() {
        let state = PlayerState {
            blocks: 9,
            bpc: 3,
            bps: 2,
        };
        let err = apply_purchase(state, UpgradeKind::Pickaxe, 0).unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientFunds {
                cost: 10,
                blocks: 9
            }
        );
    }

    #[test]
    fn beacon_adds_ten_bps_and_leaves_bpc_alone() {
        let state = PlayerState {
            blocks: 2_500,
            bpc: 4,
            bps: 1,
        };
        let receipt = apply_purchase(state, UpgradeKind::Beacon, 1).unwrap();
        assert_eq!(receipt.state.blocks, 500);
        assert_eq!(receipt.state.bpc, 4);
        assert_eq!(receipt.state.bps, 11);
        assert_eq!(receipt.level, 2);
        assert_eq!(receipt.next_cost, 4000);
    }

    #[test]
    fn debit_is_priced_at_the_current_level() {
        let state = PlayerState {
            blocks: 200,
            bpc: 5,
            bps: 0,
        };
        let receipt = apply_purchase(state, UpgradeKind::Pickaxe, 3).unwrap();
        // trunc(10 * 1.2^3) = 17
        assert_eq!(receipt.state.blocks, 183);
        assert_eq!(receipt.level, 4);
    }
}
