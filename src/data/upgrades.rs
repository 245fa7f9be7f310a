use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Stat an upgrade level feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffectedStat {
    Bpc,
    Bps,
}

/// Purchasable upgrade kinds. The set is fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    Pickaxe,
    Friend,
    Beacon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUpgradeKind {
    pub value: String,
}

impl fmt::Display for UnknownUpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown upgrade kind {}", self.value)
    }
}

impl std::error::Error for UnknownUpgradeKind {}

impl FromStr for UpgradeKind {
    type Err = UnknownUpgradeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickaxe" => Ok(UpgradeKind::Pickaxe),
            "friend" => Ok(UpgradeKind::Friend),
            "beacon" => Ok(UpgradeKind::Beacon),
            _ => Err(UnknownUpgradeKind {
                value: s.to_string(),
            }),
        }
    }
}

impl UpgradeKind {
    /// Catalog order, also the reporting order on the home payload.
    pub const ALL: [UpgradeKind; 3] = [UpgradeKind::Pickaxe, UpgradeKind::Friend, UpgradeKind::Beacon];

    pub fn as_str(self) -> &'static str {
        match self {
            UpgradeKind::Pickaxe => "pickaxe",
            UpgradeKind::Friend => "friend",
            UpgradeKind::Beacon => "beacon",
        }
    }

    pub fn definition(self) -> UpgradeDefinition {
        match self {
            UpgradeKind::Pickaxe => UpgradeDefinition {
                base_cost: 10,
                multiplier: 1.2,
                stat: AffectedStat::Bpc,
                power: 1,
            },
            UpgradeKind::Friend => UpgradeDefinition {
                base_cost: 100,
                multiplier: 1.5,
                stat: AffectedStat::Bps,
                power: 1,
            },
            UpgradeKind::Beacon => UpgradeDefinition {
                base_cost: 1000,
                multiplier: 2.0,
                stat: AffectedStat::Bps,
                power: 10,
            },
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static pricing and effect parameters for one upgrade kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDefinition {
    pub base_cost: i64,
    /// Per-level cost growth factor, > 1.
    pub multiplier: f64,
    pub stat: AffectedStat,
    /// Amount added to the affected stat per level.
    pub power: i64,
}
