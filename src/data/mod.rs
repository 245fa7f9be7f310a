pub mod upgrades;

pub use upgrades::{AffectedStat, UnknownUpgradeKind, UpgradeDefinition, UpgradeKind};
