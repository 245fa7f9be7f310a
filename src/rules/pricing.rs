use crate::data::upgrades::UpgradeDefinition;

/// Price of the purchase that takes an upgrade from `level` to `level + 1`.
///
/// The fractional part of the product is dropped, never rounded, so the
/// series for pickaxe runs 10, 12, 14, 17, ...
pub fn cost_at_level(def: &UpgradeDefinition, level: i64) -> i64 {
    (def.base_cost as f64 * def.multiplier.powi(level as i32)) as i64
}
