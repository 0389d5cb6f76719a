//! Attack-formula patching for powers that qualify for the bonus.

use super::conditions::{is_monk_weapon, ConditionSet};
use crate::services::synthesis::ResolvedRecord;

const PATCHED_ABILITIES: &[&str] = &["wis", "dex", "str"];

/// Monk and basic-attack powers, or anything attacking off Wis, Dex or Str.
pub fn is_eligible_power(power: &ResolvedRecord) -> bool {
    let lower = power.name.to_lowercase();
    lower.contains("monk")
        || lower.contains("basic attack")
        || power
            .attack_ability()
            .is_some_and(|ability| PATCHED_ABILITIES.contains(&ability))
}

/// Highest proficiency bonus among equipped monk weapons, 0 if none.
pub fn monk_weapon_bonus(equipment: &[ResolvedRecord]) -> i64 {
    let weapons: Vec<&ResolvedRecord> = equipment.iter().filter(|r| is_monk_weapon(r)).collect();
    for weapon in &weapons {
        log::debug!("Equipped monk weapon: {} (profBonus={})", weapon.name, weapon.prof_bonus());
    }
    weapons.iter().map(|w| w.prof_bonus()).max().unwrap_or(0).max(0)
}

/// Patch one power in place. Returns whether it was modified.
pub fn patch_power(power: &mut ResolvedRecord, conditions: &ConditionSet, weapon_bonus: i64) -> bool {
    if !conditions.should_apply_bonus || !is_eligible_power(power) {
        return false;
    }

    let total = weapon_bonus + conditions.feat_bonus;
    if let Some(formula) = power.attack_formula().map(str::to_string) {
        if total > 0 {
            power.set_attack_formula(format!("{formula} + {total}"));
        }
    }

    let system = power.system_object_mut();
    let weapon_type = system.get("weaponType").and_then(|v| v.as_str());
    if weapon_type.is_some_and(|t| !t.is_empty() && t != "implement") {
        system.insert("weaponType".into(), "any".into());
    }
    let weapon_use = system.get("weaponUse").and_then(|v| v.as_str());
    if weapon_use.is_none_or(|u| u.is_empty() || u == "none") {
        system.insert("weaponUse".into(), "default".into());
    }

    power.flags.implement_expertise_compat = true;
    power.flags.implement_expertise_bonus = Some(total);
    true
}

/// Apply the bonus across `powers`. Ineligible powers pass through untouched.
pub fn enhance(
    mut powers: Vec<ResolvedRecord>,
    conditions: &ConditionSet,
    equipment: &[ResolvedRecord],
) -> Vec<ResolvedRecord> {
    if !conditions.should_apply_bonus {
        return powers;
    }

    let weapon_bonus = monk_weapon_bonus(equipment);
    log::debug!(
        "Implement expertise: weapon bonus {} + feat bonus {} = {}",
        weapon_bonus,
        conditions.feat_bonus,
        weapon_bonus + conditions.feat_bonus
    );

    let mut patched = 0;
    for power in &mut powers {
        if patch_power(power, conditions, weapon_bonus) {
            patched += 1;
        }
    }
    log::info!("Implement expertise applied to {} powers", patched);
    powers
}

#[cfg(test)]
#[path = "tests/patch_tests.rs"]
mod tests;
