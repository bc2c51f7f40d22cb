//! Combat resolution between units, and between units and cities
//!
//! Damage falls off exponentially with the strength gap:
//! `damage = base × e^((attack − defence) / divisor)`, and the counter blow is
//! the mirrored value scaled down. Both are floored to whole hit points.

use crate::battle::constants::EMBARKED_STRENGTH_FACTOR;
use crate::battle::units::Unit;
use crate::city::settlement::City;
use crate::core::config::SimulationRules;
use crate::core::error::MoveError;
use crate::worldgen::cells::RegionalCell;

/// Raw damage exchange for one attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatResult {
    pub damage: u32,
    pub counter_damage: u32,
}

/// Outcome of a unit attacking a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCombatResult {
    pub damage: u32,
    pub counter_damage: u32,
    pub ranged: bool,
    pub attacker_destroyed: bool,
    pub defender_destroyed: bool,
}

/// Outcome of a unit attacking a city
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityCombatResult {
    pub damage: u32,
    pub counter_damage: u32,
    pub ranged: bool,
    pub attacker_destroyed: bool,
    /// City at zero hit points and the blow was a melee attack
    pub city_falls: bool,
}

/// Damage and counter-damage for effective strengths
pub fn resolve_combat(attacker_strength: f64, defender_strength: f64, rules: &SimulationRules) -> CombatResult {
    let exponent = (attacker_strength - defender_strength) / rules.strength_divisor;
    let damage = rules.base_damage * exponent.exp();
    let counter = rules.base_damage * (-exponent).exp() * rules.counter_scale;
    CombatResult {
        damage: damage.floor().max(0.0) as u32,
        counter_damage: counter.floor().max(0.0) as u32,
    }
}

/// Strength scaled by terrain defence (percent) and fortification (fraction)
pub fn effective_defense(strength: f64, terrain_defense: i32, fortification: f64) -> f64 {
    strength * (1.0 + terrain_defense as f64 / 100.0 + fortification)
}

fn embark_factor(unit: &Unit) -> f64 {
    if unit.embarked {
        EMBARKED_STRENGTH_FACTOR
    } else {
        1.0
    }
}

/// Validate an attack and return whether it is ranged
fn check_attack(attacker: &Unit, distance: u32) -> Result<bool, MoveError> {
    if !attacker.is_combatant() {
        return Err(MoveError::NotCombatant);
    }
    if attacker.has_attacked {
        return Err(MoveError::AlreadyAttacked);
    }
    if !attacker.can_move() {
        return Err(MoveError::NoMovementLeft);
    }

    let ranged = attacker.unit_type.has_ranged_attack();
    if ranged {
        if distance == 0 || distance > attacker.range {
            return Err(MoveError::OutOfRange);
        }
    } else if distance != 1 {
        return Err(MoveError::NotAdjacent);
    }
    Ok(ranged)
}

fn attack_strength(attacker: &Unit, ranged: bool) -> f64 {
    let base = if ranged {
        attacker.ranged_strength
    } else {
        attacker.strength
    };
    base * embark_factor(attacker)
}

/// Attacking ends the unit's turn
fn finish_attack(attacker: &mut Unit) {
    attacker.has_attacked = true;
    let remaining = attacker.movement;
    attacker.spend_movement(remaining);
}

/// Resolve a unit attacking another unit standing on `defender_tile`
pub fn resolve_unit_combat(
    attacker: &mut Unit,
    defender: &mut Unit,
    defender_tile: &RegionalCell,
    rules: &SimulationRules,
) -> Result<UnitCombatResult, MoveError> {
    let ranged = check_attack(attacker, attacker.location.distance(&defender.location))?;

    let attack = attack_strength(attacker, ranged);
    let defense = effective_defense(
        defender.strength * embark_factor(defender),
        if defender.embarked { 0 } else { defender_tile.defense_bonus },
        defender.fortification_bonus(rules),
    );

    let exchange = resolve_combat(attack, defense, rules);
    let counter_damage = if ranged || !defender.is_combatant() {
        0
    } else {
        exchange.counter_damage
    };

    let defender_destroyed = defender.take_damage(exchange.damage);
    let attacker_destroyed = attacker.take_damage(counter_damage);
    finish_attack(attacker);

    tracing::debug!(
        "{} attacked {}: dealt {}, took {}",
        attacker.id,
        defender.id,
        exchange.damage,
        counter_damage
    );

    Ok(UnitCombatResult {
        damage: exchange.damage,
        counter_damage,
        ranged,
        attacker_destroyed,
        defender_destroyed,
    })
}

/// Resolve a unit attacking a city
///
/// Ranged attacks never take a city below 1 hit point; only a melee blow
/// that lands on an undefended (zero hit point) city takes it.
pub fn resolve_city_attack(
    attacker: &mut Unit,
    city: &mut City,
    city_tile: &RegionalCell,
    rules: &SimulationRules,
) -> Result<CityCombatResult, MoveError> {
    let ranged = check_attack(attacker, attacker.location.distance(&city.location))?;

    let attack = attack_strength(attacker, ranged);
    let defense = effective_defense(city.defense_strength(), city_tile.defense_bonus, 0.0);
    let exchange = resolve_combat(attack, defense, rules);
    let counter_damage = if ranged { 0 } else { exchange.counter_damage };

    let was_defenceless = city.hp == 0;
    let floor = if ranged { city.hp.min(1) } else { 0 };
    city.hp = city.hp.saturating_sub(exchange.damage).max(floor);
    let city_falls = !ranged && (was_defenceless || city.hp == 0);

    let attacker_destroyed = attacker.take_damage(counter_damage);
    finish_attack(attacker);

    Ok(CityCombatResult {
        damage: exchange.damage,
        counter_damage,
        ranged,
        attacker_destroyed,
        city_falls: city_falls && !attacker_destroyed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit_type::UnitType;
    use crate::core::types::{CityId, GlobalCoord, GridCoord, NationId, UnitId};
    use crate::terrain::{HexYieldModel, Terrain};

    fn tile(terrain: Terrain, at: GlobalCoord) -> RegionalCell {
        let mut cell = RegionalCell::new(GridCoord::new(0, 0), 0, 0, at, terrain, 1);
        HexYieldModel::recompute(&mut cell);
        cell
    }

    #[test]
    fn test_stronger_attacker_scenario() {
        let result = resolve_combat(20.0, 10.0, &SimulationRules::default());
        assert_eq!(result.damage, 44);
        assert_eq!(result.counter_damage, 14);
    }

    #[test]
    fn test_equal_strength_symmetry() {
        let result = resolve_combat(15.0, 15.0, &SimulationRules::default());
        assert_eq!(result.damage, 30);
        assert_eq!(result.counter_damage, 21);
    }

    #[test]
    fn test_effective_defense() {
        assert!((effective_defense(10.0, 25, 0.2) - 14.5).abs() < 1e-9);
        assert_eq!(effective_defense(10.0, 0, 0.0), 10.0);
    }

    #[test]
    fn test_melee_exchange_and_turn_end() {
        let rules = SimulationRules::default();
        let mut attacker = Unit::new(UnitId(1), NationId(1), UnitType::Swordsman, GlobalCoord::new(0, 0));
        let mut defender = Unit::new(UnitId(2), NationId(2), UnitType::Warrior, GlobalCoord::new(0, 1));
        let ground = tile(Terrain::Plains, defender.location);

        let result = resolve_unit_combat(&mut attacker, &mut defender, &ground, &rules).unwrap();
        assert!(!result.ranged);
        assert!(result.damage > result.counter_damage);
        assert_eq!(defender.hp, 100 - result.damage);
        assert_eq!(attacker.hp, 100 - result.counter_damage);
        assert_eq!(attacker.movement, 0);
        assert_eq!(
            resolve_unit_combat(&mut attacker, &mut defender, &ground, &rules),
            Err(MoveError::AlreadyAttacked)
        );
    }

    #[test]
    fn test_ranged_attack_takes_no_counter() {
        let rules = SimulationRules::default();
        let mut archer = Unit::new(UnitId(1), NationId(1), UnitType::Archer, GlobalCoord::new(0, 0));
        let mut target = Unit::new(UnitId(2), NationId(2), UnitType::Warrior, GlobalCoord::new(0, 2));
        let ground = tile(Terrain::Plains, target.location);

        let result = resolve_unit_combat(&mut archer, &mut target, &ground, &rules).unwrap();
        assert!(result.ranged);
        assert_eq!(result.counter_damage, 0);
        assert_eq!(archer.hp, archer.max_hp);
    }

    #[test]
    fn test_melee_needs_adjacency() {
        let rules = SimulationRules::default();
        let mut attacker = Unit::new(UnitId(1), NationId(1), UnitType::Warrior, GlobalCoord::new(0, 0));
        let mut defender = Unit::new(UnitId(2), NationId(2), UnitType::Warrior, GlobalCoord::new(0, 3));
        let ground = tile(Terrain::Plains, defender.location);
        assert_eq!(
            resolve_unit_combat(&mut attacker, &mut defender, &ground, &rules),
            Err(MoveError::NotAdjacent)
        );
    }

    #[test]
    fn test_hills_and_fortification_reduce_damage() {
        let rules = SimulationRules::default();
        let open = {
            let mut a = Unit::new(UnitId(1), NationId(1), UnitType::Warrior, GlobalCoord::new(0, 0));
            let mut d = Unit::new(UnitId(2), NationId(2), UnitType::Warrior, GlobalCoord::new(0, 1));
            let ground = tile(Terrain::Plains, d.location);
            resolve_unit_combat(&mut a, &mut d, &ground, &rules)
                .unwrap()
                .damage
        };
        let dug_in = {
            let mut a = Unit::new(UnitId(1), NationId(1), UnitType::Warrior, GlobalCoord::new(0, 0));
            let mut d = Unit::new(UnitId(2), NationId(2), UnitType::Warrior, GlobalCoord::new(0, 1));
            d.fortify().unwrap();
            d.advance_turn(1, &rules);
            d.advance_turn(2, &rules);
            let ground = tile(Terrain::Hills, d.location);
            resolve_unit_combat(&mut a, &mut d, &ground, &rules)
                .unwrap()
                .damage
        };
        assert!(dug_in < open);
    }

    #[test]
    fn test_ranged_cannot_take_city() {
        let rules = SimulationRules::default();
        let mut city = City::new(CityId(1), NationId(2), "Target".into(), GlobalCoord::new(0, 2));
        city.hp = 5;
        let ground = tile(Terrain::Plains, city.location);
        let mut catapult = Unit::new(UnitId(1), NationId(1), UnitType::Catapult, GlobalCoord::new(0, 0));

        let result = resolve_city_attack(&mut catapult, &mut city, &ground, &rules).unwrap();
        assert!(!result.city_falls);
        assert_eq!(city.hp, 1);
    }

    #[test]
    fn test_melee_takes_defenceless_city() {
        let rules = SimulationRules::default();
        let mut city = City::new(CityId(1), NationId(2), "Target".into(), GlobalCoord::new(0, 1));
        city.hp = 0;
        let ground = tile(Terrain::Plains, city.location);
        let mut swordsman = Unit::new(UnitId(1), NationId(1), UnitType::Swordsman, GlobalCoord::new(0, 0));

        let result = resolve_city_attack(&mut swordsman, &mut city, &ground, &rules).unwrap();
        assert!(result.city_falls);
    }
}
