use crate::actor::Actor;
use schema::{MoveCategory, MoveData, StatType, StatusCondition};

/// Speed after stages and paralysis; the turn order key.
pub fn effective_speed(actor: &Actor) -> u16 {
    let stage = actor.get_stat_stage(StatType::Speed);
    let mut speed = apply_stat_stage_multiplier(actor.stats.speed, stage);

    if actor.status == Some(StatusCondition::Paralysis) {
        speed /= 4;
    }

    speed
}

pub fn effective_attack(actor: &Actor, category: MoveCategory) -> u16 {
    let stat = match category {
        MoveCategory::Special => StatType::SpecialAttack,
        MoveCategory::Physical | MoveCategory::Status => StatType::Attack,
    };
    let mut attack = apply_stat_stage_multiplier(actor.stats.get(stat), actor.get_stat_stage(stat));

    if category == MoveCategory::Physical && actor.status == Some(StatusCondition::Burn) {
        attack /= 2;
    }

    attack
}

pub fn effective_defense(actor: &Actor, category: MoveCategory) -> u16 {
    let stat = match category {
        MoveCategory::Special => StatType::SpecialDefense,
        MoveCategory::Physical | MoveCategory::Status => StatType::Defense,
    };
    apply_stat_stage_multiplier(actor.stats.get(stat), actor.get_stat_stage(stat))
}

/// Final hit chance for a move whose base accuracy has already been run
/// through held items. Clamped to 1..=100.
pub fn hit_chance(attacker: &Actor, defender: &Actor, accuracy: u32) -> u8 {
    let accuracy_stage = attacker.get_stat_stage(StatType::Accuracy);
    let evasion_stage = defender.get_stat_stage(StatType::Evasion);
    let adjusted_stage = (accuracy_stage - evasion_stage).clamp(-6, 6);

    let modified = (accuracy as f64 * apply_accuracy_stage_multiplier(adjusted_stage)).round();
    modified.clamp(1.0, 100.0) as u8
}

/// Result of a damage roll before it is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub damage: u16,
    pub effectiveness: f32,
}

/// Deterministic damage for one hit at `power`, with same-type bonus and
/// type effectiveness. Immune targets take zero; anything else at least one.
pub fn calculate_damage(attacker: &Actor, defender: &Actor, move_data: &MoveData, power: u32) -> DamageRoll {
    let effectiveness = move_data.move_type.effectiveness_against(&defender.types);
    if power == 0 || effectiveness == 0.0 || move_data.category == MoveCategory::Status {
        return DamageRoll {
            damage: 0,
            effectiveness,
        };
    }

    // Boosted power times a maxed stat does not fit in u32.
    let level = u64::from(attacker.level);
    let attack = u64::from(effective_attack(attacker, move_data.category)).max(1);
    let defense = u64::from(effective_defense(defender, move_data.category)).max(1);

    let base = ((2 * level / 5 + 2) * u64::from(power) * attack / defense) / 50 + 2;
    let mut damage = base as f64;
    if attacker.types.contains(&move_data.move_type) {
        damage *= 1.5;
    }
    damage *= f64::from(effectiveness);

    DamageRoll {
        damage: (damage.floor() as u64).clamp(1, u64::from(u16::MAX)) as u16,
        effectiveness,
    }
}

fn apply_accuracy_stage_multiplier(stage: i8) -> f64 {
    match stage {
        -6 => 3.0 / 9.0,
        -5 => 3.0 / 8.0,
        -4 => 3.0 / 7.0,
        -3 => 3.0 / 6.0,
        -2 => 3.0 / 5.0,
        -1 => 3.0 / 4.0,
        1 => 4.0 / 3.0,
        2 => 5.0 / 3.0,
        3 => 6.0 / 3.0,
        4 => 7.0 / 3.0,
        5 => 8.0 / 3.0,
        6 => 9.0 / 3.0,
        _ => 1.0,
    }
}

fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let clamped_stage = stage.clamp(-6, 6);

    if clamped_stage == 0 {
        return base_stat;
    }

    let multiplier = if clamped_stage < 0 {
        2.0 / (2.0 + (-clamped_stage) as f64)
    } else {
        (2.0 + clamped_stage as f64) / 2.0
    };

    ((base_stat as f64) * multiplier).round().min(f64::from(u16::MAX)) as u16
}
