use crate::actor::Actor;
use crate::config::BehaviorConfig;
use crate::errors::ConfigurationError;
use crate::items::TriggerPoint;
use schema::{HeldItemId, PokemonType, StatType, StatusCondition};
use serde::{Deserialize, Serialize};

/// Fixed-point scale for per-stack ratios: 10_000 basis points is 1.0.
const BASIS_POINTS: u64 = 10_000;

/// Value threaded through every effect consulted at one trigger point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComputationHolder {
    Number(u32),
    Flag(bool),
    /// A multiplier where 1.0 is neutral.
    Ratio(f64),
}

impl ComputationHolder {
    pub fn number(&self) -> Option<u32> {
        match self {
            ComputationHolder::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            ComputationHolder::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        match self {
            ComputationHolder::Ratio(ratio) => Some(*ratio),
            _ => None,
        }
    }
}

/// Side effects a behavior applied to its holder, reported back so the
/// engine can turn them into battle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    Healed(u16),
    StatRaised {
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatusCured(StatusCondition),
    StatusInflicted(StatusCondition),
}

/// Everything an effect may read or touch besides the holder value.
pub struct TriggerContext<'a> {
    pub actor: &'a mut Actor,
    pub move_type: Option<PokemonType>,
    pub outcomes: Vec<EffectOutcome>,
}

impl<'a> TriggerContext<'a> {
    pub fn new(actor: &'a mut Actor) -> Self {
        Self {
            actor,
            move_type: None,
            outcomes: Vec::new(),
        }
    }

    pub fn with_move_type(mut self, move_type: PokemonType) -> Self {
        self.move_type = Some(move_type);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BerryKind {
    Sitrus,
    Lum,
    Liechi,
    Ganlon,
    Petaya,
    Apicot,
    Salac,
}

impl BerryKind {
    /// The stat a pinch berry raises.
    pub fn boosted_stat(self) -> Option<StatType> {
        match self {
            BerryKind::Liechi => Some(StatType::Attack),
            BerryKind::Ganlon => Some(StatType::Defense),
            BerryKind::Petaya => Some(StatType::SpecialAttack),
            BerryKind::Apicot => Some(StatType::SpecialDefense),
            BerryKind::Salac => Some(StatType::Speed),
            BerryKind::Sitrus | BerryKind::Lum => None,
        }
    }

    fn apply(self, actor: &mut Actor, outcomes: &mut Vec<EffectOutcome>) -> bool {
        if actor.hp == 0 {
            return false;
        }
        match self {
            BerryKind::Sitrus => {
                if !actor.hp_at_most(1, 2) {
                    return false;
                }
                let healed = actor.heal((actor.max_hp / 4).max(1));
                if healed == 0 {
                    return false;
                }
                outcomes.push(EffectOutcome::Healed(healed));
                true
            }
            BerryKind::Lum => match actor.status.take() {
                Some(status) => {
                    outcomes.push(EffectOutcome::StatusCured(status));
                    true
                }
                None => false,
            },
            pinch => {
                let Some(stat) = pinch.boosted_stat() else {
                    return false;
                };
                if !actor.hp_at_most(1, 4) || actor.get_stat_stage(stat) >= 6 {
                    return false;
                }
                let (old_stage, new_stage) = actor.modify_stat_stage(stat, 1);
                outcomes.push(EffectOutcome::StatRaised {
                    stat,
                    old_stage,
                    new_stage,
                });
                true
            }
        }
    }
}

/// Runtime behavior of a registered effect. Ratios are held in basis points
/// so that scaling floors exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectBehavior {
    AttackTypeBooster { move_type: PokemonType, boost_bp: u32 },
    AccuracyBooster { amount: u32 },
    ExperienceBooster { boost_bp: u32 },
    FriendshipBooster { boost_bp: u32 },
    Berry(BerryKind),
    Leftovers { divisor: u16 },
    StatusOrb(StatusCondition),
    PowerHerb,
    NatureWeightBooster { step_bp: u32 },
}

impl EffectBehavior {
    pub fn from_config(id: HeldItemId, config: &BehaviorConfig) -> Result<Self, ConfigurationError> {
        let behavior = match *config {
            BehaviorConfig::AttackTypeBooster { move_type, ratio } => EffectBehavior::AttackTypeBooster {
                move_type,
                boost_bp: to_basis_points(id, ratio)?,
            },
            BehaviorConfig::AccuracyBooster { amount } => EffectBehavior::AccuracyBooster { amount },
            BehaviorConfig::ExperienceBooster { ratio } => EffectBehavior::ExperienceBooster {
                boost_bp: to_basis_points(id, ratio)?,
            },
            BehaviorConfig::FriendshipBooster { ratio } => EffectBehavior::FriendshipBooster {
                boost_bp: to_basis_points(id, ratio)?,
            },
            BehaviorConfig::Berry(kind) => EffectBehavior::Berry(kind),
            BehaviorConfig::Leftovers { divisor } => {
                if divisor == 0 {
                    return Err(ConfigurationError::InvalidParameter {
                        id,
                        reason: "divisor must be positive".to_string(),
                    });
                }
                EffectBehavior::Leftovers { divisor }
            }
            BehaviorConfig::StatusOrb(status) => EffectBehavior::StatusOrb(status),
            BehaviorConfig::PowerHerb => EffectBehavior::PowerHerb,
            BehaviorConfig::NatureWeightBooster { step } => EffectBehavior::NatureWeightBooster {
                step_bp: to_basis_points(id, step)?,
            },
        };
        Ok(behavior)
    }

    /// The only trigger point this behavior can run at.
    pub fn trigger(&self) -> TriggerPoint {
        match self {
            EffectBehavior::AttackTypeBooster { .. } => TriggerPoint::PowerCheck,
            EffectBehavior::AccuracyBooster { .. } => TriggerPoint::AccuracyCheck,
            EffectBehavior::ExperienceBooster { .. } => TriggerPoint::ExperienceGain,
            EffectBehavior::FriendshipBooster { .. } => TriggerPoint::FriendshipGain,
            EffectBehavior::Berry(_) => TriggerPoint::HpThreshold,
            EffectBehavior::Leftovers { .. } | EffectBehavior::StatusOrb(_) => TriggerPoint::EndOfTurn,
            EffectBehavior::PowerHerb => TriggerPoint::InstantCharge,
            EffectBehavior::NatureWeightBooster { .. } => TriggerPoint::NatureWeight,
        }
    }

    /// Applies the effect at `stack` copies. Returns whether it fired; a
    /// holder of the wrong shape means it did not.
    pub fn apply(&self, ctx: &mut TriggerContext<'_>, stack: u32, holder: &mut ComputationHolder) -> bool {
        if stack == 0 {
            return false;
        }
        match *self {
            EffectBehavior::AttackTypeBooster { move_type, boost_bp } => {
                let ComputationHolder::Number(value) = holder else {
                    return false;
                };
                if ctx.move_type != Some(move_type) || *value < 1 {
                    return false;
                }
                *value = scale(*value, stack, boost_bp);
                true
            }
            EffectBehavior::AccuracyBooster { amount } => {
                let ComputationHolder::Number(value) = holder else {
                    return false;
                };
                *value = value.saturating_add(amount.saturating_mul(stack));
                true
            }
            EffectBehavior::ExperienceBooster { boost_bp } | EffectBehavior::FriendshipBooster { boost_bp } => {
                let ComputationHolder::Number(value) = holder else {
                    return false;
                };
                *value = scale(*value, stack, boost_bp);
                true
            }
            EffectBehavior::Berry(kind) => kind.apply(ctx.actor, &mut ctx.outcomes),
            EffectBehavior::Leftovers { divisor } => {
                let actor = &mut *ctx.actor;
                if actor.hp == 0 || actor.hp == actor.max_hp {
                    return false;
                }
                let per_stack = (actor.max_hp / divisor).max(1);
                let amount = u32::from(per_stack).saturating_mul(stack).min(u32::from(u16::MAX)) as u16;
                let healed = actor.heal(amount);
                ctx.outcomes.push(EffectOutcome::Healed(healed));
                true
            }
            EffectBehavior::StatusOrb(status) => {
                if ctx.actor.hp == 0 || ctx.actor.status.is_some() {
                    return false;
                }
                ctx.actor.status = Some(status);
                ctx.outcomes.push(EffectOutcome::StatusInflicted(status));
                true
            }
            EffectBehavior::PowerHerb => {
                let ComputationHolder::Flag(instant) = holder else {
                    return false;
                };
                if *instant {
                    return false;
                }
                *instant = true;
                true
            }
            EffectBehavior::NatureWeightBooster { step_bp } => {
                let ComputationHolder::Ratio(multiplier) = holder else {
                    return false;
                };
                // A neutral nature stays neutral.
                if *multiplier == 1.0 {
                    return false;
                }
                let shift = f64::from(step_bp) / BASIS_POINTS as f64 * f64::from(stack);
                if *multiplier > 1.0 {
                    *multiplier += shift;
                } else {
                    *multiplier -= shift;
                }
                true
            }
        }
    }
}

fn to_basis_points(id: HeldItemId, ratio: f64) -> Result<u32, ConfigurationError> {
    if !ratio.is_finite() || !(0.0..=100.0).contains(&ratio) {
        return Err(ConfigurationError::InvalidParameter {
            id,
            reason: format!("ratio {ratio} is out of range"),
        });
    }
    Ok((ratio * BASIS_POINTS as f64).round() as u32)
}

/// `floor(value * (1 + stack * ratio))` in fixed point.
fn scale(value: u32, stack: u32, boost_bp: u32) -> u32 {
    let factor = BASIS_POINTS + u64::from(stack) * u64::from(boost_bp);
    (u64::from(value) * factor / BASIS_POINTS).min(u64::from(u32::MAX)) as u32
}
