use schema::{Move, PokemonType, Side, StatType, StatusCondition};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// Stable identifier of a combatant for the whole battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn get(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.special_attack,
            StatType::SpecialDefense => self.special_defense,
            StatType::Speed => self.speed,
            // Accuracy and evasion only exist as stages.
            StatType::Accuracy | StatType::Evasion => 0,
        }
    }
}

/// Volatile markers cleared when the actor leaves the field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VolatileTag {
    /// Spent its last action charging this move; the next use releases it.
    Charging(Move),
    /// Held effects marked suppressable do not run.
    ItemsSuppressed,
}

/// A move that will be executed automatically on the actor's next turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueuedMove {
    pub move_id: Move,
    pub targets: Vec<ActorId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveResult {
    Hit,
    Miss,
    /// Resolved without hitting or missing, e.g. a charge turn.
    Other,
    /// No valid target remained.
    Fail,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MoveUseRecord {
    pub move_id: Move,
    pub targets: Vec<ActorId>,
    pub result: MoveResult,
    pub turn: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub side: Side,
    /// Field position. `None` while benched.
    pub slot: Option<u8>,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub stats: BaseStats,
    pub max_hp: u16,
    pub hp: u16,
    pub stat_stages: BTreeMap<StatType, i8>,
    pub status: Option<StatusCondition>,
    pub volatile_tags: BTreeSet<VolatileTag>,
    pub deferred_moves: VecDeque<QueuedMove>,
    /// Append-only log of resolved moves.
    pub move_history: Vec<MoveUseRecord>,
    pub moves: Vec<Move>,
    pub experience: u32,
    pub friendship: u8,
    /// Base experience granted to each opponent that sees this actor faint.
    pub experience_yield: u32,
    pub fainted: bool,
}

impl Actor {
    pub fn new(
        id: ActorId,
        name: impl Into<String>,
        side: Side,
        level: u8,
        types: Vec<PokemonType>,
        stats: BaseStats,
        moves: Vec<Move>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            slot: None,
            level,
            types,
            stats,
            max_hp: stats.hp,
            hp: stats.hp,
            stat_stages: BTreeMap::new(),
            status: None,
            volatile_tags: BTreeSet::new(),
            deferred_moves: VecDeque::new(),
            move_history: Vec::new(),
            moves,
            experience: 0,
            friendship: 70,
            experience_yield: 64,
            fainted: false,
        }
    }

    /// On the field means holding a slot and still standing.
    pub fn is_on_field(&self) -> bool {
        self.slot.is_some() && !self.fainted
    }

    pub fn knows_move(&self, move_id: Move) -> bool {
        self.moves.contains(&move_id)
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.fainted {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// True when current HP is at or below `numerator / denominator` of max.
    pub fn hp_at_most(&self, numerator: u32, denominator: u32) -> bool {
        u32::from(self.hp) * denominator <= u32::from(self.max_hp) * numerator
    }

    // === Stat Stage Management ===

    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    pub fn set_stat_stage(&mut self, stat: StatType, stage: i8) {
        let clamped_stage = stage.clamp(-6, 6);
        if clamped_stage == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, clamped_stage);
        }
    }

    /// Applies `delta` within -6..=6 and returns `(old, new)`.
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> (i8, i8) {
        let old_stage = self.get_stat_stage(stat);
        self.set_stat_stage(stat, old_stage.saturating_add(delta));
        (old_stage, self.get_stat_stage(stat))
    }

    // === Volatile State ===

    pub fn has_tag(&self, tag: VolatileTag) -> bool {
        self.volatile_tags.contains(&tag)
    }

    pub fn add_tag(&mut self, tag: VolatileTag) {
        self.volatile_tags.insert(tag);
    }

    pub fn remove_tag(&mut self, tag: VolatileTag) -> bool {
        self.volatile_tags.remove(&tag)
    }

    pub fn charging_move(&self) -> Option<Move> {
        self.volatile_tags.iter().find_map(|tag| match tag {
            VolatileTag::Charging(move_id) => Some(*move_id),
            VolatileTag::ItemsSuppressed => None,
        })
    }

    /// Drops everything that does not survive leaving the field.
    pub fn clear_volatile(&mut self) {
        self.volatile_tags.clear();
        self.deferred_moves.clear();
        self.stat_stages.clear();
    }

    pub fn record_move(&mut self, record: MoveUseRecord) {
        self.move_history.push(record);
    }

    pub fn last_move(&self) -> Option<&MoveUseRecord> {
        self.move_history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_actor() -> Actor {
        let stats = BaseStats {
            hp: 100,
            attack: 50,
            defense: 50,
            special_attack: 50,
            special_defense: 50,
            speed: 50,
        };
        Actor::new(
            ActorId(1),
            "Sample",
            Side::Player,
            50,
            vec![PokemonType::Normal],
            stats,
            vec![Move::Tackle],
        )
    }

    #[test]
    fn test_stat_stages_clamp_and_report_change() {
        let mut actor = sample_actor();

        assert_eq!(actor.modify_stat_stage(StatType::Attack, 4), (0, 4));
        assert_eq!(actor.modify_stat_stage(StatType::Attack, 4), (4, 6));
        assert_eq!(actor.modify_stat_stage(StatType::Attack, -12), (6, -6));
        assert_eq!(actor.modify_stat_stage(StatType::Attack, 6), (-6, 0));
        assert!(actor.stat_stages.is_empty());
    }

    #[test]
    fn test_damage_and_heal_are_bounded() {
        let mut actor = sample_actor();

        assert_eq!(actor.take_damage(30), 30);
        assert_eq!(actor.heal(50), 30);
        assert_eq!(actor.take_damage(500), 100);
        assert_eq!(actor.hp, 0);
    }

    #[test]
    fn test_hp_thresholds() {
        let mut actor = sample_actor();
        actor.hp = 50;
        assert!(actor.hp_at_most(1, 2));
        assert!(!actor.hp_at_most(1, 4));
        actor.hp = 25;
        assert!(actor.hp_at_most(1, 4));
    }

    #[test]
    fn test_leaving_field_clears_volatile_state() {
        let mut actor = sample_actor();
        actor.add_tag(VolatileTag::Charging(Move::SolarBeam));
        actor.deferred_moves.push_back(QueuedMove {
            move_id: Move::SolarBeam,
            targets: vec![ActorId(2)],
        });
        actor.modify_stat_stage(StatType::Defense, 1);
        actor.status = Some(StatusCondition::Burn);

        assert_eq!(actor.charging_move(), Some(Move::SolarBeam));
        actor.clear_volatile();

        assert_eq!(actor.charging_move(), None);
        assert!(actor.deferred_moves.is_empty());
        assert_eq!(actor.get_stat_stage(StatType::Defense), 0);
        assert_eq!(actor.status, Some(StatusCondition::Burn));
    }
}
