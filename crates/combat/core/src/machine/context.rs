use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use crate::entity::EntityRegistry;
use crate::machine::CombatPhase;
use crate::skill::{CastCommitment, TargetSet};
use crate::types::{CombatId, EntityId, Faction, Tick};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatResult {
    #[default]
    Unknown,
    Victory,
    Defeat,
    Draw,
}

impl CombatResult {
    pub fn terminal_phase(self) -> Option<CombatPhase> {
        match self {
            Self::Unknown => None,
            Self::Victory => Some(CombatPhase::Victory),
            Self::Defeat => Some(CombatPhase::Defeat),
            Self::Draw => Some(CombatPhase::Draw),
        }
    }
}

/// Open-ended per-encounter storage keyed by type.
#[derive(Default)]
pub struct SideChannel {
    entries: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl SideChannel {
    pub fn insert<T: Any + Send>(&mut self, value: T) -> Option<T> {
        self.entries
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any + Send>(&self) -> Option<&T> {
        self.entries.get(&TypeId::of::<T>())?.downcast_ref()
    }

    pub fn get_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.entries.get_mut(&TypeId::of::<T>())?.downcast_mut()
    }

    pub fn remove<T: Any + Send>(&mut self) -> Option<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    pub fn contains<T: Any + Send>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for SideChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideChannel")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// State of one participant when the battle started.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantSnapshot {
    pub id: EntityId,
    pub name: String,
    pub faction: Faction,
    pub health: f64,
    pub max_health: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantSnapshots(pub Vec<ParticipantSnapshot>);

/// Spoils credited to each surviving winner.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub recipients: Vec<EntityId>,
    pub experience_each: f64,
    pub gold_each: f64,
}

/// Whose turn it is in turn-based mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnState {
    pub roster_index: usize,
    pub acted: BTreeSet<EntityId>,
    pub end_requested: bool,
}

/// A manual skill use travelling through the cast/execute/damage phases.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingAction {
    pub caster: EntityId,
    pub return_to: CombatPhase,
    pub commitment: Option<CastCommitment>,
    pub targets: Option<TargetSet>,
}

impl PendingAction {
    pub fn new(caster: EntityId, return_to: CombatPhase) -> Self {
        Self {
            caster,
            return_to,
            commitment: None,
            targets: None,
        }
    }
}

/// Final summary produced by the terminal phase.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatReport {
    pub combat_id: CombatId,
    pub result: CombatResult,
    pub turns: u64,
    pub started_at: Tick,
    pub ended_at: Tick,
    pub survivors: Vec<EntityId>,
    pub rewards: Option<Rewards>,
}

/// Everything scoped to one encounter.
#[derive(Debug)]
pub struct CombatContext {
    pub combat_id: CombatId,
    /// Ordered participant lists, one per side. The first is the player side.
    pub rosters: Vec<Vec<EntityId>>,
    pub turn_counter: u64,
    pub result: CombatResult,
    pub side: SideChannel,
    pub resume_phase: Option<CombatPhase>,
    pub turn: Option<TurnState>,
    pub pending: Option<PendingAction>,
    pub started_at: Tick,
    pub report: Option<CombatReport>,
}

impl CombatContext {
    pub fn new(combat_id: CombatId, rosters: Vec<Vec<EntityId>>, started_at: Tick) -> Self {
        Self {
            combat_id,
            rosters,
            turn_counter: 0,
            result: CombatResult::Unknown,
            side: SideChannel::default(),
            resume_phase: None,
            turn: None,
            pending: None,
            started_at,
            report: None,
        }
    }

    pub fn participants(&self) -> Vec<EntityId> {
        self.rosters
            .iter()
            .flat_map(|r| r.iter().copied())
            .collect()
    }

    pub fn roster_of(&self, id: EntityId) -> Option<usize> {
        self.rosters.iter().position(|r| r.contains(&id))
    }

    pub fn living(&self, roster: usize, registry: &dyn EntityRegistry) -> Vec<EntityId> {
        self.rosters
            .get(roster)
            .map(|r| r.iter().copied().filter(|id| registry.is_alive(*id)).collect())
            .unwrap_or_default()
    }

    /// Decides the battle once a roster has nobody left standing.
    ///
    /// Player side wiped → `Defeat`; every other roster wiped → `Victory`;
    /// both → `Draw`.
    pub fn evaluate_result(&self, registry: &dyn EntityRegistry) -> CombatResult {
        let wiped = |index: usize| self.living(index, registry).is_empty();
        let player_wiped = wiped(0);
        let others_wiped = (1..self.rosters.len()).all(wiped);
        match (player_wiped, others_wiped) {
            (true, true) => CombatResult::Draw,
            (true, false) => CombatResult::Defeat,
            (false, true) => CombatResult::Victory,
            (false, false) => CombatResult::Unknown,
        }
    }

    /// Records the result if the battle is decided; returns whether it is.
    pub fn check_end(&mut self, registry: &dyn EntityRegistry) -> bool {
        let result = self.evaluate_result(registry);
        if result != CombatResult::Unknown {
            self.result = result;
        }
        self.result != CombatResult::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn side_channel_is_keyed_by_type() {
        let mut side = SideChannel::default();
        assert!(side.insert(Marker(1)).is_none());
        assert_eq!(side.insert(Marker(2)), Some(Marker(1)));
        side.insert(Rewards::default());

        side.get_mut::<Marker>().unwrap().0 += 1;
        assert_eq!(side.get::<Marker>(), Some(&Marker(3)));
        assert_eq!(side.len(), 2);
        assert_eq!(side.remove::<Marker>(), Some(Marker(3)));
        assert!(!side.contains::<Marker>());
    }
}
