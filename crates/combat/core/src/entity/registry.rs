use crate::entity::CombatEntity;
use crate::types::{EntityId, Faction};

/// Storage the combat core borrows entities from.
///
/// `ids` must return a stable order; every participant iteration in the
/// core follows it.
pub trait EntityRegistry: Send {
    fn get(&self, id: EntityId) -> Option<&CombatEntity>;

    fn get_mut(&mut self, id: EntityId) -> Option<&mut CombatEntity>;

    fn ids(&self) -> Vec<EntityId>;

    fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    fn faction_of(&self, id: EntityId) -> Option<Faction> {
        self.get(id).map(|e| e.faction)
    }

    fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(CombatEntity::is_alive)
    }

    /// Living members of `faction`, in registry order.
    fn living_in_faction(&self, faction: Faction) -> Vec<EntityId> {
        self.ids()
            .into_iter()
            .filter(|id| {
                self.get(*id)
                    .is_some_and(|e| e.faction == faction && e.is_alive())
            })
            .collect()
    }
}

/// Insertion-ordered in-memory registry.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<CombatEntity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entity` under a freshly allocated id.
    pub fn spawn(&mut self, mut entity: CombatEntity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.assign_id(id);
        self.entities.push(entity);
        id
    }

    /// Stores `entity` under its own id, replacing an existing entry in place.
    pub fn insert(&mut self, entity: CombatEntity) {
        self.next_id = self.next_id.max(entity.id.0 + 1);
        match self.entities.iter_mut().find(|e| e.id == entity.id) {
            Some(slot) => *slot = entity,
            None => self.entities.push(entity),
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<CombatEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEntity> {
        self.entities.iter()
    }
}

impl EntityRegistry for EntityStore {
    fn get(&self, id: EntityId) -> Option<&CombatEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut CombatEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeKind;

    #[test]
    fn spawn_assigns_ids_in_order() {
        let mut store = EntityStore::new();
        let a = store.spawn(CombatEntity::new(EntityId(99), "a", Faction::PLAYER));
        let b = store.spawn(CombatEntity::new(EntityId(99), "b", Faction::ENEMY));

        assert_eq!((a, b), (EntityId(0), EntityId(1)));
        assert_eq!(store.ids(), vec![a, b]);
        assert_eq!(store.get(b).unwrap().attributes.owner(), b);
        assert_eq!(store.faction_of(b), Some(Faction::ENEMY));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut store = EntityStore::new();
        store.insert(CombatEntity::new(EntityId(4), "first", Faction::PLAYER));
        store.insert(CombatEntity::new(EntityId(2), "second", Faction::PLAYER));
        store.insert(
            CombatEntity::new(EntityId(4), "again", Faction::PLAYER)
                .with_resource(AttributeKind::Health, 10.0),
        );

        assert_eq!(store.ids(), vec![EntityId(4), EntityId(2)]);
        assert_eq!(store.get(EntityId(4)).unwrap().name, "again");
        assert_eq!(store.spawn(CombatEntity::new(EntityId(0), "c", Faction::ENEMY)), EntityId(5));
    }

    #[test]
    fn liveness_queries() {
        let mut store = EntityStore::new();
        let a = store.spawn(CombatEntity::new(EntityId(0), "a", Faction::ENEMY));
        let b = store.spawn(CombatEntity::new(EntityId(0), "b", Faction::ENEMY));
        store.get_mut(a).unwrap().flags.alive = false;

        assert!(!store.is_alive(a));
        assert_eq!(store.living_in_faction(Faction::ENEMY), vec![b]);
        assert!(!store.is_alive(EntityId(42)));
    }
}
