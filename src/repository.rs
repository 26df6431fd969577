use std::collections::HashMap;
use std::hash::Hash;

/// Minimal persistence seam: add/get/remove/list per entity type. The bank
/// works against this trait so the in-memory default can be swapped for a
/// real store without touching the contract logic.
pub trait Repository<K, V> {
    fn add(&mut self, id: K, entity: V);
    fn get(&self, id: &K) -> Option<&V>;
    fn get_mut(&mut self, id: &K) -> Option<&mut V>;
    fn remove(&mut self, id: &K) -> Option<V>;
    fn contains(&self, id: &K) -> bool {
        self.get(id).is_some()
    }
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn list(&self) -> Vec<&V>;
}

#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    entities: HashMap<K, V>,
}

// derive(Default) would needlessly require K: Default + V: Default
impl<K, V> Default for InMemoryRepository<K, V> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }
}

impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Eq + Hash,
{
    fn add(&mut self, id: K, entity: V) {
        self.entities.insert(id, entity);
    }

    fn get(&self, id: &K) -> Option<&V> {
        self.entities.get(id)
    }

    fn get_mut(&mut self, id: &K) -> Option<&mut V> {
        self.entities.get_mut(id)
    }

    fn remove(&mut self, id: &K) -> Option<V> {
        self.entities.remove(id)
    }

    fn len(&self) -> usize {
        self.entities.len()
    }

    fn list(&self) -> Vec<&V> {
        self.entities.values().collect()
    }
}
