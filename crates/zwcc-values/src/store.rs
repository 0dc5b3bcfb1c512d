//! The value store.
//!
//! Values are kept per network in insertion order. Each entry sits behind its
//! own lock so that many handles may read a value at once while writes to it
//! are serialized. A [`ValueRef`] keeps its entry alive: removing a node only
//! unlinks the entries, it never frees one that is still checked out.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::{Value, ValueData, ValueId, ValueResult};

// ============================================================================
// Value Handle
// ============================================================================

/// A checked-out handle to a stored value.
///
/// The handle is released when dropped.
#[derive(Debug, Clone)]
pub struct ValueRef {
    id: ValueId,
    entry: Arc<RwLock<Value>>,
}

impl ValueRef {
    /// The id of the referenced value.
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// Borrow the value for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.entry.read()
    }

    /// Copy the current state of the value.
    pub fn snapshot(&self) -> Value {
        self.entry.read().clone()
    }

    /// Store data reported by the device.
    ///
    /// Returns whether the datum changed.
    pub fn on_value_refreshed(&self, data: ValueData) -> ValueResult<bool> {
        let mut value = self.entry.write();
        let changed = value.on_value_refreshed(data)?;
        if changed {
            log::debug!("refreshed {} -> {}", value.label(), value.data());
        } else {
            log::trace!("refreshed {} (unchanged)", value.label());
        }
        Ok(changed)
    }
}

// ============================================================================
// Value Store
// ============================================================================

#[derive(Debug, Default)]
struct StoreInner {
    order: Vec<ValueId>,
    entries: HashMap<ValueId, Arc<RwLock<Value>>>,
}

/// Addressed, typed values for one network.
#[derive(Debug, Default)]
pub struct ValueStore {
    inner: RwLock<StoreInner>,
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value, or return the existing entry with the same id.
    ///
    /// An existing entry is never replaced, so repeated creation keeps
    /// whatever the device has already reported.
    pub fn create(&self, value: Value) -> ValueRef {
        let id = value.id();
        let mut inner = self.inner.write();
        if let Some(entry) = inner.entries.get(&id) {
            return ValueRef {
                id,
                entry: Arc::clone(entry),
            };
        }

        log::debug!("creating value {} ({})", id, value.label());
        let entry = Arc::new(RwLock::new(value));
        inner.order.push(id);
        inner.entries.insert(id, Arc::clone(&entry));
        ValueRef { id, entry }
    }

    /// Check out a value by id.
    pub fn get(&self, id: &ValueId) -> Option<ValueRef> {
        self.inner.read().entries.get(id).map(|entry| ValueRef {
            id: *id,
            entry: Arc::clone(entry),
        })
    }

    /// Check out a value by its address within a network.
    pub fn lookup(
        &self,
        home_id: u32,
        node_id: u8,
        instance: u8,
        command_class_id: u8,
        index: u8,
    ) -> Option<ValueRef> {
        self.get(&ValueId::new(home_id, node_id, instance, command_class_id, index))
    }

    /// Whether a value with this id exists.
    pub fn contains(&self, id: &ValueId) -> bool {
        self.inner.read().entries.contains_key(id)
    }

    /// Snapshot every value of a node in creation order.
    pub fn values_for_node(&self, node_id: u8) -> Vec<Value> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter(|id| id.node_id == node_id)
            .filter_map(|id| inner.entries.get(id))
            .map(|entry| entry.read().clone())
            .collect()
    }

    /// Snapshot every value in creation order.
    pub fn values(&self) -> Vec<Value> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.entries.get(id))
            .map(|entry| entry.read().clone())
            .collect()
    }

    /// Drop every value belonging to a node. Returns how many were removed.
    pub fn remove_node(&self, node_id: u8) -> usize {
        let mut inner = self.inner.write();
        let before = inner.entries.len();
        inner.entries.retain(|id, _| id.node_id != node_id);
        inner.order.retain(|id| id.node_id != node_id);
        let removed = before - inner.entries.len();
        if removed > 0 {
            log::debug!("removed {} values of node {}", removed, node_id);
        }
        removed
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Whether the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of handles currently checked out across all values.
    pub fn outstanding_handles(&self) -> usize {
        self.inner
            .read()
            .entries
            .values()
            .map(|entry| Arc::strong_count(entry) - 1)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupIndex, ValueGenre};

    const HOME: u32 = 0x0100_0000;

    fn scene_id(node: u8, group: u8, field: u8) -> ValueId {
        ValueId::new(HOME, node, 1, 0x2D, GroupIndex::new(group, field).encode())
    }

    #[test]
    fn test_create_is_idempotent() {
        let store = ValueStore::new();
        let id = scene_id(5, 1, 0);

        let first = store.create(Value::byte(id, ValueGenre::System, "Button 1 Scene Id"));
        first.on_value_refreshed(ValueData::Byte(9)).unwrap();
        drop(first);

        // A second create keeps the existing entry and its datum
        let second = store.create(Value::byte(id, ValueGenre::System, "other label"));
        assert_eq!(second.read().label(), "Button 1 Scene Id");
        assert_eq!(second.read().data().as_u8(), Some(9));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let store = ValueStore::new();
        store.create(Value::byte(scene_id(5, 1, 0), ValueGenre::System, "a"));

        assert!(store.lookup(HOME, 6, 1, 0x2D, 2).is_none());
        assert!(store.lookup(HOME, 5, 2, 0x2D, 2).is_none());
        assert!(store.lookup(HOME, 5, 1, 0x2D, 3).is_none());
        assert!(store.lookup(HOME, 5, 1, 0x2D, 2).is_some());
    }

    #[test]
    fn test_insertion_order() {
        let store = ValueStore::new();
        for (group, field) in [(2, 0), (1, 1), (1, 0)] {
            store.create(Value::byte(scene_id(5, group, field), ValueGenre::System, "v"));
        }
        let indexes: Vec<u8> = store.values_for_node(5).iter().map(|v| v.id().index).collect();
        assert_eq!(indexes, vec![4, 3, 2]);
    }

    #[test]
    fn test_handles_released_on_drop() {
        let store = ValueStore::new();
        let id = scene_id(5, 1, 0);
        store.create(Value::byte(id, ValueGenre::System, "a"));
        assert_eq!(store.outstanding_handles(), 0);

        {
            let a = store.get(&id).unwrap();
            let _b = a.clone();
            assert_eq!(store.outstanding_handles(), 2);
        }
        assert_eq!(store.outstanding_handles(), 0);
    }

    #[test]
    fn test_remove_node_keeps_checked_out_entry_alive() {
        let store = ValueStore::new();
        store.create(Value::byte(scene_id(5, 1, 0), ValueGenre::System, "a"));
        store.create(Value::byte(scene_id(6, 1, 0), ValueGenre::System, "b"));

        let held = store.get(&scene_id(5, 1, 0)).unwrap();
        assert_eq!(store.remove_node(5), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&scene_id(5, 1, 0)).is_none());

        // The handle still works after the entry has been unlinked
        held.on_value_refreshed(ValueData::Byte(1)).unwrap();
        assert_eq!(held.read().data().as_u8(), Some(1));
    }

    #[test]
    fn test_refresh_visible_through_other_handles() {
        let store = ValueStore::new();
        let id = scene_id(5, 2, 1);
        let writer = store.create(Value::byte(id, ValueGenre::System, "d"));
        let reader = store.get(&id).unwrap();

        writer.on_value_refreshed(ValueData::Byte(10)).unwrap();
        assert!(reader.read().is_set());
        assert_eq!(reader.snapshot().data().as_u8(), Some(10));
    }
}
