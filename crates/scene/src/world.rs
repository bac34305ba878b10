use std::collections::HashMap;

use foundation::ids::ItemId;

use crate::item::MapItem;

/// Snapshot of the items currently visible on the map.
///
/// Each item keeps the coordinates it arrived with; layouts never write back
/// into the set, which is what lets a collapse restore exact originals.
///
/// Ordering contract:
/// - `items()` preserves the host's input order.
/// - Duplicate ids keep their first occurrence; later ones are dropped.
#[derive(Debug, Default, Clone)]
pub struct MarkerSet {
    items: Vec<MapItem>,
    index: HashMap<ItemId, usize>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<MapItem>) -> Self {
        let mut set = Self::default();
        for item in items {
            set.insert(item);
        }
        set
    }

    /// Inserts `item` unless its id is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, item: MapItem) -> bool {
        if self.index.contains_key(&item.id) {
            return false;
        }
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
        true
    }

    pub fn get(&self, id: &ItemId) -> Option<&MapItem> {
        self.index.get(id).and_then(|&idx| self.items.get(idx))
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    pub fn items(&self) -> &[MapItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
