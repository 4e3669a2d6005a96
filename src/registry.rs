// Focus registry: the live mapping from region ids to geometry accessors.
// Geometry is never cached; every query goes back to the accessor.

use crate::types::*;

/// A focusable region's live geometry.
pub trait Region {
    /// Current screen rectangle, read at call time.
    fn rect(&self) -> Rect;
}

impl<F> Region for F
where
    F: Fn() -> Rect,
{
    fn rect(&self) -> Rect {
        self()
    }
}

struct Entry<R> {
    id: RegionId,
    region: R,
}

/// Insertion-ordered set of registered regions.
///
/// Iteration order is registration order; re-registering an id swaps its
/// accessor in place without moving it.
pub struct FocusRegistry<R> {
    entries: Vec<Entry<R>>,
}

impl<R: Region> FocusRegistry<R> {
    pub fn new() -> Self {
        FocusRegistry {
            entries: Vec::new(),
        }
    }

    /// Add or replace a region. Returns the replaced accessor, if any.
    pub fn insert(&mut self, id: RegionId, region: R) -> Option<R> {
        match self.position(id.as_str()) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].region, region)),
            None => {
                self.entries.push(Entry { id, region });
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<R> {
        self.position(id)
            .map(|index| self.entries.remove(index).region)
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.position(id).map(|index| &self.entries[index].region)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Live rectangle for `id`.
    pub fn rect_of(&self, id: &str) -> Option<Rect> {
        self.get(id).map(Region::rect)
    }

    /// First registered id, in iteration order.
    pub fn first_id(&self) -> Option<&RegionId> {
        self.entries.first().map(|entry| &entry.id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RegionId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &R)> {
        self.entries.iter().map(|entry| (&entry.id, &entry.region))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

impl<R: Region> Default for FocusRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}
