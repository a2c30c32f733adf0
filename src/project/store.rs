//! In-memory take list
//!
//! Append-only; grows by one take per completed recording.

use super::bundle::StoreError;
use super::schema::Take;

#[derive(Debug, Clone, Default)]
pub struct TakeStore {
    takes: Vec<Take>,
    dirty: bool,
}

impl TakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded takes, giving any take without locations
    /// the default location set.
    pub fn load(takes: Vec<Take>) -> Self {
        let mut store = Self {
            takes,
            dirty: false,
        };

        let mut repaired = 0;
        for take in store.takes.iter_mut().filter(|t| t.locations.is_empty()) {
            take.use_default_locations();
            repaired += 1;
        }
        if repaired > 0 {
            tracing::info!("Backfilled default locations on {} take(s)", repaired);
        }

        store
    }

    /// Append a take and mark the store dirty. Returns its index.
    pub fn add(&mut self, take: Take) -> usize {
        self.takes.push(take);
        self.dirty = true;
        self.takes.len() - 1
    }

    pub fn list(&self) -> &[Take] {
        &self.takes
    }

    pub fn get(&self, index: usize) -> Option<&Take> {
        self.takes.get(index)
    }

    /// Like [`get`](Self::get), reporting a missing index as an error
    pub fn try_get(&self, index: usize) -> Result<&Take, StoreError> {
        self.takes.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.takes.len(),
        })
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Take> {
        self.takes.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.takes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.takes.is_empty()
    }

    /// Whether takes were added since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
