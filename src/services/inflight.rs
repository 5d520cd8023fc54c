use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::types::ProductId;

/// Products with an outstanding update request.
///
/// Shared by all workers; at most one update per product is in flight.
#[derive(Debug, Default)]
pub struct InFlightUpdates {
    ids: Mutex<HashSet<ProductId>>,
}

impl InFlightUpdates {
    fn ids(&self) -> MutexGuard<'_, HashSet<ProductId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `id` as in flight. Returns `None` if it already is.
    pub fn try_acquire(&self, id: ProductId) -> Option<InFlightGuard<'_>> {
        if self.ids().insert(id) {
            Some(InFlightGuard { owner: self, id })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, id: ProductId) -> bool {
        self.ids().contains(&id)
    }
}

/// Releases the product when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlightUpdates,
    id: ProductId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.ids().remove(&self.id);
    }
}
