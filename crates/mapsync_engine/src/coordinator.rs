//! Coordinator abstraction over local storage callbacks.

use mapsync_protocol::{Category, Incident, Location};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// The coordinator owns domain storage and task lifecycle bookkeeping.
///
/// The engine constructs records transiently and hands them over through
/// these callbacks; it never retains a record after the call returns.
pub trait SyncCoordinator: Send + Sync {
    /// Ingests a pulled category.
    fn add_category(&self, category: Category);

    /// Ingests a pulled incident.
    fn add_incident(&self, incident: Incident);

    /// Ingests a pulled location.
    fn add_location(&self, location: Location);

    /// Returns the incidents pending submission, in submission order.
    fn pending_incidents(&self) -> Vec<Incident>;

    /// Records that an incident was accepted by the remote service.
    fn update_posted(&self, incident: &Incident);

    /// Records that an incident submission failed.
    fn update_failed(&self, incident: &Incident);

    /// Called once per task after it finishes, whatever the outcome of
    /// its sub-operations.
    fn task_completed(&self);
}

/// An in-memory coordinator for tests and simple embeddings.
#[derive(Default)]
pub struct MemoryCoordinator {
    categories: RwLock<Vec<Category>>,
    incidents: RwLock<Vec<Incident>>,
    locations: RwLock<Vec<Location>>,
    pending: RwLock<Vec<Incident>>,
    posted: RwLock<Vec<Incident>>,
    failed: RwLock<Vec<Incident>>,
    tasks_completed: AtomicU64,
}

impl MemoryCoordinator {
    /// Creates an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an incident to the pending submission list.
    pub fn add_pending(&self, incident: Incident) {
        self.pending.write().push(incident);
    }

    /// All ingested categories.
    pub fn categories(&self) -> Vec<Category> {
        self.categories.read().clone()
    }

    /// All ingested incidents.
    pub fn incidents(&self) -> Vec<Incident> {
        self.incidents.read().clone()
    }

    /// All ingested locations.
    pub fn locations(&self) -> Vec<Location> {
        self.locations.read().clone()
    }

    /// Incidents recorded as posted.
    pub fn posted(&self) -> Vec<Incident> {
        self.posted.read().clone()
    }

    /// Incidents recorded as failed.
    pub fn failed(&self) -> Vec<Incident> {
        self.failed.read().clone()
    }

    /// Number of completed tasks.
    pub fn tasks_completed(&self) -> u64 {
        self.tasks_completed.load(Ordering::SeqCst)
    }
}

impl SyncCoordinator for MemoryCoordinator {
    fn add_category(&self, category: Category) {
        self.categories.write().push(category);
    }

    fn add_incident(&self, incident: Incident) {
        self.incidents.write().push(incident);
    }

    fn add_location(&self, location: Location) {
        self.locations.write().push(location);
    }

    fn pending_incidents(&self) -> Vec<Incident> {
        self.pending.read().clone()
    }

    fn update_posted(&self, incident: &Incident) {
        self.posted.write().push(incident.clone());
    }

    fn update_failed(&self, incident: &Incident) {
        self.failed.write().push(incident.clone());
    }

    fn task_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_stored() {
        let coordinator = MemoryCoordinator::new();
        coordinator.add_category(Category::new(5, "Fire", "d"));
        coordinator.add_location(Location::new(3, "Market", -1.28, 36.81));

        assert_eq!(coordinator.categories().len(), 1);
        assert_eq!(coordinator.locations().len(), 1);
        assert!(coordinator.incidents().is_empty());
    }

    #[test]
    fn pending_preserves_order() {
        let coordinator = MemoryCoordinator::new();
        let location = Location::new(3, "Market", -1.28, 36.81);
        coordinator.add_pending(Incident::new(1, "first", "", location.clone()));
        coordinator.add_pending(Incident::new(2, "second", "", location));

        let pending = coordinator.pending_incidents();
        assert_eq!(pending[0].remote_id, 1);
        assert_eq!(pending[1].remote_id, 2);
    }

    #[test]
    fn task_counter_increments() {
        let coordinator = MemoryCoordinator::new();
        coordinator.task_completed();
        coordinator.task_completed();
        assert_eq!(coordinator.tasks_completed(), 2);
    }
}
