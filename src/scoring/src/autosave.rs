use log::debug;
use serde::Serialize;
use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveStatus {
    Unsaved,
    Saving,
    Saved,
}

/// Handed out when a save starts; identifies the state revision being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    revision: u64,
}

/// Debounce state machine for background saves. It never sleeps itself: the
/// owner asks for the deadline, waits, and reports back with explicit instants.
#[derive(Debug, Clone)]
pub struct AutosaveCoordinator {
    quiet_period: Duration,
    status: SaveStatus,
    revision: u64,
    deadline: Option<Instant>,
}

impl Default for AutosaveCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl AutosaveCoordinator {
    pub fn new(quiet_period: Duration) -> Self {
        AutosaveCoordinator {
            quiet_period,
            status: SaveStatus::Saved,
            revision: 0,
            deadline: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn mark_dirty(&mut self, now: Instant) {
        self.revision += 1;
        self.status = SaveStatus::Unsaved;
        self.deadline = Some(now + self.quiet_period);
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    pub fn begin(&mut self, now: Instant) -> Option<SaveTicket> {
        if !self.is_due(now) {
            return None;
        }

        self.deadline = None;
        self.status = SaveStatus::Saving;

        Some(SaveTicket {
            revision: self.revision,
        })
    }

    /// Autosave precondition failed: nothing is written and nothing is re-armed.
    pub fn skip(&mut self) {
        self.deadline = None;
        self.status = SaveStatus::Unsaved;
    }

    pub fn complete(&mut self, ticket: SaveTicket, succeeded: bool) {
        let newer_changes = ticket.revision != self.revision;

        self.status = match (succeeded, newer_changes) {
            (true, false) => SaveStatus::Saved,
            (true, true) => {
                debug!("revision {} saved, newer changes pending", ticket.revision);
                SaveStatus::Unsaved
            }
            (false, _) => SaveStatus::Unsaved,
        };
    }

    pub fn saved_manually(&mut self) {
        self.deadline = None;
        self.status = SaveStatus::Saved;
    }

    pub fn manual_failed(&mut self) {
        self.status = SaveStatus::Unsaved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_produces_single_due_save() {
        let start = Instant::now();
        let mut coordinator = AutosaveCoordinator::new(Duration::from_secs(3));

        for i in 0..5 {
            coordinator.mark_dirty(start + Duration::from_millis(500 * i));
        }

        let last = start + Duration::from_millis(2000);

        assert!(coordinator.begin(last + Duration::from_millis(2999)).is_none());
        assert_eq!(coordinator.status(), SaveStatus::Unsaved);

        let ticket = coordinator.begin(last + Duration::from_secs(3));
        assert!(ticket.is_some());
        assert_eq!(coordinator.status(), SaveStatus::Saving);
        assert!(coordinator.begin(last + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_success_marks_saved() {
        let now = Instant::now();
        let mut coordinator = AutosaveCoordinator::default();

        coordinator.mark_dirty(now);
        let ticket = coordinator.begin(now + DEFAULT_QUIET_PERIOD).unwrap();
        coordinator.complete(ticket, true);

        assert_eq!(coordinator.status(), SaveStatus::Saved);
        assert_eq!(coordinator.deadline(), None);
    }

    #[test]
    fn test_failure_reverts_without_rearming() {
        let now = Instant::now();
        let mut coordinator = AutosaveCoordinator::default();

        coordinator.mark_dirty(now);
        let ticket = coordinator.begin(now + DEFAULT_QUIET_PERIOD).unwrap();
        coordinator.complete(ticket, false);

        assert_eq!(coordinator.status(), SaveStatus::Unsaved);
        assert_eq!(coordinator.deadline(), None);
    }

    #[test]
    fn test_mutation_during_save_keeps_unsaved() {
        let now = Instant::now();
        let mut coordinator = AutosaveCoordinator::default();

        coordinator.mark_dirty(now);
        let ticket = coordinator.begin(now + DEFAULT_QUIET_PERIOD).unwrap();
        coordinator.mark_dirty(now + Duration::from_secs(4));
        coordinator.complete(ticket, true);

        assert_eq!(coordinator.status(), SaveStatus::Unsaved);
        assert_eq!(coordinator.deadline(), Some(now + Duration::from_secs(7)));
    }

    #[test]
    fn test_skip_clears_deadline() {
        let now = Instant::now();
        let mut coordinator = AutosaveCoordinator::default();

        coordinator.mark_dirty(now);
        coordinator.skip();

        assert_eq!(coordinator.status(), SaveStatus::Unsaved);
        assert!(!coordinator.is_due(now + Duration::from_secs(60)));
    }
}
