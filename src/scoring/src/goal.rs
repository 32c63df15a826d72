use crate::half::Half;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position on the match clock at which an event was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockStamp {
    pub minute: u32,
    pub second: u32,
    pub half: Half,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvent {
    pub id: String,
    pub minute: u32,
    pub second: u32,
    pub half: Half,
}

impl GoalEvent {
    pub fn new(stamp: ClockStamp) -> Self {
        GoalEvent {
            id: Uuid::new_v4().to_string(),
            minute: stamp.minute,
            second: stamp.second,
            half: stamp.half,
        }
    }
}

/// Goals of a single player, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalLedger {
    events: Vec<GoalEvent>,
}

impl GoalLedger {
    pub fn new() -> Self {
        GoalLedger { events: Vec::new() }
    }

    pub fn add(&mut self, event: GoalEvent) -> &GoalEvent {
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    /// Undo of the most recent goal. There is no removal by id.
    pub fn remove_last(&mut self) -> Option<GoalEvent> {
        self.events.pop()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn in_half(&self, half: Half) -> usize {
        self.events.iter().filter(|e| e.half == half).count()
    }

    pub fn events(&self) -> &[GoalEvent] {
        &self.events
    }
}

impl From<Vec<GoalEvent>> for GoalLedger {
    fn from(events: Vec<GoalEvent>) -> Self {
        GoalLedger { events }
    }
}
