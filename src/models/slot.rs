use serde::{Deserialize, Serialize};

/// A candidate appointment window. Derived per availability query, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: String,
    pub available_slots: Vec<Slot>,
}
