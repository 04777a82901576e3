use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{AppointmentType, Patient, Slot};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    BookingNeeds,
    AskingPref,
    SuggestingSlots,
    CollectInfo,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::BookingNeeds => "booking_needs",
            SessionState::AskingPref => "asking_pref",
            SessionState::SuggestingSlots => "suggesting_slots",
            SessionState::CollectInfo => "collect_info",
        }
    }
}

/// Accumulated booking-in-progress data. `chosen_slot`, when present, was
/// a member of `suggested_slots` at the time it was set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingContext {
    pub appointment_type: Option<AppointmentType>,
    pub target_date: Option<NaiveDate>,
    pub suggested_slots: Vec<Slot>,
    pub chosen_slot: Option<Slot>,
    pub patient: Option<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub role: String,
    pub text: String,
    pub ts: NaiveDateTime,
}

/// One caller's multi-turn conversation. Created on first reference to an
/// unknown id; held in memory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: SessionState,
    pub context: BookingContext,
    pub messages: Vec<TurnRecord>,
}

impl Session {
    pub fn new(id: String) -> Self {
        Self {
            id,
            state: SessionState::Idle,
            context: BookingContext::default(),
            messages: Vec::new(),
        }
    }
}
