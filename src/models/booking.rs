use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentType {
    Consultation,
    Followup,
    Physical,
    Specialist,
}

impl AppointmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::Consultation => "consultation",
            AppointmentType::Followup => "followup",
            AppointmentType::Physical => "physical",
            AppointmentType::Specialist => "specialist",
        }
    }

    /// Unknown type strings fall back to a 30-minute consultation.
    pub fn parse(s: &str) -> Self {
        match s {
            "followup" => AppointmentType::Followup,
            "physical" => AppointmentType::Physical,
            "specialist" => AppointmentType::Specialist,
            _ => AppointmentType::Consultation,
        }
    }

    pub fn duration_minutes(&self) -> u16 {
        match self {
            AppointmentType::Consultation => 30,
            AppointmentType::Followup => 15,
            AppointmentType::Physical => 45,
            AppointmentType::Specialist => 60,
        }
    }
}

/// A confirmed reservation on the ledger. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub appointment_type: AppointmentType,
    pub patient: Patient,
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Inbound reservation payload. The appointment type arrives as a raw
/// string; the end time is always recomputed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub appointment_type: String,
    pub date: String,
    pub start_time: String,
    pub patient: Patient,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReserveFailure {
    InvalidDate,
    InvalidStartTime,
    Conflict,
    InvalidPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetails {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub patient: Patient,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub status: BookingStatus,
    pub confirmation_code: String,
    pub details: BookingDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFailure {
    pub status: BookingStatus,
    pub reason: ReserveFailure,
}

impl BookingFailure {
    pub fn new(reason: ReserveFailure) -> Self {
        Self {
            status: BookingStatus::Failed,
            reason,
        }
    }
}

/// Wire-level outcome of a reservation attempt. Both arms serialize flat,
/// matching the booking endpoint's historical response shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingResult {
    Confirmed(BookingConfirmation),
    Failed(BookingFailure),
}
