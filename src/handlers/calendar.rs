use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{AppointmentType, BookingRequest, BookingResult, DayAvailability};
use crate::services::availability::{self, ClinicHours};
use crate::services::booking;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    #[serde(default = "default_appointment_type")]
    pub appointment_type: String,
}

fn default_appointment_type() -> String {
    "consultation".to_string()
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DayAvailability>, AppError> {
    let hours = ClinicHours::from_config(&state.config);
    let kind = AppointmentType::parse(&query.appointment_type);

    let day = {
        let db = state.db.lock().unwrap();
        availability::list_slots(&db, hours, &query.date, kind)?
    };
    Ok(Json(day))
}

/// Reservation failures come back as 200 with a failed status body; only
/// infrastructure errors surface as 5xx.
pub async fn book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingResult>, AppError> {
    let result = {
        let db = state.db.lock().unwrap();
        booking::reserve(&db, &req)?
    };
    Ok(Json(result))
}
