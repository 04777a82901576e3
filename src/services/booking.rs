use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{
    AppointmentType, Booking, BookingConfirmation, BookingDetails, BookingFailure, BookingRequest,
    BookingResult, BookingStatus, ReserveFailure,
};
use crate::services::availability::{overlaps, parse_hhmm, to_hhmm};

const MINUTES_PER_DAY: u16 = 24 * 60;

fn failed(reason: ReserveFailure) -> BookingResult {
    BookingResult::Failed(BookingFailure::new(reason))
}

/// Reserve a slot. The end time is recomputed from the appointment
/// type's duration; a client-supplied end is never trusted. Domain
/// failures come back as values, only the database can produce an `Err`.
///
/// The caller must hold the connection mutex for the duration of the
/// call: the conflict check and the append below form one critical
/// section, which is what keeps two overlapping reservations from both
/// succeeding.
pub fn reserve(conn: &Connection, req: &BookingRequest) -> anyhow::Result<BookingResult> {
    let Ok(date) = NaiveDate::parse_from_str(&req.date, "%Y-%m-%d") else {
        return Ok(failed(ReserveFailure::InvalidDate));
    };

    let Some(start) = parse_hhmm(&req.start_time) else {
        return Ok(failed(ReserveFailure::InvalidStartTime));
    };

    if req.patient.name.trim().is_empty() || !req.patient.email.contains('@') {
        return Ok(failed(ReserveFailure::InvalidPayload));
    }

    let kind = AppointmentType::parse(&req.appointment_type);
    let end = (start + kind.duration_minutes()) % MINUTES_PER_DAY;
    let start_str = to_hhmm(start);
    let end_str = to_hhmm(end);

    let existing = queries::bookings_on_date(conn, date)?;
    let conflict = existing.iter().any(|b| {
        let booked_start = parse_hhmm(&b.start_time).unwrap_or(0);
        let booked_end = parse_hhmm(&b.end_time).unwrap_or(0);
        overlaps(start, end, booked_start, booked_end)
    });
    if conflict {
        return Ok(failed(ReserveFailure::Conflict));
    }

    let hex = uuid::Uuid::new_v4().simple().to_string();
    let booking_id = format!("APPT-{}", hex[..12].to_uppercase());
    let confirmation_code = booking_id[booking_id.len() - 6..].to_string();

    let booking = Booking {
        id: booking_id.clone(),
        date,
        start_time: start_str.clone(),
        end_time: end_str.clone(),
        appointment_type: kind,
        patient: req.patient.clone(),
        reason: req.reason.clone(),
        created_at: Utc::now().naive_utc(),
    };
    queries::create_booking(conn, &booking)?;

    tracing::info!(booking_id = %booking_id, date = %date, start = %start_str, "booking confirmed");

    Ok(BookingResult::Confirmed(BookingConfirmation {
        booking_id,
        status: BookingStatus::Confirmed,
        confirmation_code,
        details: BookingDetails {
            date,
            start_time: start_str,
            end_time: end_str,
            patient: req.patient.clone(),
            reason: req.reason.clone(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::Patient;
    use std::sync::{Arc, Mutex};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn request(date: &str, start: &str) -> BookingRequest {
        BookingRequest {
            appointment_type: "consultation".to_string(),
            date: date.to_string(),
            start_time: start.to_string(),
            patient: Patient {
                name: "Jane Doe".to_string(),
                phone: "555-1234".to_string(),
                email: "jane@example.com".to_string(),
            },
            reason: Some("Booked via agent".to_string()),
        }
    }

    #[test]
    fn test_reserve_success() {
        let conn = setup_db();
        let result = reserve(&conn, &request("2025-09-01", "10:00")).unwrap();

        let BookingResult::Confirmed(conf) = result else {
            panic!("expected confirmation");
        };
        assert!(conf.booking_id.starts_with("APPT-"));
        assert_eq!(conf.booking_id.len(), "APPT-".len() + 12);
        assert_eq!(
            conf.confirmation_code,
            conf.booking_id[conf.booking_id.len() - 6..]
        );
        assert_eq!(conf.details.start_time, "10:00");
        assert_eq!(conf.details.end_time, "10:30");
        assert_eq!(conf.details.patient.name, "Jane Doe");
    }

    #[test]
    fn test_reserve_recomputes_end_from_type() {
        let conn = setup_db();
        let mut req = request("2025-09-01", "10:00");
        req.appointment_type = "specialist".to_string();

        let BookingResult::Confirmed(conf) = reserve(&conn, &req).unwrap() else {
            panic!("expected confirmation");
        };
        assert_eq!(conf.details.end_time, "11:00");
    }

    #[test]
    fn test_reserve_normalizes_start_time() {
        let conn = setup_db();
        let BookingResult::Confirmed(conf) =
            reserve(&conn, &request("2025-09-01", "9:05")).unwrap()
        else {
            panic!("expected confirmation");
        };
        assert_eq!(conf.details.start_time, "09:05");
    }

    #[test]
    fn test_reserve_conflict_rejected_without_mutation() {
        let conn = setup_db();
        assert!(matches!(
            reserve(&conn, &request("2025-09-01", "10:00")).unwrap(),
            BookingResult::Confirmed(_)
        ));

        // Overlapping window, different start
        let result = reserve(&conn, &request("2025-09-01", "10:15")).unwrap();
        let BookingResult::Failed(failure) = result else {
            panic!("expected failure");
        };
        assert_eq!(failure.reason, ReserveFailure::Conflict);

        let date = NaiveDate::parse_from_str("2025-09-01", "%Y-%m-%d").unwrap();
        assert_eq!(queries::bookings_on_date(&conn, date).unwrap().len(), 1);
    }

    #[test]
    fn test_reserve_adjacent_slot_allowed() {
        let conn = setup_db();
        assert!(matches!(
            reserve(&conn, &request("2025-09-01", "10:00")).unwrap(),
            BookingResult::Confirmed(_)
        ));
        // 10:30 starts exactly when the previous ends, half-open means no
        // overlap
        assert!(matches!(
            reserve(&conn, &request("2025-09-01", "10:30")).unwrap(),
            BookingResult::Confirmed(_)
        ));
    }

    #[test]
    fn test_reserve_same_time_other_date_allowed() {
        let conn = setup_db();
        assert!(matches!(
            reserve(&conn, &request("2025-09-01", "10:00")).unwrap(),
            BookingResult::Confirmed(_)
        ));
        assert!(matches!(
            reserve(&conn, &request("2025-09-02", "10:00")).unwrap(),
            BookingResult::Confirmed(_)
        ));
    }

    #[test]
    fn test_reserve_invalid_date() {
        let conn = setup_db();
        let BookingResult::Failed(failure) =
            reserve(&conn, &request("2024-13-40", "10:00")).unwrap()
        else {
            panic!("expected failure");
        };
        assert_eq!(failure.reason, ReserveFailure::InvalidDate);
    }

    #[test]
    fn test_reserve_invalid_start_time() {
        let conn = setup_db();
        let BookingResult::Failed(failure) =
            reserve(&conn, &request("2025-09-01", "25:00")).unwrap()
        else {
            panic!("expected failure");
        };
        assert_eq!(failure.reason, ReserveFailure::InvalidStartTime);
    }

    #[test]
    fn test_reserve_invalid_patient_payload() {
        let conn = setup_db();

        let mut req = request("2025-09-01", "10:00");
        req.patient.email = "not-an-email".to_string();
        let BookingResult::Failed(failure) = reserve(&conn, &req).unwrap() else {
            panic!("expected failure");
        };
        assert_eq!(failure.reason, ReserveFailure::InvalidPayload);

        let mut req = request("2025-09-01", "10:00");
        req.patient.name = "  ".to_string();
        let BookingResult::Failed(failure) = reserve(&conn, &req).unwrap() else {
            panic!("expected failure");
        };
        assert_eq!(failure.reason, ReserveFailure::InvalidPayload);
    }

    #[test]
    fn test_concurrent_same_slot_exactly_one_wins() {
        let db = Arc::new(Mutex::new(setup_db()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = Arc::clone(&db);
                std::thread::spawn(move || {
                    let conn = db.lock().unwrap();
                    reserve(&conn, &request("2025-09-01", "10:00")).unwrap()
                })
            })
            .collect();

        let results: Vec<BookingResult> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let confirmed = results
            .iter()
            .filter(|r| matches!(r, BookingResult::Confirmed(_)))
            .count();
        assert_eq!(confirmed, 1);
        for result in &results {
            if let BookingResult::Failed(failure) = result {
                assert_eq!(failure.reason, ReserveFailure::Conflict);
            }
        }
    }
}
