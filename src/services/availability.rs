use chrono::NaiveDate;
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::queries;
use crate::models::{AppointmentType, DayAvailability, Slot};

/// Window starts advance by this many minutes regardless of appointment
/// duration, so longer appointment types produce overlapping windows in
/// the listing. Intentional granularity, not a bug.
pub const SLOT_STRIDE_MINUTES: u16 = 15;

/// "HH:MM" (or "H:MM") to minutes since midnight. None for anything out
/// of range or malformed.
pub fn parse_hhmm(s: &str) -> Option<u16> {
    let (h, m) = s.split_once(':')?;
    let hour: u16 = h.trim().parse().ok()?;
    let minute: u16 = m.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

pub fn to_hhmm(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Half-open interval overlap on minutes since midnight.
pub fn overlaps(start_a: u16, end_a: u16, start_b: u16, end_b: u16) -> bool {
    start_a < end_b && end_a > start_b
}

#[derive(Debug, Clone, Copy)]
pub struct ClinicHours {
    pub open: u16,
    pub close: u16,
}

impl ClinicHours {
    pub fn from_config(config: &AppConfig) -> Self {
        let open = parse_hhmm(&config.clinic_open).unwrap_or_else(|| {
            tracing::warn!(value = %config.clinic_open, "bad CLINIC_OPEN, using 09:00");
            9 * 60
        });
        let close = parse_hhmm(&config.clinic_close).unwrap_or_else(|| {
            tracing::warn!(value = %config.clinic_close, "bad CLINIC_CLOSE, using 17:00");
            17 * 60
        });
        Self { open, close }
    }
}

/// Enumerate candidate slots for a date, flagging each against the booked
/// ledger. A malformed date yields an empty listing rather than an error;
/// only the database can fail here.
pub fn list_slots(
    conn: &Connection,
    hours: ClinicHours,
    date: &str,
    kind: AppointmentType,
) -> anyhow::Result<DayAvailability> {
    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return Ok(DayAvailability {
            date: date.to_string(),
            available_slots: Vec::new(),
        });
    };

    let duration = kind.duration_minutes();
    let booked = queries::bookings_on_date(conn, parsed)?;

    let mut slots = Vec::new();
    let mut cursor = hours.open;
    while cursor < hours.close {
        let end = cursor + duration;
        if end > hours.close {
            break;
        }
        let available = !booked.iter().any(|b| {
            let booked_start = parse_hhmm(&b.start_time).unwrap_or(0);
            let booked_end = parse_hhmm(&b.end_time).unwrap_or(0);
            overlaps(cursor, end, booked_start, booked_end)
        });
        slots.push(Slot {
            start_time: to_hhmm(cursor),
            end_time: to_hhmm(end),
            available,
        });
        cursor += SLOT_STRIDE_MINUTES;
    }

    Ok(DayAvailability {
        date: date.to_string(),
        available_slots: slots,
    })
}
