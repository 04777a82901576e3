use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{AppointmentType, Booking, Patient};

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let date = booking.date.format("%Y-%m-%d").to_string();
    let created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO bookings (id, date, start_time, end_time, appointment_type,
                               patient_name, patient_phone, patient_email, reason, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            date,
            booking.start_time,
            booking.end_time,
            booking.appointment_type.as_str(),
            booking.patient.name,
            booking.patient.phone,
            booking.patient.email,
            booking.reason,
            created_at,
        ],
    )?;
    Ok(())
}

pub fn bookings_on_date(conn: &Connection, date: NaiveDate) -> anyhow::Result<Vec<Booking>> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let mut stmt = conn.prepare(
        "SELECT id, date, start_time, end_time, appointment_type,
                patient_name, patient_phone, patient_email, reason, created_at
         FROM bookings WHERE date = ?1 ORDER BY start_time",
    )?;

    let rows = stmt.query_map(params![date_str], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, Option<String>>(8)?,
            row.get::<_, String>(9)?,
        ))
    })?;

    let mut bookings = Vec::new();
    for row in rows {
        let (id, date_str, start_time, end_time, kind, name, phone, email, reason, created_at) =
            row?;

        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or(date);
        let created_at = NaiveDateTime::parse_from_str(&created_at, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| Utc::now().naive_utc());

        bookings.push(Booking {
            id,
            date,
            start_time,
            end_time,
            appointment_type: AppointmentType::parse(&kind),
            patient: Patient { name, phone, email },
            reason,
            created_at,
        });
    }
    Ok(bookings)
}
