use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::Patient;

fn time_regex() -> &'static Regex {
    static TIME_RE: OnceLock<Regex> = OnceLock::new();
    TIME_RE.get_or_init(|| {
        Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("time regex must compile")
    })
}

fn iso_date_regex() -> &'static Regex {
    static ISO_DATE_RE: OnceLock<Regex> = OnceLock::new();
    ISO_DATE_RE
        .get_or_init(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("date regex must compile"))
}

/// First HH:MM occurrence in the text, zero-padded.
pub fn extract_time(text: &str) -> Option<String> {
    let caps = time_regex().captures(text)?;
    let hh: u32 = caps.get(1)?.as_str().parse().ok()?;
    let mm: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(format!("{hh:02}:{mm:02}"))
}

/// First YYYY-MM-DD occurrence that is also a real calendar date. An
/// invalid calendar date (month 13, day 40) counts as absent.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    let caps = iso_date_regex().captures(text)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()
}

/// Comma-separated "name, phone, email" triple. Requires at least three
/// fields, an `@` in the final field, and a non-empty name; the first
/// three fields are taken positionally with no phone validation.
pub fn extract_patient(text: &str) -> Option<Patient> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }
    let last = parts.last()?;
    if !last.contains('@') || parts[0].is_empty() {
        return None;
    }
    Some(Patient {
        name: parts[0].to_string(),
        phone: parts[1].to_string(),
        email: parts[2].to_string(),
    })
}
