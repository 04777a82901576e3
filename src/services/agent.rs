use chrono::{Duration, Local, NaiveDate, Utc};

use crate::models::{
    AgentReply, AppointmentType, BookingRequest, BookingResult, Intent, Patient, Session,
    SessionState, Slot, TurnRecord,
};
use crate::services::availability::{self, ClinicHours};
use crate::services::booking;
use crate::services::extract;
use crate::state::AppState;

const PATIENT_INFO_QUESTION: &str =
    "Please provide your full name, phone, and email (comma separated).";
const UNRECOGNIZED_TIME_MESSAGE: &str =
    "Time not recognized. Reply with HH:MM from the suggested list.";
const BOOKING_REASON: &str = "Booked via agent";
const MAX_SUGGESTED_SLOTS: usize = 5;

/// Process one inbound message for a session: append it to the turn log,
/// run extractors and the classifier, apply the transition rules, and
/// hand back the structured reply together with the session id.
///
/// The session mutex is held for the whole turn, so messages arriving
/// concurrently for the same session are serialized. The turn works on a
/// copy of the session and writes it back only at the end; a failure
/// partway through leaves the stored state untouched.
pub fn handle_message(
    state: &AppState,
    session_id: Option<&str>,
    message: &str,
) -> anyhow::Result<(String, AgentReply)> {
    let (session_id, handle) = state.sessions.ensure(session_id);
    let mut guard = handle.lock().unwrap();
    let mut sess = guard.clone();

    sess.messages.push(TurnRecord {
        role: "user".to_string(),
        text: message.to_string(),
        ts: Utc::now().naive_utc(),
    });

    let msg = message.trim();
    let lower = msg.to_lowercase();

    let time_val = extract::extract_time(msg);
    let date_val = extract::extract_date(msg);
    let patient_val = extract::extract_patient(msg);
    let intent = state.classifier.classify(msg);

    tracing::info!(
        session = %session_id,
        intent = ?intent,
        state = sess.state.as_str(),
        "processing message"
    );

    let reply = match sess.state {
        SessionState::BookingNeeds => on_booking_needs(&mut sess, &lower),
        SessionState::AskingPref => on_asking_pref(state, &mut sess, &lower, date_val)?,
        SessionState::SuggestingSlots => {
            on_suggesting_slots(&mut sess, msg, &lower, time_val.as_deref())
        }
        SessionState::CollectInfo => on_collect_info(state, &mut sess, patient_val)?,
        SessionState::Idle => on_idle(
            state,
            &mut sess,
            msg,
            &lower,
            intent,
            time_val.as_deref(),
            patient_val,
        )?,
    };

    *guard = sess;
    Ok((session_id, reply))
}

fn on_booking_needs(sess: &mut Session, lower: &str) -> AgentReply {
    // Checked in sequence so a later keyword wins when several appear.
    let mut kind = AppointmentType::Consultation;
    if lower.contains("follow") {
        kind = AppointmentType::Followup;
    }
    if lower.contains("physical") {
        kind = AppointmentType::Physical;
    }
    if lower.contains("special") {
        kind = AppointmentType::Specialist;
    }

    sess.context.appointment_type = Some(kind);
    sess.state = SessionState::AskingPref;
    AgentReply::Question {
        question: "Do you have a preferred date? (YYYY-MM-DD) or preference like \
                   'this week' / 'tomorrow' / 'no preference'"
            .to_string(),
    }
}

fn on_asking_pref(
    state: &AppState,
    sess: &mut Session,
    lower: &str,
    date_val: Option<NaiveDate>,
) -> anyhow::Result<AgentReply> {
    let today = Local::now().date_naive();

    // "tomorrow", "this week", and the no-preference phrasings all
    // resolve to tomorrow; only the nothing-parses fallback differs.
    let target_date = if matches!(
        lower,
        "tomorrow" | "this week" | "no preference" | "any" | "whenever"
    ) {
        today + Duration::days(1)
    } else if let Some(date) = date_val {
        date
    } else if let Ok(date) = NaiveDate::parse_from_str(lower, "%Y-%m-%d") {
        date
    } else {
        today + Duration::days(2)
    };

    sess.context.target_date = Some(target_date);
    let kind = sess
        .context
        .appointment_type
        .unwrap_or(AppointmentType::Consultation);

    let day = {
        let db = state.db.lock().unwrap();
        availability::list_slots(
            &db,
            ClinicHours::from_config(&state.config),
            &target_date.to_string(),
            kind,
        )?
    };

    let suggested: Vec<Slot> = day
        .available_slots
        .into_iter()
        .filter(|s| s.available)
        .take(MAX_SUGGESTED_SLOTS)
        .collect();

    if suggested.is_empty() {
        sess.state = SessionState::Idle;
        return Ok(AgentReply::NoSlots {
            message: "No slots available on that date. Would you like alternatives?".to_string(),
        });
    }

    sess.context.suggested_slots = suggested.clone();
    sess.state = SessionState::SuggestingSlots;
    Ok(AgentReply::SuggestSlots { slots: suggested })
}

fn on_suggesting_slots(
    sess: &mut Session,
    msg: &str,
    lower: &str,
    time_val: Option<&str>,
) -> AgentReply {
    if lower.contains("none") || matches!(lower, "no" | "not now") {
        sess.state = SessionState::Idle;
        return AgentReply::Question {
            question: "Okay, would you like me to check other dates? (yes/no)".to_string(),
        };
    }

    // Some frontends send the bare time as the whole message; fall back
    // to the first token when the regex finds nothing.
    let chosen = match time_val {
        Some(t) => t.to_string(),
        None => msg.split_whitespace().next().unwrap_or("").to_string(),
    };
    try_choose_slot(sess, &chosen)
}

fn on_collect_info(
    state: &AppState,
    sess: &mut Session,
    patient_val: Option<Patient>,
) -> anyhow::Result<AgentReply> {
    let Some(patient) = patient_val else {
        return Ok(AgentReply::Question {
            question: "Please provide name, phone, email separated by commas.".to_string(),
        });
    };

    let result = finalize_booking(state, sess, patient)?;
    sess.state = SessionState::Idle;
    Ok(AgentReply::BookingConf { booking: result })
}

fn on_idle(
    state: &AppState,
    sess: &mut Session,
    msg: &str,
    lower: &str,
    intent: Intent,
    time_val: Option<&str>,
    patient_val: Option<Patient>,
) -> anyhow::Result<AgentReply> {
    if intent == Intent::BookAppointment {
        sess.state = SessionState::BookingNeeds;
        return Ok(AgentReply::Question {
            question: "Sure, what type of appointment? (consultation, followup, physical, \
                       specialist)"
                .to_string(),
        });
    }

    // Out-of-order tolerance: a bare time still picks from earlier
    // suggestions even though the session went back to idle.
    if let Some(chosen) = time_val {
        if !sess.context.suggested_slots.is_empty() {
            return Ok(try_choose_slot(sess, chosen));
        }
    }

    // Likewise a pasted patient triple finalizes immediately when a slot
    // was already chosen.
    if let Some(patient) = patient_val {
        if sess.context.chosen_slot.is_some() {
            let result = finalize_booking(state, sess, patient)?;
            return Ok(AgentReply::BookingConf { booking: result });
        }
    }

    if matches!(lower, "yes" | "y" | "sure" | "ok" | "please") {
        sess.state = SessionState::AskingPref;
        return Ok(AgentReply::Question {
            question: "Which date would you like me to check? (YYYY-MM-DD / tomorrow / \
                       this week / no preference)"
                .to_string(),
        });
    }
    if matches!(lower, "no" | "n" | "nah") {
        return Ok(AgentReply::Question {
            question: "Okay, anything else I can help with?".to_string(),
        });
    }

    let answer = match intent {
        Intent::AskHours => state.faq.lookup("hours"),
        Intent::AskInsurance => state.faq.lookup("insurance"),
        Intent::AskPhone => format!("Our clinic phone is {}.", state.config.clinic_phone),
        Intent::AskLocation => state.faq.lookup("location"),
        Intent::SmallTalk => {
            return Ok(AgentReply::Question {
                question: "Hi! How can I help you today? You can say 'Book an appointment' \
                           or ask about hours, insurance, or location."
                    .to_string(),
            });
        }
        _ => state.faq.lookup(msg),
    };
    Ok(AgentReply::Faq { answer })
}

/// Accept a start time only if it names one of the currently suggested
/// slots; the session state is left alone otherwise so the caller can
/// retry.
fn try_choose_slot(sess: &mut Session, chosen: &str) -> AgentReply {
    let slot = sess
        .context
        .suggested_slots
        .iter()
        .find(|s| s.start_time == chosen)
        .cloned();

    match slot {
        Some(slot) => {
            sess.context.chosen_slot = Some(slot);
            sess.state = SessionState::CollectInfo;
            AgentReply::Question {
                question: PATIENT_INFO_QUESTION.to_string(),
            }
        }
        None => AgentReply::Error {
            message: UNRECOGNIZED_TIME_MESSAGE.to_string(),
        },
    }
}

fn finalize_booking(
    state: &AppState,
    sess: &mut Session,
    patient: Patient,
) -> anyhow::Result<BookingResult> {
    sess.context.patient = Some(patient.clone());

    let req = BookingRequest {
        appointment_type: sess
            .context
            .appointment_type
            .unwrap_or(AppointmentType::Consultation)
            .as_str()
            .to_string(),
        date: sess
            .context
            .target_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        start_time: sess
            .context
            .chosen_slot
            .as_ref()
            .map(|s| s.start_time.clone())
            .unwrap_or_default(),
        patient,
        reason: Some(BOOKING_REASON.to_string()),
    };

    let db = state.db.lock().unwrap();
    booking::reserve(&db, &req)
}
