use crate::models::Intent;
use crate::services::extract;

/// Text → intent category. Behind a trait so a model-based classifier can
/// replace the rule table without touching the state machine.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}

const GREETING_KEYWORDS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

const BOOKING_KEYWORDS: &[&str] = &[
    "book",
    "appointment",
    "schedule",
    "see the doctor",
    "i need to see",
    "i want to book",
    "reserve",
];

const HOURS_KEYWORDS: &[&str] = &["hour", "open", "opening", "when open", "hours"];

const INSURANCE_KEYWORDS: &[&str] = &["insurance", "insurer", "coverage", "copay", "billing"];

const PHONE_KEYWORDS: &[&str] = &["phone", "call", "contact", "number", "clinic phone"];

const LOCATION_KEYWORDS: &[&str] = &["address", "location", "where are you", "directions"];

fn contains_any(message: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| message.contains(k))
}

fn is_greeting_only(message: &str) -> bool {
    contains_any(message, GREETING_KEYWORDS) && message.split_whitespace().count() <= 2
}

fn mentions_booking(message: &str) -> bool {
    contains_any(message, BOOKING_KEYWORDS)
}

fn mentions_time_or_date(message: &str) -> bool {
    extract::extract_time(message).is_some() || extract::extract_date(message).is_some()
}

fn mentions_hours(message: &str) -> bool {
    contains_any(message, HOURS_KEYWORDS)
}

fn mentions_insurance(message: &str) -> bool {
    contains_any(message, INSURANCE_KEYWORDS)
}

fn mentions_phone(message: &str) -> bool {
    contains_any(message, PHONE_KEYWORDS)
}

fn mentions_location(message: &str) -> bool {
    contains_any(message, LOCATION_KEYWORDS)
}

struct Rule {
    matches: fn(&str) -> bool,
    intent: Intent,
}

/// Ordered keyword rules, first match wins. The order is load-bearing:
/// greeting-only messages resolve before anything else, explicit booking
/// keywords beat a bare time/date, and a time/date beats the FAQ-ish
/// keyword groups.
pub struct RuleClassifier {
    rules: Vec<Rule>,
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule {
                    matches: is_greeting_only,
                    intent: Intent::SmallTalk,
                },
                Rule {
                    matches: mentions_booking,
                    intent: Intent::BookAppointment,
                },
                Rule {
                    matches: mentions_time_or_date,
                    intent: Intent::MaybeTimeOrDate,
                },
                Rule {
                    matches: mentions_hours,
                    intent: Intent::AskHours,
                },
                Rule {
                    matches: mentions_insurance,
                    intent: Intent::AskInsurance,
                },
                Rule {
                    matches: mentions_phone,
                    intent: Intent::AskPhone,
                },
                Rule {
                    matches: mentions_location,
                    intent: Intent::AskLocation,
                },
            ],
        }
    }
}

impl IntentClassifier for RuleClassifier {
    fn classify(&self, text: &str) -> Intent {
        let message = text.to_lowercase();
        let message = message.trim();

        self.rules
            .iter()
            .find(|rule| (rule.matches)(message))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        RuleClassifier::default().classify(text)
    }

    #[test]
    fn test_greeting_only_is_small_talk() {
        assert_eq!(classify("hi"), Intent::SmallTalk);
        assert_eq!(classify("Hello there"), Intent::SmallTalk);
        assert_eq!(classify("good morning"), Intent::SmallTalk);
    }

    #[test]
    fn test_booking_keywords_beat_greeting_time_and_insurance() {
        assert_eq!(
            classify("hi, I need to see the doctor tomorrow at 10:00 for insurance question"),
            Intent::BookAppointment
        );
        assert_eq!(classify("I want to book an appointment"), Intent::BookAppointment);
        assert_eq!(classify("can I reserve a visit"), Intent::BookAppointment);
    }

    #[test]
    fn test_bare_time_or_date_is_maybe() {
        assert_eq!(classify("10:30"), Intent::MaybeTimeOrDate);
        assert_eq!(classify("2025-09-01 works for me"), Intent::MaybeTimeOrDate);
    }

    #[test]
    fn test_faq_keyword_groups() {
        assert_eq!(classify("what are your hours?"), Intent::AskHours);
        assert_eq!(classify("do you take my insurance?"), Intent::AskInsurance);
        assert_eq!(classify("what is the clinic phone?"), Intent::AskPhone);
        assert_eq!(classify("what's your address?"), Intent::AskLocation);
    }

    #[test]
    fn test_time_beats_hours_keywords() {
        // "open at 10:00" mentions both a time and an hours keyword
        assert_eq!(classify("are you open at 10:00"), Intent::MaybeTimeOrDate);
    }

    #[test]
    fn test_unmatched_is_unknown() {
        assert_eq!(classify("do you do x-rays?"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
    }
}
