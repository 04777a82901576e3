use serde::{Deserialize, Serialize};

use crate::models::{BookingResult, Slot};

/// Structured reply produced by the dialogue state machine for one
/// inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentReply {
    Question { question: String },
    SuggestSlots { slots: Vec<Slot> },
    NoSlots { message: String },
    BookingConf { booking: BookingResult },
    Faq { answer: String },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_tagged_serialization() {
        let reply = AgentReply::Question {
            question: "What type of appointment?".to_string(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "question");
        assert_eq!(json["question"], "What type of appointment?");
    }

    #[test]
    fn test_suggest_slots_serialization() {
        let reply = AgentReply::SuggestSlots {
            slots: vec![Slot {
                start_time: "09:00".to_string(),
                end_time: "09:30".to_string(),
                available: true,
            }],
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "suggest_slots");
        assert_eq!(json["slots"][0]["start_time"], "09:00");
    }
}
