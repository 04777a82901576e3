use serde::{Deserialize, Serialize};

/// Coarse category a free-text message is classified into. `Unknown`
/// signals the caller to defer to the FAQ collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BookAppointment,
    AskHours,
    AskInsurance,
    AskPhone,
    AskLocation,
    SmallTalk,
    MaybeTimeOrDate,
    Unknown,
}
