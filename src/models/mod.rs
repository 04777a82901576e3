pub mod booking;
pub mod intent;
pub mod response;
pub mod session;
pub mod slot;

pub use booking::{
    AppointmentType, Booking, BookingConfirmation, BookingDetails, BookingFailure,
    BookingRequest, BookingResult, BookingStatus, Patient, ReserveFailure,
};
pub use intent::Intent;
pub use response::AgentReply;
pub use session::{BookingContext, Session, SessionState, TurnRecord};
pub use slot::{DayAvailability, Slot};
