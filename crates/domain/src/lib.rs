pub mod date;
mod loan;
mod message;
mod reminder;
mod shared;

pub use loan::{LoanCategory, LoanItem};
pub use message::{compose_reminder, ReminderMessage};
pub use reminder::{DispatchReport, ReminderState};
pub use shared::entity::{Entity, ID};
