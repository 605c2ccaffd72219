use crate::reminder::ReminderState;
use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether the money was lent to or borrowed from the counterparty.
/// Determines how a reminder frames the repayment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanCategory {
    Lent,
    Borrowed,
}

/// A sum of money lent to or borrowed from a person, with an expected
/// repayment date.
#[derive(Debug, Clone)]
pub struct LoanItem {
    pub id: ID,
    pub person: String,
    pub amount: f64,
    pub category: LoanCategory,
    /// Civil date on which repayment is expected, no time-of-day attached
    pub due_date: NaiveDate,
    pub email: Option<String>,
    pub returned: bool,
    /// Written by the reminder scheduler on a confirmed send, never by the
    /// CRUD surface
    pub reminder: Option<ReminderState>,
}

impl LoanItem {
    /// The address reminders go to. Blank addresses count as absent.
    pub fn contact_email(&self) -> Option<&str> {
        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => Some(email),
            _ => None,
        }
    }
}

impl Entity for LoanItem {
    fn id(&self) -> &ID {
        &self.id
    }
}
