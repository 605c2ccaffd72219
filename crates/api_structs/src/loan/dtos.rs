use chrono::NaiveDate;
use reeni_domain::{LoanCategory, LoanItem, ReminderState, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoanDTO {
    pub id: ID,
    pub person: String,
    pub amount: f64,
    pub category: LoanCategory,
    pub due_date: NaiveDate,
    pub email: Option<String>,
    pub returned: bool,
    pub reminder: Option<ReminderStateDTO>,
}

impl LoanDTO {
    pub fn new(loan: LoanItem) -> Self {
        Self {
            id: loan.id.clone(),
            person: loan.person,
            amount: loan.amount,
            category: loan.category,
            due_date: loan.due_date,
            email: loan.email,
            returned: loan.returned,
            reminder: loan.reminder.map(ReminderStateDTO::new),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStateDTO {
    pub last_sent_at: i64,
    pub count: u32,
}

impl ReminderStateDTO {
    pub fn new(state: ReminderState) -> Self {
        Self {
            last_sent_at: state.last_sent_at,
            count: state.count,
        }
    }
}
