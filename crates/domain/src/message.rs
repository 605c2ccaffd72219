use crate::loan::{LoanCategory, LoanItem};

/// A composed reminder, ready to hand to the mail transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderMessage {
    pub subject: String,
    pub body: String,
}

/// Builds the reminder email for an overdue loan. Pure: the same item
/// always yields the same message.
pub fn compose_reminder(item: &LoanItem) -> ReminderMessage {
    let due = item.due_date.format("%Y-%m-%d");
    match item.category {
        LoanCategory::Lent => ReminderMessage {
            subject: format!("Reminder: collect {} from {}", item.amount, item.person),
            body: format!(
                "The {} you lent to {} was due on {}. It is time to collect the repayment.",
                item.amount, item.person, due
            ),
        },
        LoanCategory::Borrowed => ReminderMessage {
            subject: format!("Reminder: repay {} to {}", item.amount, item.person),
            body: format!(
                "The {} you borrowed from {} was due on {}. Do not forget to repay it.",
                item.amount, item.person, due
            ),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn loan(category: LoanCategory) -> LoanItem {
        LoanItem {
            id: Default::default(),
            person: "Alice".into(),
            amount: 500.0,
            category,
            due_date: NaiveDate::from_ymd(2024, 1, 10),
            email: Some("a@x.com".into()),
            returned: false,
            reminder: None,
        }
    }

    #[test]
    fn lent_loan_frames_collection() {
        let message = compose_reminder(&loan(LoanCategory::Lent));
        assert!(message.subject.contains("collect"));
        assert!(message.subject.contains("Alice"));
        assert!(message.body.contains("lent to Alice"));
        assert!(message.body.contains("2024-01-10"));
    }

    #[test]
    fn borrowed_loan_frames_repayment() {
        let message = compose_reminder(&loan(LoanCategory::Borrowed));
        assert!(message.subject.contains("repay"));
        assert!(message.subject.contains("Alice"));
        assert!(message.body.contains("borrowed from Alice"));
        assert!(message.body.contains("2024-01-10"));
    }
}
