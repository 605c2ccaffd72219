mod inmemory;
mod mongo;

pub use inmemory::InMemoryLoanRepo;
pub use mongo::MongoLoanRepo;

use chrono::NaiveDate;
use reeni_domain::{LoanItem, ID};

/// Filter for loans that are due for a reminder.
///
/// A loan matches when it is not returned, carries a usable email address,
/// its due date is on or before `due_on` (the reminder fires on the due
/// date itself) and it has not been reminded since the current civil day
/// started.
#[derive(Debug, Clone)]
pub struct DueLoansQuery {
    /// The current civil day in the reminder timezone
    pub due_on: NaiveDate,
    /// The instant, in millis, at which the current civil day started
    pub reminded_before: i64,
}

impl DueLoansQuery {
    pub fn matches(&self, loan: &LoanItem) -> bool {
        if loan.returned || loan.contact_email().is_none() {
            return false;
        }
        if loan.due_date > self.due_on {
            return false;
        }
        match &loan.reminder {
            None => true,
            Some(reminder) => reminder.last_sent_at < self.reminded_before,
        }
    }
}

#[async_trait::async_trait]
pub trait ILoanRepo: Send + Sync {
    async fn insert(&self, loan: &LoanItem) -> anyhow::Result<()>;
    async fn save(&self, loan: &LoanItem) -> anyhow::Result<()>;
    async fn find(&self, loan_id: &ID) -> Option<LoanItem>;
    async fn find_all(&self) -> anyhow::Result<Vec<LoanItem>>;
    /// Read-only scan for reminder candidates. Result ordering is
    /// unspecified.
    async fn find_due(&self, query: &DueLoansQuery) -> anyhow::Result<Vec<LoanItem>>;
    /// Narrow update of the reminder marker: sets the last-sent timestamp
    /// and increments the send counter. No other field is touched.
    async fn mark_reminded(&self, loan_id: &ID, sent_at: i64) -> anyhow::Result<()>;
    async fn delete(&self, loan_id: &ID) -> Option<LoanItem>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReeniContext;
    use reeni_domain::{Entity, LoanCategory, ReminderState};

    fn loan(due_date: NaiveDate, email: Option<&str>, returned: bool) -> LoanItem {
        LoanItem {
            id: Default::default(),
            person: "Alice".into(),
            amount: 500.0,
            category: LoanCategory::Lent,
            due_date,
            email: email.map(|e| e.to_string()),
            returned,
            reminder: None,
        }
    }

    fn query() -> DueLoansQuery {
        DueLoansQuery {
            due_on: NaiveDate::from_ymd(2024, 1, 10),
            reminded_before: 1_704_844_800_000, // 2024-01-10T00:00:00Z
        }
    }

    #[test]
    fn returned_loan_never_matches() {
        let loan = loan(NaiveDate::from_ymd(2023, 12, 1), Some("a@x.com"), true);
        assert!(!query().matches(&loan));
    }

    #[test]
    fn loan_without_usable_email_never_matches() {
        for email in [None, Some(""), Some("  ")] {
            let loan = loan(NaiveDate::from_ymd(2023, 12, 1), email, false);
            assert!(!query().matches(&loan));
        }
    }

    #[test]
    fn loan_due_today_matches() {
        let loan = loan(NaiveDate::from_ymd(2024, 1, 10), Some("a@x.com"), false);
        assert!(query().matches(&loan));
    }

    #[test]
    fn loan_due_tomorrow_does_not_match() {
        let loan = loan(NaiveDate::from_ymd(2024, 1, 11), Some("a@x.com"), false);
        assert!(!query().matches(&loan));
    }

    #[test]
    fn loan_reminded_today_does_not_match() {
        let mut loan = loan(NaiveDate::from_ymd(2024, 1, 10), Some("a@x.com"), false);
        loan.reminder = Some(ReminderState {
            last_sent_at: query().reminded_before + 1000,
            count: 1,
        });
        assert!(!query().matches(&loan));
    }

    #[test]
    fn loan_reminded_yesterday_matches_again() {
        let mut loan = loan(NaiveDate::from_ymd(2024, 1, 10), Some("a@x.com"), false);
        loan.reminder = Some(ReminderState {
            last_sent_at: query().reminded_before - 1000,
            count: 3,
        });
        assert!(query().matches(&loan));
    }

    #[tokio::test]
    async fn finds_only_due_loans() {
        let ctx = ReeniContext::create_inmemory();

        let due = loan(NaiveDate::from_ymd(2024, 1, 9), Some("a@x.com"), false);
        let future = loan(NaiveDate::from_ymd(2024, 1, 11), Some("b@x.com"), false);
        let returned = loan(NaiveDate::from_ymd(2024, 1, 1), Some("c@x.com"), true);
        let no_email = loan(NaiveDate::from_ymd(2024, 1, 1), None, false);
        for l in [&due, &future, &returned, &no_email] {
            ctx.repos.loans.insert(l).await.unwrap();
        }

        let candidates = ctx.repos.loans.find_due(&query()).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].eq(&due));
    }

    #[tokio::test]
    async fn marking_reminded_excludes_until_the_next_day() {
        let ctx = ReeniContext::create_inmemory();
        let query = query();

        let due = loan(NaiveDate::from_ymd(2024, 1, 9), Some("a@x.com"), false);
        ctx.repos.loans.insert(&due).await.unwrap();

        let sent_at = query.reminded_before + 1000;
        ctx.repos.loans.mark_reminded(&due.id, sent_at).await.unwrap();

        assert!(ctx.repos.loans.find_due(&query).await.unwrap().is_empty());

        let marked = ctx.repos.loans.find(&due.id).await.unwrap();
        let reminder = marked.reminder.unwrap();
        assert_eq!(reminder.last_sent_at, sent_at);
        assert_eq!(reminder.count, 1);

        // A second send bumps the counter
        ctx.repos
            .loans
            .mark_reminded(&due.id, sent_at + 1000)
            .await
            .unwrap();
        let marked = ctx.repos.loans.find(&due.id).await.unwrap();
        assert_eq!(marked.reminder.unwrap().count, 2);
    }
}
