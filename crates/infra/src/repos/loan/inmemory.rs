use super::{DueLoansQuery, ILoanRepo};
use crate::repos::shared::inmemory_repo::*;
use reeni_domain::{LoanItem, ReminderState, ID};

pub struct InMemoryLoanRepo {
    loans: std::sync::Mutex<Vec<LoanItem>>,
}

impl InMemoryLoanRepo {
    pub fn new() -> Self {
        Self {
            loans: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ILoanRepo for InMemoryLoanRepo {
    async fn insert(&self, loan: &LoanItem) -> anyhow::Result<()> {
        insert(loan, &self.loans);
        Ok(())
    }

    async fn save(&self, loan: &LoanItem) -> anyhow::Result<()> {
        save(loan, &self.loans);
        Ok(())
    }

    async fn find(&self, loan_id: &ID) -> Option<LoanItem> {
        find(loan_id, &self.loans)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<LoanItem>> {
        Ok(find_by(&self.loans, |_| true))
    }

    async fn find_due(&self, query: &DueLoansQuery) -> anyhow::Result<Vec<LoanItem>> {
        Ok(find_by(&self.loans, |loan| query.matches(loan)))
    }

    async fn mark_reminded(&self, loan_id: &ID, sent_at: i64) -> anyhow::Result<()> {
        update_one(loan_id, &self.loans, |loan| {
            let count = loan.reminder.as_ref().map(|r| r.count).unwrap_or(0);
            loan.reminder = Some(ReminderState {
                last_sent_at: sent_at,
                count: count + 1,
            });
        });
        Ok(())
    }

    async fn delete(&self, loan_id: &ID) -> Option<LoanItem> {
        delete(loan_id, &self.loans)
    }
}
