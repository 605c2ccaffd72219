use crate::error::ReeniError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use reeni_api_structs::send_due_reminders::*;
use reeni_domain::{compose_reminder, date, DispatchReport};
use reeni_infra::{DueLoansQuery, ReeniContext};
use tracing::{error, info, warn};

pub async fn send_due_reminders_controller(
    ctx: web::Data<ReeniContext>,
) -> Result<HttpResponse, ReeniError> {
    let usecase = SendDueRemindersUseCase;

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report)))
        .map_err(ReeniError::from)
}

/// One reminder dispatch run: scans for overdue loans, emails each contact
/// and records the send so the loan is not reminded again today.
#[derive(Debug)]
pub struct SendDueRemindersUseCase;

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    /// Another dispatch run is still in progress, this trigger is discarded
    Busy,
    StorageError,
}

impl From<UseCaseErrors> for ReeniError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::Busy => {
                Self::Conflict("A reminder dispatch is already in progress".into())
            }
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = DispatchReport;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &ReeniContext) -> Result<Self::Response, Self::Errors> {
        let _guard = match ctx.dispatch_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Reminder dispatch triggered while a run is still in progress, discarding");
                return Err(UseCaseErrors::Busy);
            }
        };

        let tz = ctx.config.timezone;
        let now = ctx.sys.get_timestamp_millis();
        let today = date::civil_date_at(now, &tz);
        let query = DueLoansQuery {
            due_on: today,
            reminded_before: date::day_start_millis(today, &tz),
        };

        info!("Reminder dispatch run started for day: {}", today);

        // A store failure aborts the whole run before any marker is
        // written, the next trigger retries naturally.
        let candidates = ctx
            .repos
            .loans
            .find_due(&query)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let mut report = DispatchReport::default();
        for loan in candidates {
            let email = match loan.contact_email() {
                Some(email) => email.to_string(),
                None => {
                    report.skipped += 1;
                    continue;
                }
            };

            report.attempted += 1;
            let message = compose_reminder(&loan);
            match ctx
                .mailer
                .send(&email, &message.subject, &message.body)
                .await
            {
                Ok(()) => {
                    report.sent += 1;
                    if let Err(e) = ctx.repos.loans.mark_reminded(&loan.id, now).await {
                        // The mail went out but the marker did not stick:
                        // the next run will send a duplicate rather than
                        // stay silent.
                        error!(
                            "Failed to record reminder for loan: {}. Error: {:?}",
                            loan.id, e
                        );
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        "Failed to send reminder for loan: {}. Error: {:?}",
                        loan.id, e
                    );
                }
            }
        }

        info!("Reminder dispatch run completed: {:?}", report);

        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use reeni_domain::{LoanCategory, LoanItem, ID};
    use reeni_infra::{ILoanRepo, ISys, InMemoryLoanRepo, InMemoryMailer};
    use std::sync::Arc;

    struct StaticSys(i64);
    impl ISys for StaticSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    /// Record store that lost its connection
    struct BrokenLoanRepo;

    #[async_trait::async_trait]
    impl ILoanRepo for BrokenLoanRepo {
        async fn insert(&self, _loan: &LoanItem) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Lost connection to database"))
        }
        async fn save(&self, _loan: &LoanItem) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Lost connection to database"))
        }
        async fn find(&self, _loan_id: &ID) -> Option<LoanItem> {
            None
        }
        async fn find_all(&self) -> anyhow::Result<Vec<LoanItem>> {
            Err(anyhow::anyhow!("Lost connection to database"))
        }
        async fn find_due(&self, _query: &DueLoansQuery) -> anyhow::Result<Vec<LoanItem>> {
            Err(anyhow::anyhow!("Lost connection to database"))
        }
        async fn mark_reminded(&self, _loan_id: &ID, _sent_at: i64) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Lost connection to database"))
        }
        async fn delete(&self, _loan_id: &ID) -> Option<LoanItem> {
            None
        }
    }

    /// Record store where reads work but the reminder marker never sticks
    struct MarkerlessLoanRepo(InMemoryLoanRepo);

    #[async_trait::async_trait]
    impl ILoanRepo for MarkerlessLoanRepo {
        async fn insert(&self, loan: &LoanItem) -> anyhow::Result<()> {
            self.0.insert(loan).await
        }
        async fn save(&self, loan: &LoanItem) -> anyhow::Result<()> {
            self.0.save(loan).await
        }
        async fn find(&self, loan_id: &ID) -> Option<LoanItem> {
            self.0.find(loan_id).await
        }
        async fn find_all(&self) -> anyhow::Result<Vec<LoanItem>> {
            self.0.find_all().await
        }
        async fn find_due(&self, query: &DueLoansQuery) -> anyhow::Result<Vec<LoanItem>> {
            self.0.find_due(query).await
        }
        async fn mark_reminded(&self, _loan_id: &ID, _sent_at: i64) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("Write concern failure"))
        }
        async fn delete(&self, loan_id: &ID) -> Option<LoanItem> {
            self.0.delete(loan_id).await
        }
    }

    /// Record store that hands out a fixed candidate list, bypassing the
    /// selection filter
    struct StubbedDueRepo(Vec<LoanItem>);

    #[async_trait::async_trait]
    impl ILoanRepo for StubbedDueRepo {
        async fn insert(&self, _loan: &LoanItem) -> anyhow::Result<()> {
            Ok(())
        }
        async fn save(&self, _loan: &LoanItem) -> anyhow::Result<()> {
            Ok(())
        }
        async fn find(&self, _loan_id: &ID) -> Option<LoanItem> {
            None
        }
        async fn find_all(&self) -> anyhow::Result<Vec<LoanItem>> {
            Ok(self.0.clone())
        }
        async fn find_due(&self, _query: &DueLoansQuery) -> anyhow::Result<Vec<LoanItem>> {
            Ok(self.0.clone())
        }
        async fn mark_reminded(&self, _loan_id: &ID, _sent_at: i64) -> anyhow::Result<()> {
            Ok(())
        }
        async fn delete(&self, _loan_id: &ID) -> Option<LoanItem> {
            None
        }
    }

    struct TestContext {
        ctx: ReeniContext,
        mailer: InMemoryMailer,
    }

    // 12:00 on the given day in the test timezone (UTC)
    fn noon(date: NaiveDate) -> i64 {
        date.and_hms(12, 0, 0).timestamp_millis()
    }

    fn setup_at(now: i64) -> TestContext {
        let mut ctx = ReeniContext::create_inmemory();
        ctx.config.timezone = chrono_tz::UTC;
        ctx.sys = Arc::new(StaticSys(now));
        let mailer = InMemoryMailer::new();
        ctx.mailer = Arc::new(mailer.clone());

        TestContext { ctx, mailer }
    }

    fn loan(person: &str, due_date: NaiveDate, email: Option<&str>) -> LoanItem {
        LoanItem {
            id: Default::default(),
            person: person.into(),
            amount: 500.0,
            category: LoanCategory::Lent,
            due_date,
            email: email.map(|e| e.to_string()),
            returned: false,
            reminder: None,
        }
    }

    fn due_date() -> NaiveDate {
        NaiveDate::from_ymd(2024, 1, 10)
    }

    #[actix_web::main]
    #[test]
    async fn reminds_loan_on_its_due_date() {
        let now = noon(due_date());
        let TestContext { ctx, mailer } = setup_at(now);
        let alice = loan("Alice", due_date(), Some("a@x.com"));
        ctx.repos.loans.insert(&alice).await.unwrap();

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(
            report,
            DispatchReport {
                attempted: 1,
                sent: 1,
                failed: 0,
                skipped: 0,
            }
        );
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert!(sent[0].subject.contains("collect"));
        assert!(sent[0].subject.contains("Alice"));

        let reminder = ctx
            .repos
            .loans
            .find(&alice.id)
            .await
            .unwrap()
            .reminder
            .unwrap();
        assert_eq!(reminder.last_sent_at, now);
        assert_eq!(reminder.count, 1);
    }

    #[actix_web::main]
    #[test]
    async fn returned_loan_is_never_reminded() {
        let TestContext { ctx, mailer } = setup_at(noon(due_date()));
        let mut alice = loan("Alice", NaiveDate::from_ymd(2023, 11, 1), Some("a@x.com"));
        alice.returned = true;
        ctx.repos.loans.insert(&alice).await.unwrap();

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(report, DispatchReport::default());
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn loan_without_email_is_never_reminded() {
        let TestContext { ctx, mailer } = setup_at(noon(due_date()));
        let alice = loan("Alice", NaiveDate::from_ymd(2023, 11, 1), None);
        ctx.repos.loans.insert(&alice).await.unwrap();

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(report, DispatchReport::default());
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn loan_due_tomorrow_is_not_reminded() {
        let TestContext { ctx, mailer } = setup_at(noon(due_date()));
        let alice = loan("Alice", NaiveDate::from_ymd(2024, 1, 11), Some("a@x.com"));
        ctx.repos.loans.insert(&alice).await.unwrap();

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(report, DispatchReport::default());
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn second_run_on_the_same_day_sends_nothing() {
        let TestContext { ctx, mailer } = setup_at(noon(due_date()));
        let alice = loan("Alice", due_date(), Some("a@x.com"));
        ctx.repos.loans.insert(&alice).await.unwrap();

        let first = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        let second = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(first.sent, 1);
        assert_eq!(second, DispatchReport::default());
        assert_eq!(mailer.sent().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn overdue_loan_is_reminded_again_the_next_day() {
        let TestContext { mut ctx, mailer } = setup_at(noon(due_date()));
        let alice = loan("Alice", due_date(), Some("a@x.com"));
        ctx.repos.loans.insert(&alice).await.unwrap();

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        ctx.sys = Arc::new(StaticSys(noon(NaiveDate::from_ymd(2024, 1, 11))));
        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(mailer.sent().len(), 2);
        let reminder = ctx
            .repos
            .loans
            .find(&alice.id)
            .await
            .unwrap()
            .reminder
            .unwrap();
        assert_eq!(reminder.count, 2);
    }

    #[actix_web::main]
    #[test]
    async fn send_failure_does_not_stop_the_run() {
        let TestContext { ctx, mailer } = setup_at(noon(due_date()));
        let alice = loan("Alice", due_date(), Some("a@x.com"));
        let bob = loan("Bob", due_date(), Some("b@x.com"));
        let carol = loan("Carol", due_date(), Some("c@x.com"));
        for l in [&alice, &bob, &carol] {
            ctx.repos.loans.insert(l).await.unwrap();
        }
        mailer.fail_sends_to("b@x.com");

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(
            report,
            DispatchReport {
                attempted: 3,
                sent: 2,
                failed: 1,
                skipped: 0,
            }
        );
        assert!(ctx.repos.loans.find(&alice.id).await.unwrap().reminder.is_some());
        assert!(ctx.repos.loans.find(&bob.id).await.unwrap().reminder.is_none());
        assert!(ctx.repos.loans.find(&carol.id).await.unwrap().reminder.is_some());

        // Only the failed loan is a candidate for the retry
        let retry = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(retry.attempted, 1);
        assert_eq!(retry.failed, 1);
    }

    #[actix_web::main]
    #[test]
    async fn marker_failure_keeps_the_loan_a_candidate() {
        let TestContext { mut ctx, mailer } = setup_at(noon(due_date()));
        let repo = MarkerlessLoanRepo(InMemoryLoanRepo::new());
        let alice = loan("Alice", due_date(), Some("a@x.com"));
        repo.0.insert(&alice).await.unwrap();
        ctx.repos.loans = Arc::new(repo);

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        // The send counts even though the marker write failed
        assert_eq!(report.sent, 1);
        assert!(ctx.repos.loans.find(&alice.id).await.unwrap().reminder.is_none());

        // At-least-once: the next run emails Alice again instead of
        // staying silent forever
        let again = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(again.sent, 1);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn store_failure_aborts_the_run() {
        let TestContext { mut ctx, mailer } = setup_at(noon(due_date()));
        ctx.repos.loans = Arc::new(BrokenLoanRepo);

        let res = execute(SendDueRemindersUseCase, &ctx).await;

        assert_eq!(res.unwrap_err(), UseCaseErrors::StorageError);
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn candidate_with_blank_address_is_skipped() {
        let TestContext { mut ctx, mailer } = setup_at(noon(due_date()));
        let blank = loan("Alice", due_date(), Some("   "));
        ctx.repos.loans = Arc::new(StubbedDueRepo(vec![blank]));

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(
            report,
            DispatchReport {
                attempted: 0,
                sent: 0,
                failed: 0,
                skipped: 1,
            }
        );
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn trigger_during_a_run_is_discarded() {
        let TestContext { ctx, mailer } = setup_at(noon(due_date()));
        let alice = loan("Alice", due_date(), Some("a@x.com"));
        ctx.repos.loans.insert(&alice).await.unwrap();

        let held = ctx.dispatch_lock.try_lock().unwrap();
        let res = execute(SendDueRemindersUseCase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseErrors::Busy);
        assert!(mailer.sent().is_empty());

        drop(held);
        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(report.sent, 1);
    }
}
