use crate::reminder::send_due_reminders::SendDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::sleep;
use reeni_domain::date::next_trigger_millis;
use reeni_infra::ReeniContext;
use std::time::Duration;
use tracing::info;

/// Fires the reminder dispatch once per civil day at the configured
/// wall-clock hour in the configured timezone. Triggers missed while the
/// process was down are not backfilled, the due-date filter picks the
/// accumulated loans up at the next firing.
pub fn start_send_reminders_job(ctx: ReeniContext) {
    actix_web::rt::spawn(async move {
        loop {
            let now = ctx.sys.get_timestamp_millis();
            let next = next_trigger_millis(now, ctx.config.reminder_hour, &ctx.config.timezone);
            sleep(Duration::from_millis((next - now) as u64)).await;

            info!("Daily reminder trigger fired");
            let usecase = SendDueRemindersUseCase;
            let _ = execute(usecase, &ctx).await;
        }
    });
}
