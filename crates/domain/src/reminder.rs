/// Dedup marker recording that a reminder email went out for a `LoanItem`.
///
/// A loan carrying a `ReminderState` becomes eligible again once
/// `last_sent_at` falls before the start of the current civil day, so an
/// unpaid loan keeps receiving one reminder per day until it is marked as
/// returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderState {
    /// Timestamp in millis of the last confirmed send
    pub last_sent_at: i64,
    /// Total number of reminders sent for this loan
    pub count: u32,
}

/// Outcome counts for a single reminder dispatch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Candidates for which a send was attempted
    pub attempted: usize,
    /// Sends confirmed by the mail transport
    pub sent: usize,
    /// Sends rejected by the mail transport, left untouched for the next run
    pub failed: usize,
    /// Candidates dropped before sending, e.g. because of a blank address
    pub skipped: usize,
}
