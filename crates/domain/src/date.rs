use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Resolves the civil date of the instant `ts_millis` in the given timezone.
pub fn civil_date_at(ts_millis: i64, tz: &Tz) -> NaiveDate {
    tz.timestamp_millis(ts_millis).naive_local().date()
}

/// The instant, in millis, at which the given civil day begins in `tz`.
pub fn day_start_millis(date: NaiveDate, tz: &Tz) -> i64 {
    civil_time_millis(date.and_hms(0, 0, 0), tz)
}

/// The next instant, in millis, at which the daily reminder trigger should
/// fire: the first occurrence of `hour` o'clock wall-clock time in `tz`
/// strictly after `now_millis`.
pub fn next_trigger_millis(now_millis: i64, hour: u32, tz: &Tz) -> i64 {
    let today = civil_date_at(now_millis, tz);
    let at_hour = civil_time_millis(today.and_hms(hour, 0, 0), tz);
    if at_hour > now_millis {
        at_hour
    } else {
        civil_time_millis(today.succ().and_hms(hour, 0, 0), tz)
    }
}

// A DST transition can make a wall-clock time ambiguous or skip it
// entirely. Ambiguity resolves to the earlier instant, a gap to the first
// valid instant after it.
fn civil_time_millis(local: NaiveDateTime, tz: &Tz) -> i64 {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
        LocalResult::None => match tz.from_local_datetime(&(local + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
            LocalResult::None => local.timestamp_millis(),
        },
    }
}
