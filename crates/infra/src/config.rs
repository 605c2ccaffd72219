use chrono_tz::Tz;
use tracing::{info, warn};

const DEFAULT_TIMEZONE: &str = "Asia/Dhaka";
const DEFAULT_REMINDER_HOUR: u32 = 8;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Timezone in which "today" is resolved when scanning for overdue
    /// loans. Independent of the host timezone.
    pub timezone: Tz,
    /// Wall-clock hour (0-23) in `timezone` at which the daily reminder
    /// dispatch runs
    pub reminder_hour: u32,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let timezone = match std::env::var("REMINDER_TIMEZONE") {
            Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                panic!("REMINDER_TIMEZONE: {} is not a valid timezone name.", name)
            }),
            Err(_) => {
                info!(
                    "Did not find REMINDER_TIMEZONE environment variable. Using the default timezone: {}.",
                    DEFAULT_TIMEZONE
                );
                DEFAULT_TIMEZONE.parse().unwrap()
            }
        };

        let reminder_hour = match std::env::var("REMINDER_HOUR") {
            Ok(hour) => match hour.parse::<u32>() {
                Ok(hour) if hour <= 23 => hour,
                _ => panic!("REMINDER_HOUR: {} is not a valid hour of the day.", hour),
            },
            Err(_) => DEFAULT_REMINDER_HOUR,
        };

        Self {
            port,
            timezone,
            reminder_hour,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Credentials for the outgoing mail transport. Read separately from
/// `Config` so that test contexts never require them.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Mailbox reminders are sent from, e.g. "Reeni <no-reply@reeni.app>"
    pub from: String,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        Self {
            host: require_env("SMTP_HOST"),
            username: require_env("SMTP_USERNAME"),
            password: require_env("SMTP_PASSWORD"),
            from: require_env("SMTP_FROM"),
        }
    }
}

fn require_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{} env var to be present.", key))
}
