use std::time::Duration;

use crate::delivery::EmailConfig;

/// Default time between passes.
const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Default number of rows each pass picks up.
const DEFAULT_BATCH_SIZE: i64 = 100;

/// Default number of failed passenger emails before a row is given up on.
const DEFAULT_MAX_FOLLOW_UP_ATTEMPTS: i32 = 3;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Time between passes.
    pub interval: Duration,
    /// Maximum rows handled per pass.
    pub batch_size: i64,
    /// Failed passenger emails after which a row is no longer retried.
    pub max_follow_up_attempts: i32,
    /// Recipient of staff alerts for low ratings. Alerts are skipped when unset.
    pub staff_alert_email: Option<String>,
    /// SMTP settings; `None` disables the follow-up pass.
    pub email: Option<EmailConfig>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            max_follow_up_attempts: DEFAULT_MAX_FOLLOW_UP_ATTEMPTS,
            staff_alert_email: None,
            email: None,
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default |
    /// |---------------------------------|---------|
    /// | `WORKER_INTERVAL_SECS`          | `300`   |
    /// | `WORKER_BATCH_SIZE`             | `100`   |
    /// | `WORKER_MAX_FOLLOW_UP_ATTEMPTS` | `3`     |
    /// | `STAFF_ALERT_EMAIL`             | unset   |
    ///
    /// SMTP variables are read by [`EmailConfig::from_env`].
    pub fn from_env() -> Self {
        let interval_secs: u64 = std::env::var("WORKER_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_INTERVAL_SECS.to_string())
            .parse()
            .expect("WORKER_INTERVAL_SECS must be a valid u64");

        let batch_size: i64 = std::env::var("WORKER_BATCH_SIZE")
            .unwrap_or_else(|_| DEFAULT_BATCH_SIZE.to_string())
            .parse()
            .expect("WORKER_BATCH_SIZE must be a valid i64");

        let max_follow_up_attempts: i32 = std::env::var("WORKER_MAX_FOLLOW_UP_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_FOLLOW_UP_ATTEMPTS.to_string())
            .parse()
            .expect("WORKER_MAX_FOLLOW_UP_ATTEMPTS must be a valid i32");

        Self {
            interval: Duration::from_secs(interval_secs),
            batch_size,
            max_follow_up_attempts,
            staff_alert_email: std::env::var("STAFF_ALERT_EMAIL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            email: EmailConfig::from_env(),
        }
    }
}
