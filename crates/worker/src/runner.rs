//! Periodic post-processing scheduler.
//!
//! [`FeedbackWorker`] runs every pass once per interval until its
//! [`CancellationToken`] is cancelled.

use std::sync::Arc;

use aerofeedback_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;
use crate::delivery::Mailer;
use crate::jobs;

/// Rows touched by one round of passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub analyzed: usize,
    pub outliers_changed: usize,
    /// `None` when no mailer is configured.
    pub follow_ups_sent: Option<usize>,
}

/// Background service running the sentiment, outlier and follow-up passes.
pub struct FeedbackWorker {
    pool: DbPool,
    config: WorkerConfig,
    mailer: Option<Arc<dyn Mailer>>,
}

impl FeedbackWorker {
    pub fn new(pool: DbPool, config: WorkerConfig, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self {
            pool,
            config,
            mailer,
        }
    }

    /// Run passes every `config.interval` until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Feedback worker cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_once().await {
                        tracing::error!(error = %e, "Feedback post-processing failed");
                    }
                }
            }
        }
    }

    /// Run each pass once, in order: sentiment, outliers, follow-ups.
    pub async fn run_once(&self) -> Result<PassSummary, sqlx::Error> {
        let analyzed = jobs::sentiment::run(&self.pool, self.config.batch_size).await?;
        let outliers_changed = jobs::outlier::run(&self.pool, self.config.batch_size).await?;

        let follow_ups_sent = match &self.mailer {
            Some(mailer) => Some(
                jobs::follow_up::run(
                    &self.pool,
                    mailer.as_ref(),
                    self.config.staff_alert_email.as_deref(),
                    self.config.batch_size,
                    self.config.max_follow_up_attempts,
                )
                .await?,
            ),
            None => None,
        };

        Ok(PassSummary {
            analyzed,
            outliers_changed,
            follow_ups_sent,
        })
    }
}
