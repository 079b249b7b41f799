use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aerofeedback_worker::config::WorkerConfig;
use aerofeedback_worker::delivery::{EmailDelivery, Mailer};
use aerofeedback_worker::runner::FeedbackWorker;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aerofeedback_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(
        interval_secs = config.interval.as_secs(),
        batch_size = config.batch_size,
        max_follow_up_attempts = config.max_follow_up_attempts,
        email_enabled = config.email.is_some(),
        staff_alerts = config.staff_alert_email.is_some(),
        "Loaded worker configuration"
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = aerofeedback_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    aerofeedback_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection pool created");

    let mailer = config
        .email
        .clone()
        .map(|email| Arc::new(EmailDelivery::new(email)) as Arc<dyn Mailer>);
    if mailer.is_none() {
        tracing::info!("SMTP_HOST not set; follow-up emails disabled");
    }

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received SIGINT (Ctrl-C), stopping worker"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
        shutdown.cancel();
    });

    FeedbackWorker::new(pool, config, mailer).run(cancel).await;
    tracing::info!("Worker stopped");
}
