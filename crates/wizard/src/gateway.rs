//! Client side of the persistence gateway.
//!
//! [`PersistenceGateway`] is the seam the wizard submits through;
//! [`HttpGateway`] implements it over `POST /api/feedback` using [`reqwest`].

use std::time::Duration;

use aerofeedback_core::category::FeedbackCategory;
use aerofeedback_core::rating::Rating;
use aerofeedback_core::submission::FeedbackSubmission;
use aerofeedback_core::types::{DbId, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default gateway base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Path of the submission endpoint, relative to the base URL.
const FEEDBACK_PATH: &str = "/api/feedback";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The record the gateway stored, as returned in the `data` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeedback {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub rating: Rating,
    pub feedback_areas: Vec<FeedbackCategory>,
    pub comments: String,
    pub created_at: Option<Timestamp>,
}

impl StoredFeedback {
    /// Whether the stored values are exactly the ones that were submitted.
    pub fn matches(&self, submission: &FeedbackSubmission) -> bool {
        self.name == submission.name
            && self.phone == submission.phone
            && self.email == submission.email
            && self.rating == submission.rating
            && self.feedback_areas == submission.feedback_areas
            && self.comments == submission.comments
    }
}

/// `201 Created` body of the submission endpoint.
#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    data: StoredFeedback,
}

/// Error body returned by the gateway on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Errors from submitting to the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (connection refused, timeout, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("Gateway rejected submission ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the body, or the raw body when absent.
        message: String,
    },

    /// A 2xx response whose body was not the expected record.
    #[error("Unexpected gateway response: {0}")]
    Decode(String),

    /// The task awaiting the response died before producing an outcome.
    #[error("Submission task failed: {0}")]
    TaskFailed(String),
}

impl GatewayError {
    /// Text to show the submitter.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Request(_) => "Could not reach the feedback server".to_string(),
            Self::Decode(_) | Self::TaskFailed(_) => {
                "Unexpected response from the feedback server".to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Durable storage for one feedback record per completed session.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Store `submission`, returning the record as persisted.
    async fn submit(&self, submission: &FeedbackSubmission) -> Result<StoredFeedback, GatewayError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Load from the environment.
    ///
    /// | Variable                    | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `FEEDBACK_API_URL`          | `http://localhost:5000` |
    /// | `FEEDBACK_API_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FEEDBACK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var("FEEDBACK_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self { base_url, timeout }
    }
}

/// Submits feedback to the gateway service over HTTP.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    /// Build a client for the configured gateway.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{FEEDBACK_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Turn a non-2xx response into [`GatewayError::Rejected`], preferring
    /// the body's `error` field over the raw text.
    async fn rejection(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => body,
        };

        GatewayError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn submit(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<StoredFeedback, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let bytes = response.bytes().await?;
        let envelope: CreatedEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}
