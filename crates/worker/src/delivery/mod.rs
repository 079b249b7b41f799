//! Outbound follow-up delivery.

pub mod email;

use aerofeedback_core::follow_up::MessageContent;
use async_trait::async_trait;

pub use email::{EmailConfig, EmailDelivery, EmailError};

/// Sends one message to one recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to_email: &str, content: &MessageContent) -> Result<(), EmailError>;
}
