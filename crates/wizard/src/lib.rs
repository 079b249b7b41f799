//! The passenger-facing feedback wizard.
//!
//! - [`controller`] -- the synchronous step machine and its submission state.
//! - [`session`] -- runs a controller on a task, driven by events.
//! - [`gateway`] -- the persistence seam and its HTTP client.

pub mod controller;
pub mod gateway;
pub mod session;

pub use controller::{Step, SubmissionState, WizardController, WizardError, WizardView};
pub use gateway::{GatewayConfig, GatewayError, HttpGateway, PersistenceGateway, StoredFeedback};
pub use session::{SessionHandle, WizardEvent, WizardSession};
