//! Event-driven wrapper around [`WizardController`].
//!
//! A session owns one controller on a background task. User actions arrive
//! over an mpsc channel and are applied one at a time; the gateway call runs
//! on its own task and its outcome is fed back into the same loop, so the
//! controller is never touched concurrently. Every change is published as a
//! [`WizardView`] on a watch channel.

use std::sync::Arc;

use aerofeedback_core::category::FeedbackCategory;
use aerofeedback_core::rating::Rating;
use aerofeedback_core::validation::{ContactRules, Field};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::controller::{WizardController, WizardError, WizardView};
use crate::gateway::{GatewayError, PersistenceGateway, StoredFeedback};

/// Capacity of the event channel.
const EVENT_BUFFER: usize = 32;

/// A user action.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    SelectRating(Rating),
    ToggleCategory(FeedbackCategory),
    UpdateField { field: Field, value: String },
    Advance,
    Back,
    Submit,
    StartNewSession,
}

/// The session task has stopped.
#[derive(Debug, thiserror::Error)]
#[error("Wizard session has ended")]
pub struct SessionClosed;

type InFlight = JoinHandle<Result<StoredFeedback, GatewayError>>;

/// Background task owning one wizard.
pub struct WizardSession {
    controller: WizardController,
    gateway: Arc<dyn PersistenceGateway>,
    events: mpsc::Receiver<WizardEvent>,
    view: watch::Sender<WizardView>,
    in_flight: Option<InFlight>,
}

impl WizardSession {
    /// Start a session task.
    ///
    /// The task runs until every [`SessionHandle`] is dropped, then waits for
    /// any outstanding submission and returns the final controller.
    pub fn spawn(
        gateway: Arc<dyn PersistenceGateway>,
        rules: ContactRules,
    ) -> (SessionHandle, JoinHandle<WizardController>) {
        let controller = WizardController::with_rules(rules);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (view_tx, view_rx) = watch::channel(controller.view());

        let session = Self {
            controller,
            gateway,
            events: event_rx,
            view: view_tx,
            in_flight: None,
        };
        let task = tokio::spawn(session.run());

        (
            SessionHandle {
                events: event_tx,
                view: view_rx,
            },
            task,
        )
    }

    async fn run(mut self) -> WizardController {
        tracing::debug!("Wizard session started");

        loop {
            tokio::select! {
                outcome = await_outcome(&mut self.in_flight), if self.in_flight.is_some() => {
                    self.in_flight = None;
                    self.finish(outcome);
                }
                event = self.events.recv() => match event {
                    Some(event) => self.apply(event),
                    None => break,
                },
            }
        }

        if self.in_flight.is_some() {
            let outcome = await_outcome(&mut self.in_flight).await;
            self.in_flight = None;
            self.finish(outcome);
        }

        tracing::debug!("Wizard session ended");
        self.controller
    }

    fn apply(&mut self, event: WizardEvent) {
        let result = match event.clone() {
            WizardEvent::SelectRating(rating) => self.controller.select_rating(rating),
            WizardEvent::ToggleCategory(category) => self.controller.toggle_category(category),
            WizardEvent::UpdateField { field, value } => {
                self.controller.update_field(field, &value)
            }
            WizardEvent::Advance => self.controller.advance().map(|_| ()),
            WizardEvent::Back => self.controller.back().map(|_| ()),
            WizardEvent::Submit => self.issue_submit(),
            WizardEvent::StartNewSession => self.controller.start_new_session(),
        };

        if let Err(err) = result {
            tracing::debug!(?event, error = %err, "Wizard event refused");
        }
        self.publish();
    }

    fn issue_submit(&mut self) -> Result<(), WizardError> {
        let snapshot = self.controller.begin_submit()?;
        let gateway = Arc::clone(&self.gateway);
        self.in_flight = Some(tokio::spawn(async move { gateway.submit(&snapshot).await }));
        Ok(())
    }

    fn finish(&mut self, outcome: Result<StoredFeedback, GatewayError>) {
        if let Err(err) = self.controller.complete_submit(outcome) {
            tracing::warn!(error = %err, "Dropped submission outcome");
        }
        self.publish();
    }

    fn publish(&self) {
        self.view.send_replace(self.controller.view());
    }
}

/// Wait for the in-flight request. Pends forever when there is none.
async fn await_outcome(slot: &mut Option<InFlight>) -> Result<StoredFeedback, GatewayError> {
    match slot {
        Some(handle) => handle
            .await
            .unwrap_or_else(|e| Err(GatewayError::TaskFailed(e.to_string()))),
        None => std::future::pending().await,
    }
}

/// Front-end side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::Sender<WizardEvent>,
    view: watch::Receiver<WizardView>,
}

impl SessionHandle {
    pub async fn send(&self, event: WizardEvent) -> Result<(), SessionClosed> {
        self.events.send(event).await.map_err(|_| SessionClosed)
    }

    /// The most recently published view.
    pub fn view(&self) -> WizardView {
        self.view.borrow().clone()
    }

    /// Wait until the published view satisfies `predicate`, returning it.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&WizardView) -> bool,
    ) -> Result<WizardView, SessionClosed> {
        self.view
            .wait_for(predicate)
            .await
            .map(|view| WizardView::clone(&view))
            .map_err(|_| SessionClosed)
    }
}
