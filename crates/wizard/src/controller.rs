//! The feedback wizard state machine.
//!
//! Four steps -- rating, categories, contact details, success -- with a
//! submission sub-state that only exists while on the contact step. The
//! private [`Stage`] enum makes it impossible to be "sending" anywhere else,
//! or to reach the success step without a stored record.
//!
//! Submission is a two-step contract: [`WizardController::begin_submit`]
//! issues the request (moving to `Sending` and handing back the snapshot to
//! post), and [`WizardController::complete_submit`] records the response.
//! While a request is outstanding `begin_submit` refuses, so at most one
//! request per session is ever in flight.

use aerofeedback_core::category::FeedbackCategory;
use aerofeedback_core::rating::{
    rating_pose_parameters, rating_theme, PoseParameters, Rating, ThemeKey,
};
use aerofeedback_core::submission::FeedbackSubmission;
use aerofeedback_core::types::DbId;
use aerofeedback_core::validation::{Contact, ContactRules, Field, FieldValidity};
use indexmap::IndexSet;
use serde::Serialize;

use crate::gateway::{GatewayError, PersistenceGateway, StoredFeedback};

// ---------------------------------------------------------------------------
// Public state
// ---------------------------------------------------------------------------

/// The four wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Rating,
    Categories,
    Contact,
    Success,
}

impl Step {
    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            Self::Rating => 1,
            Self::Categories => 2,
            Self::Contact => 3,
            Self::Success => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rating => "Rating",
            Self::Categories => "Category Selection",
            Self::Contact => "Contact Details",
            Self::Success => "Success",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

/// Where the session stands with respect to its one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Sending,
    Failed,
    Succeeded,
}

/// Everything the user has entered so far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionInput {
    pub rating: Rating,
    /// Selection order is kept for display only.
    pub selected_categories: IndexSet<FeedbackCategory>,
    pub contact: Contact,
}

impl SessionInput {
    /// Immutable snapshot to hand to the gateway.
    pub fn snapshot(&self) -> FeedbackSubmission {
        let areas: Vec<FeedbackCategory> = self.selected_categories.iter().copied().collect();
        FeedbackSubmission::snapshot(&self.contact, self.rating, &areas)
    }
}

/// An action the controller refused. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("'{action}' is not available on {step}")]
    InvalidAction { action: &'static str, step: Step },

    #[error("Contact details are incomplete or invalid")]
    FormInvalid,

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("No submission is in flight")]
    NotSending,
}

// ---------------------------------------------------------------------------
// Internal stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum ContactPhase {
    Idle,
    Sending,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Rating,
    Categories,
    Contact(ContactPhase),
    Success(StoredFeedback),
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Read-only snapshot of everything a front end needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub step: Step,
    pub step_number: u8,
    pub submission: SubmissionState,
    pub rating: Rating,
    pub theme: ThemeKey,
    pub pose: PoseParameters,
    pub categories: Vec<FeedbackCategory>,
    pub contact: Contact,
    pub validity: FieldValidity,
    pub can_submit: bool,
    pub error: Option<String>,
    pub record_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// One session's wizard: its accumulated input plus the current stage.
#[derive(Debug, Clone)]
pub struct WizardController {
    input: SessionInput,
    stage: Stage,
    rules: ContactRules,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Start a session with default input and the default contact rules.
    pub fn new() -> Self {
        Self::with_rules(ContactRules::default())
    }

    pub fn with_rules(rules: ContactRules) -> Self {
        Self {
            input: SessionInput::default(),
            stage: Stage::Rating,
            rules,
        }
    }

    // -- queries --

    pub fn step(&self) -> Step {
        match self.stage {
            Stage::Rating => Step::Rating,
            Stage::Categories => Step::Categories,
            Stage::Contact(_) => Step::Contact,
            Stage::Success(_) => Step::Success,
        }
    }

    pub fn submission_state(&self) -> SubmissionState {
        match &self.stage {
            Stage::Contact(ContactPhase::Sending) => SubmissionState::Sending,
            Stage::Contact(ContactPhase::Failed(_)) => SubmissionState::Failed,
            Stage::Success(_) => SubmissionState::Succeeded,
            Stage::Rating | Stage::Categories | Stage::Contact(ContactPhase::Idle) => {
                SubmissionState::Idle
            }
        }
    }

    pub fn input(&self) -> &SessionInput {
        &self.input
    }

    pub fn rules(&self) -> &ContactRules {
        &self.rules
    }

    pub fn theme(&self) -> ThemeKey {
        rating_theme(self.input.rating)
    }

    pub fn pose(&self) -> PoseParameters {
        rating_pose_parameters(self.input.rating)
    }

    pub fn field_validity(&self) -> FieldValidity {
        self.rules.field_validity(&self.input.contact)
    }

    pub fn is_form_valid(&self) -> bool {
        self.rules.is_form_valid(&self.input.contact)
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(
            self.stage,
            Stage::Contact(ContactPhase::Idle | ContactPhase::Failed(_))
        ) && self.is_form_valid()
    }

    /// The failure message from the last submission attempt, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        match &self.stage {
            Stage::Contact(ContactPhase::Failed(message)) => Some(message),
            _ => None,
        }
    }

    /// The record stored by a successful submission.
    pub fn stored_record(&self) -> Option<&StoredFeedback> {
        match &self.stage {
            Stage::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn view(&self) -> WizardView {
        let step = self.step();
        WizardView {
            step,
            step_number: step.number(),
            submission: self.submission_state(),
            rating: self.input.rating,
            theme: self.theme(),
            pose: self.pose(),
            categories: self.input.selected_categories.iter().copied().collect(),
            contact: self.input.contact.clone(),
            validity: self.field_validity(),
            can_submit: self.can_submit(),
            error: self.last_error().map(str::to_string),
            record_id: self.stored_record().map(|r| r.id),
        }
    }

    // -- step 1 --

    pub fn select_rating(&mut self, rating: Rating) -> Result<(), WizardError> {
        self.require(Step::Rating, "select rating")?;
        self.input.rating = rating;
        Ok(())
    }

    // -- step 2 --

    /// Add the category if absent, remove it if present.
    pub fn toggle_category(&mut self, category: FeedbackCategory) -> Result<(), WizardError> {
        self.require(Step::Categories, "toggle category")?;
        if !self.input.selected_categories.shift_remove(&category) {
            self.input.selected_categories.insert(category);
        }
        Ok(())
    }

    // -- step 3 --

    /// Sanitize and store a contact field. Editing stays possible while a
    /// request is in flight; the request carries the earlier snapshot.
    pub fn update_field(&mut self, field: Field, raw: &str) -> Result<(), WizardError> {
        self.require(Step::Contact, "edit contact details")?;
        self.input.contact.update(field, raw);
        Ok(())
    }

    // -- navigation --

    /// Confirm the current step and move to the next one.
    ///
    /// Leaving the contact step goes through [`begin_submit`](Self::begin_submit).
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        self.stage = match self.stage {
            Stage::Rating => Stage::Categories,
            Stage::Categories => Stage::Contact(ContactPhase::Idle),
            _ => {
                return Err(WizardError::InvalidAction {
                    action: "continue",
                    step: self.step(),
                })
            }
        };
        tracing::debug!(step = %self.step(), "Wizard advanced");
        Ok(self.step())
    }

    /// Go back one step, keeping everything entered so far.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        self.stage = match self.stage {
            Stage::Categories => Stage::Rating,
            Stage::Contact(ContactPhase::Sending) => return Err(WizardError::SubmissionInFlight),
            Stage::Contact(_) => Stage::Categories,
            Stage::Rating | Stage::Success(_) => {
                return Err(WizardError::InvalidAction {
                    action: "back",
                    step: self.step(),
                })
            }
        };
        tracing::debug!(step = %self.step(), "Wizard went back");
        Ok(self.step())
    }

    // -- submission --

    /// Issue the submission: move to `Sending` and return the snapshot to post.
    pub fn begin_submit(&mut self) -> Result<FeedbackSubmission, WizardError> {
        match self.stage {
            Stage::Contact(ContactPhase::Sending) => return Err(WizardError::SubmissionInFlight),
            Stage::Contact(_) => {}
            _ => {
                return Err(WizardError::InvalidAction {
                    action: "submit",
                    step: self.step(),
                })
            }
        }
        if !self.is_form_valid() {
            return Err(WizardError::FormInvalid);
        }

        self.stage = Stage::Contact(ContactPhase::Sending);
        tracing::debug!(rating = %self.input.rating, "Submission issued");
        Ok(self.input.snapshot())
    }

    /// Record the gateway's response to the outstanding submission.
    pub fn complete_submit(
        &mut self,
        outcome: Result<StoredFeedback, GatewayError>,
    ) -> Result<SubmissionState, WizardError> {
        if self.stage != Stage::Contact(ContactPhase::Sending) {
            return Err(WizardError::NotSending);
        }

        self.stage = match outcome {
            Ok(record) => {
                tracing::info!(feedback_id = record.id, "Feedback submitted");
                Stage::Success(record)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Feedback submission failed");
                Stage::Contact(ContactPhase::Failed(err.user_message()))
            }
        };
        Ok(self.submission_state())
    }

    /// Issue the submission through `gateway` and record its outcome.
    ///
    /// A gateway failure is not an `Err` here: it leaves the wizard in
    /// [`SubmissionState::Failed`] with the message in [`last_error`](Self::last_error).
    pub async fn submit(
        &mut self,
        gateway: &dyn PersistenceGateway,
    ) -> Result<SubmissionState, WizardError> {
        let snapshot = self.begin_submit()?;
        let outcome = gateway.submit(&snapshot).await;
        self.complete_submit(outcome)
    }

    // -- step 4 --

    /// Discard this session's input and return to step 1.
    pub fn start_new_session(&mut self) -> Result<(), WizardError> {
        self.require(Step::Success, "start new session")?;
        self.input = SessionInput::default();
        self.stage = Stage::Rating;
        tracing::debug!("New feedback session started");
        Ok(())
    }

    fn require(&self, step: Step, action: &'static str) -> Result<(), WizardError> {
        if self.step() == step {
            Ok(())
        } else {
            Err(WizardError::InvalidAction {
                action,
                step: self.step(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;

    fn rating(n: u8) -> Rating {
        Rating::new(n).unwrap()
    }

    fn stored_from(submission: &FeedbackSubmission) -> StoredFeedback {
        StoredFeedback {
            id: 1,
            name: submission.name.clone(),
            phone: submission.phone.clone(),
            email: submission.email.clone(),
            rating: submission.rating,
            feedback_areas: submission.feedback_areas.clone(),
            comments: submission.comments.clone(),
            created_at: None,
        }
    }

    fn rejected(message: &str) -> GatewayError {
        GatewayError::Rejected {
            status: 500,
            message: message.to_string(),
        }
    }

    /// Drive a fresh wizard to the contact step with valid details.
    fn at_valid_contact() -> WizardController {
        let mut w = WizardController::new();
        w.advance().unwrap();
        w.advance().unwrap();
        w.update_field(Field::Name, "Jordan Smith").unwrap();
        w.update_field(Field::Phone, "5551234567").unwrap();
        w.update_field(Field::Email, "j@x.com").unwrap();
        w
    }

    /// Echoes the submission back as stored, counting calls.
    struct EchoGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PersistenceGateway for EchoGateway {
        async fn submit(
            &self,
            submission: &FeedbackSubmission,
        ) -> Result<StoredFeedback, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(stored_from(submission))
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl PersistenceGateway for FailingGateway {
        async fn submit(&self, _: &FeedbackSubmission) -> Result<StoredFeedback, GatewayError> {
            Err(rejected("db write failed"))
        }
    }

    // -- initial state --

    #[test]
    fn starts_on_rating_with_defaults() {
        let w = WizardController::new();
        assert_eq!(w.step(), Step::Rating);
        assert_eq!(w.step().number(), 1);
        assert_eq!(w.submission_state(), SubmissionState::Idle);
        assert_eq!(w.input().rating.value(), 3);
        assert!(w.input().selected_categories.is_empty());
        assert_eq!(w.input().contact, Contact::default());
        assert_eq!(w.theme(), ThemeKey::Warning);
    }

    // -- step 1 --

    #[test]
    fn rating_selection_updates_theme_and_pose() {
        let mut w = WizardController::new();
        w.select_rating(rating(1)).unwrap();
        assert_eq!(w.theme(), ThemeKey::Alert);
        assert_eq!(w.pose().rotation_degrees, -15);
        w.select_rating(rating(5)).unwrap();
        assert_eq!(w.theme(), ThemeKey::Positive);
        assert_eq!(w.pose().rotation_degrees, -90);
    }

    #[test]
    fn rating_only_selectable_on_step_one() {
        let mut w = WizardController::new();
        w.advance().unwrap();
        assert_matches!(
            w.select_rating(rating(5)),
            Err(WizardError::InvalidAction { step: Step::Categories, .. })
        );
        assert_eq!(w.input().rating.value(), 3);
    }

    // -- step 2 --

    #[test]
    fn toggle_twice_restores_selection() {
        let mut w = WizardController::new();
        w.advance().unwrap();
        w.toggle_category(FeedbackCategory::ComfortFacilities)
            .unwrap();
        w.toggle_category(FeedbackCategory::RetailFoodServices)
            .unwrap();
        let before = w.input().selected_categories.clone();

        for category in FeedbackCategory::ALL {
            w.toggle_category(category).unwrap();
            w.toggle_category(category).unwrap();
            assert_eq!(w.input().selected_categories, before, "{category}");
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut w = WizardController::new();
        w.advance().unwrap();
        w.toggle_category(FeedbackCategory::SafetySecurity).unwrap();
        let selected = &w.input().selected_categories;
        assert!(selected.contains(&FeedbackCategory::SafetySecurity));
        w.toggle_category(FeedbackCategory::SafetySecurity).unwrap();
        assert!(w.input().selected_categories.is_empty());
    }

    #[test]
    fn zero_or_all_categories_may_advance() {
        let mut w = WizardController::new();
        w.advance().unwrap();
        assert_eq!(w.advance().unwrap(), Step::Contact);

        let mut w = WizardController::new();
        w.advance().unwrap();
        for category in FeedbackCategory::ALL {
            w.toggle_category(category).unwrap();
        }
        assert_eq!(w.advance().unwrap(), Step::Contact);
        assert_eq!(
            w.input().snapshot().feedback_areas,
            FeedbackCategory::ALL.to_vec()
        );
    }

    #[test]
    fn categories_not_toggleable_outside_step_two() {
        let mut w = WizardController::new();
        assert!(w.toggle_category(FeedbackCategory::SafetySecurity).is_err());
        assert!(w.input().selected_categories.is_empty());
    }

    // -- navigation --

    #[test]
    fn back_and_forward_preserve_input() {
        let mut w = WizardController::new();
        w.select_rating(rating(4)).unwrap();
        w.advance().unwrap();
        w.toggle_category(FeedbackCategory::InformationCommunication)
            .unwrap();
        w.advance().unwrap();
        w.update_field(Field::Name, "Jordan Smith").unwrap();
        w.update_field(Field::Comments, "Signs were unclear")
            .unwrap();
        let before = w.input().clone();

        assert_eq!(w.back().unwrap(), Step::Categories);
        assert_eq!(w.back().unwrap(), Step::Rating);
        assert_eq!(w.input(), &before);
        assert_eq!(w.advance().unwrap(), Step::Categories);
        assert_eq!(w.advance().unwrap(), Step::Contact);
        assert_eq!(w.input(), &before);
    }

    #[test]
    fn no_back_from_first_step_and_no_skipping() {
        let mut w = WizardController::new();
        assert_matches!(w.back(), Err(WizardError::InvalidAction { .. }));
        assert_eq!(w.step(), Step::Rating);

        let mut w = at_valid_contact();
        assert_matches!(w.advance(), Err(WizardError::InvalidAction { .. }));
        assert_eq!(w.step(), Step::Contact);
    }

    // -- step 3 --

    #[test]
    fn field_updates_are_sanitized() {
        let mut w = WizardController::new();
        w.advance().unwrap();
        w.advance().unwrap();
        w.update_field(Field::Name, "Jordan 5mith!").unwrap();
        w.update_field(Field::Phone, "+1 555-123-4567").unwrap();
        assert_eq!(w.input().contact.name, "Jordan mith");
        assert_eq!(w.input().contact.phone, "15551234567");
    }

    #[test]
    fn short_name_keeps_submit_disabled() {
        let mut w = at_valid_contact();
        w.update_field(Field::Name, "Al").unwrap();

        assert!(!w.is_form_valid());
        assert!(!w.can_submit());
        assert_eq!(w.begin_submit(), Err(WizardError::FormInvalid));
        assert_eq!(w.submission_state(), SubmissionState::Idle);
    }

    #[test]
    fn submit_rejected_outside_contact_step() {
        let mut w = WizardController::new();
        assert_matches!(w.begin_submit(), Err(WizardError::InvalidAction { .. }));
    }

    // -- submission --

    #[test]
    fn begin_submit_snapshots_input() {
        let mut w = WizardController::new();
        w.select_rating(rating(5)).unwrap();
        w.advance().unwrap();
        w.toggle_category(FeedbackCategory::SafetySecurity).unwrap();
        w.advance().unwrap();
        w.update_field(Field::Name, "Jordan Smith").unwrap();
        w.update_field(Field::Phone, "5551234567").unwrap();
        w.update_field(Field::Email, "j@x.com").unwrap();

        let snapshot = w.begin_submit().unwrap();

        assert_eq!(w.submission_state(), SubmissionState::Sending);
        assert!(!w.can_submit());
        assert_eq!(snapshot.name, "Jordan Smith");
        assert_eq!(snapshot.phone, "5551234567");
        assert_eq!(snapshot.email, "j@x.com");
        assert_eq!(snapshot.rating.value(), 5);
        assert_eq!(
            snapshot.feedback_areas,
            vec![FeedbackCategory::SafetySecurity]
        );
        assert_eq!(snapshot.comments, "");
    }

    #[test]
    fn second_submit_while_sending_is_refused() {
        let mut w = at_valid_contact();
        w.begin_submit().unwrap();
        assert_eq!(w.begin_submit(), Err(WizardError::SubmissionInFlight));
        assert_eq!(w.back(), Err(WizardError::SubmissionInFlight));
        assert_eq!(w.submission_state(), SubmissionState::Sending);
    }

    #[test]
    fn success_moves_to_step_four() {
        let mut w = at_valid_contact();
        let snapshot = w.begin_submit().unwrap();

        let state = w.complete_submit(Ok(stored_from(&snapshot))).unwrap();

        assert_eq!(state, SubmissionState::Succeeded);
        assert_eq!(w.step(), Step::Success);
        assert!(w.stored_record().unwrap().matches(&snapshot));
        assert_eq!(w.view().record_id, Some(1));
    }

    #[test]
    fn failure_stays_on_contact_and_keeps_input() {
        let mut w = at_valid_contact();
        let before = w.input().clone();
        w.begin_submit().unwrap();

        let state = w.complete_submit(Err(rejected("db write failed"))).unwrap();

        assert_eq!(state, SubmissionState::Failed);
        assert_eq!(w.step(), Step::Contact);
        assert_eq!(w.input(), &before);
        assert_eq!(w.last_error(), Some("db write failed"));
        assert!(w.can_submit());

        // User may edit and retry by hand.
        w.update_field(Field::Comments, "retrying").unwrap();
        assert!(w.begin_submit().is_ok());
        assert_eq!(w.last_error(), None);
    }

    #[test]
    fn completion_without_request_is_refused() {
        let mut w = at_valid_contact();
        assert_eq!(
            w.complete_submit(Err(rejected("late"))),
            Err(WizardError::NotSending)
        );
        assert_eq!(w.submission_state(), SubmissionState::Idle);
    }

    #[test]
    fn success_only_reachable_from_sending() {
        let mut w = WizardController::new();
        let stored = stored_from(&w.input().snapshot());
        assert_eq!(w.complete_submit(Ok(stored)), Err(WizardError::NotSending));
        assert_eq!(w.step(), Step::Rating);
    }

    // -- step 4 --

    #[test]
    fn new_session_resets_to_defaults() {
        let mut w = at_valid_contact();
        let snapshot = w.begin_submit().unwrap();
        w.complete_submit(Ok(stored_from(&snapshot))).unwrap();

        assert!(w.back().is_err());
        assert!(w.update_field(Field::Name, "x").is_err());

        w.start_new_session().unwrap();
        assert_eq!(w.step(), Step::Rating);
        assert_eq!(w.input(), &SessionInput::default());
        assert_eq!(w.submission_state(), SubmissionState::Idle);
    }

    #[test]
    fn new_session_only_from_success() {
        let mut w = at_valid_contact();
        assert_matches!(w.start_new_session(), Err(WizardError::InvalidAction { .. }));
        assert_eq!(w.step(), Step::Contact);
    }

    // -- async submit --

    #[tokio::test]
    async fn submit_through_gateway_succeeds() {
        let gateway = EchoGateway {
            calls: AtomicUsize::new(0),
        };
        let mut w = at_valid_contact();

        let state = w.submit(&gateway).await.unwrap();

        assert_eq!(state, SubmissionState::Succeeded);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(w.step(), Step::Success);
    }

    #[tokio::test]
    async fn submit_through_failing_gateway_records_failure() {
        let mut w = at_valid_contact();

        let state = w.submit(&FailingGateway).await.unwrap();

        assert_eq!(state, SubmissionState::Failed);
        assert_eq!(w.last_error(), Some("db write failed"));
        assert_eq!(w.view().error.as_deref(), Some("db write failed"));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_gateway() {
        let gateway = EchoGateway {
            calls: AtomicUsize::new(0),
        };
        let mut w = at_valid_contact();
        w.update_field(Field::Email, "not-an-email").unwrap();

        assert_eq!(w.submit(&gateway).await, Err(WizardError::FormInvalid));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }
}
