//! WizardController owns the draft and drives step transitions,
//! validation gating, location acquisition and completion.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{WizardConfig, banners};
use crate::error::{FieldError, WizardError};

use super::draft::{FarmOnboardingDraft, Field, FieldUpdate, FormStore};
use super::geolocation::{AcquireOutcome, GeolocationAcquirer};
use super::review::ReviewSummary;
use super::session::{Navigator, Route, SessionProvider};
use super::state::WizardStep;
use super::validate::{ValidationErrors, validate_step};

/// What a `next`/`previous` request did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The wizard moved; the front end should reset its scroll position.
    Moved { from: WizardStep, to: WizardStep },
    /// Validation failed; the step is unchanged.
    Blocked(ValidationErrors),
    /// Nothing to do from this step.
    Stayed(WizardStep),
}

impl Transition {
    pub fn resets_scroll(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Handle for one in-flight location request.
#[derive(Debug, Clone)]
pub struct LocateTicket {
    id: u64,
    cancel: CancellationToken,
}

impl LocateTicket {
    /// Token to pass to [`GeolocationAcquirer::acquire`].
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Result of completing the wizard.
#[derive(Debug, Clone)]
pub struct Completion {
    pub route: Route,
    /// Whether the session's onboarding flag was set (false for demo accounts).
    pub marked_complete: bool,
    /// The collected draft. The controller does not send it anywhere.
    pub draft: FarmOnboardingDraft,
}

pub struct WizardController {
    step: WizardStep,
    form: FormStore,
    errors: ValidationErrors,
    location_message: Option<&'static str>,
    pending_locate: Option<(u64, CancellationToken)>,
    next_ticket: u64,
    lifetime: CancellationToken,
    completed: bool,
    config: WizardConfig,
    session: Arc<dyn SessionProvider>,
    navigator: Arc<dyn Navigator>,
}

impl WizardController {
    pub fn new(
        config: WizardConfig,
        session: Arc<dyn SessionProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let draft = FarmOnboardingDraft::with_defaults(&config.effective_defaults());
        Self {
            step: WizardStep::default(),
            form: FormStore::new(draft),
            errors: ValidationErrors::new(),
            location_message: None,
            pending_locate: None,
            next_ticket: 0,
            lifetime: CancellationToken::new(),
            completed: false,
            config,
            session,
            navigator,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Errors from the most recent `next` on this or an earlier step, minus
    /// any fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn draft(&self) -> FarmOnboardingDraft {
        self.form.draft()
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Advisory text from the last failed location request.
    pub fn location_message(&self) -> Option<&'static str> {
        self.location_message
    }

    pub fn is_locating(&self) -> bool {
        self.pending_locate.is_some()
    }

    pub fn review(&self) -> ReviewSummary {
        ReviewSummary::from_draft(self.form.view())
    }

    // ── Field edits ─────────────────────────────────────────────────

    /// Replace one field and clear that field's error, leaving others alone.
    pub fn set_field(&mut self, update: FieldUpdate) {
        let field = update.field();
        self.form.set_field(update);
        if self.errors.clear(field) {
            tracing::trace!(%field, "Cleared field error on edit");
        }
    }

    /// [`set_field`](Self::set_field) from a field and its raw input value.
    pub fn set_field_raw(&mut self, field: Field, raw: &str) -> Result<(), FieldError> {
        let update = FieldUpdate::parse(field, raw)?;
        self.set_field(update);
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Validate the current step and advance if it is clean.
    pub fn next(&mut self) -> Transition {
        let Some(to) = self.step.next() else {
            return Transition::Stayed(self.step);
        };

        self.errors = validate_step(self.step, self.form.view());
        if !self.errors.is_empty() {
            tracing::debug!(
                step = %self.step,
                errors = self.errors.len(),
                "Step validation failed"
            );
            return Transition::Blocked(self.errors.clone());
        }

        let from = self.step;
        self.step = to;
        tracing::debug!(%from, %to, "Wizard advanced");
        Transition::Moved { from, to }
    }

    /// Go back one step. Never validates and never touches errors.
    pub fn previous(&mut self) -> Transition {
        match self.step.previous() {
            Some(to) => {
                let from = self.step;
                self.step = to;
                tracing::debug!(%from, %to, "Wizard went back");
                Transition::Moved { from, to }
            }
            None => Transition::Stayed(self.step),
        }
    }

    // ── Location ────────────────────────────────────────────────────

    /// Start a location request. Returns `None` while one is already pending
    /// or after the wizard has been unmounted.
    pub fn begin_locate(&mut self) -> Option<LocateTicket> {
        if self.pending_locate.is_some() || self.lifetime.is_cancelled() {
            return None;
        }
        self.next_ticket += 1;
        let ticket = LocateTicket {
            id: self.next_ticket,
            cancel: self.lifetime.child_token(),
        };
        self.pending_locate = Some((ticket.id, ticket.cancel.clone()));
        Some(ticket)
    }

    /// Apply the outcome of a request started with [`begin_locate`](Self::begin_locate).
    ///
    /// Returns `false` when the result was discarded: the ticket was
    /// cancelled, is not the pending one, or the request itself was cancelled.
    pub fn apply_location(&mut self, ticket: LocateTicket, outcome: AcquireOutcome) -> bool {
        if self.pending_locate.as_ref().map(|(id, _)| *id) != Some(ticket.id) {
            tracing::debug!(ticket = ticket.id, "Discarding stale location result");
            return false;
        }
        self.pending_locate = None;

        if ticket.cancel.is_cancelled() {
            tracing::debug!(ticket = ticket.id, "Discarding location result after cancel");
            return false;
        }

        match outcome {
            AcquireOutcome::Located(coords) => {
                self.form.set_coordinates(coords.latitude, coords.longitude);
                self.location_message = None;
                true
            }
            AcquireOutcome::Failed(e) => {
                self.location_message = Some(e.user_message());
                true
            }
            AcquireOutcome::Cancelled => false,
        }
    }

    /// Cancel the pending location request, if any. The wizard stays usable.
    pub fn cancel_locate(&mut self) {
        if let Some((id, token)) = self.pending_locate.take() {
            token.cancel();
            tracing::debug!(ticket = id, "Location request cancelled");
        }
    }

    /// Begin, await and apply a location request in one call.
    pub async fn locate(&mut self, acquirer: &GeolocationAcquirer) -> bool {
        let Some(ticket) = self.begin_locate() else {
            return false;
        };
        let outcome = acquirer.acquire(ticket.token()).await;
        self.apply_location(ticket, outcome)
    }

    /// Whether to show the "use my location" hint banner.
    pub fn shows_location_hint(&self) -> bool {
        self.form.view().coordinates().is_none()
            && !self.config.preferences.is_dismissed(banners::LOCATION_HINT)
    }

    /// Hide the location hint. Callers persist `config().preferences`.
    pub fn dismiss_location_hint(&mut self) {
        self.config.preferences.dismiss(banners::LOCATION_HINT);
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Tear the wizard down. Any location result that arrives later is dropped.
    pub fn unmount(&mut self) {
        self.lifetime.cancel();
    }

    /// Finish onboarding from the review step and go to the dashboard.
    pub fn complete(&mut self) -> Result<Completion, WizardError> {
        if self.completed {
            return Err(WizardError::AlreadyCompleted);
        }
        if !self.step.is_review() {
            return Err(WizardError::NotAtReview {
                step: self.step.number(),
            });
        }

        let session = self.session.session();
        let marked_complete = if session.is_demo_account() {
            tracing::info!(user = session.display_name(), "Demo account, skipping onboarding flag");
            false
        } else {
            self.session.mark_onboarding_complete();
            tracing::info!(user = session.display_name(), "Onboarding marked complete");
            true
        };

        // Only the session flag changes; the farm draft has no persistence path here.
        tracing::info!(
            farm_name = %self.form.view().farm_name.trim(),
            "Farm draft handed back to caller without persistence"
        );

        self.completed = true;
        self.unmount();
        let route = Route::Dashboard;
        self.navigator.navigate(route);

        Ok(Completion {
            route,
            marked_complete,
            draft: self.form.draft(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::onboarding::geolocation::{Coordinates, GeoError, PERMISSION_MESSAGE};
    use crate::onboarding::session::{AuthenticatedUser, DemoUser, Session};
    use crate::onboarding::validate::{INVALID_NUMBER, LOCATION_REQUIRED, SOWING_DATE_REQUIRED};

    struct CountingSession {
        demo: bool,
        marks: AtomicUsize,
    }

    impl SessionProvider for CountingSession {
        fn session(&self) -> Session {
            if self.demo {
                Session::DemoAccount(DemoUser {
                    name: "Demo".into(),
                })
            } else {
                Session::Authenticated(AuthenticatedUser {
                    id: uuid::Uuid::nil(),
                    name: "Ramesh".into(),
                    phone: "9876543210".into(),
                    onboarding_completed: false,
                    onboarding_completed_at: None,
                })
            }
        }

        fn mark_onboarding_complete(&self) {
            self.marks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn wizard(demo: bool) -> (WizardController, Arc<CountingSession>, Arc<RecordingNavigator>) {
        let session = Arc::new(CountingSession {
            demo,
            marks: AtomicUsize::new(0),
        });
        let nav = Arc::new(RecordingNavigator::default());
        let wizard = WizardController::new(WizardConfig::default(), session.clone(), nav.clone());
        (wizard, session, nav)
    }

    fn fill_step_one(w: &mut WizardController) {
        w.set_field(FieldUpdate::FarmName("Green Valley Farm".into()));
        w.set_field(FieldUpdate::FarmLocation("Kharadi".into()));
        w.set_field(FieldUpdate::TotalArea("12".into()));
    }

    fn walk_to_review(w: &mut WizardController) {
        fill_step_one(w);
        w.set_field(FieldUpdate::SowingDate("2025-06-15".into()));
        for _ in 0..3 {
            assert!(w.next().resets_scroll());
        }
        assert_eq!(w.step(), WizardStep::Review);
    }

    #[test]
    fn starts_on_farm_details() {
        let (w, _, _) = wizard(false);
        assert_eq!(w.step(), WizardStep::FarmDetails);
        assert!(w.errors().is_empty());
    }

    #[test]
    fn blocked_next_keeps_step() {
        let (mut w, _, _) = wizard(false);
        let t = w.next();
        assert!(matches!(t, Transition::Blocked(ref e) if e.len() == 3));
        assert!(!t.resets_scroll());
        assert_eq!(w.step(), WizardStep::FarmDetails);
        assert_eq!(w.errors().len(), 3);
    }

    #[test]
    fn clean_next_advances_once() {
        let (mut w, _, _) = wizard(false);
        fill_step_one(&mut w);
        assert_eq!(
            w.next(),
            Transition::Moved {
                from: WizardStep::FarmDetails,
                to: WizardStep::CropDetails
            }
        );
        assert_eq!(w.step(), WizardStep::CropDetails);
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let (mut w, _, _) = wizard(false);
        w.set_field(FieldUpdate::TotalArea("abc".into()));
        w.next();
        assert_eq!(w.errors().get(Field::TotalArea), Some(INVALID_NUMBER));

        w.set_field(FieldUpdate::FarmName("Green Valley Farm".into()));
        assert!(!w.errors().contains(Field::FarmName));
        assert_eq!(w.errors().get(Field::FarmLocation), Some(LOCATION_REQUIRED));
        assert_eq!(w.errors().get(Field::TotalArea), Some(INVALID_NUMBER));
        assert_eq!(w.errors().len(), 2);
    }

    #[test]
    fn editing_with_a_still_invalid_value_clears_until_next() {
        let (mut w, _, _) = wizard(false);
        w.next();
        w.set_field(FieldUpdate::FarmName("  ".into()));
        assert!(!w.errors().contains(Field::FarmName));
        w.next();
        assert!(w.errors().contains(Field::FarmName));
    }

    #[test]
    fn step_two_requires_sowing_date() {
        let (mut w, _, _) = wizard(false);
        fill_step_one(&mut w);
        w.next();
        let t = w.next();
        assert_eq!(
            t,
            Transition::Blocked(ValidationErrors::from([(
                Field::SowingDate,
                SOWING_DATE_REQUIRED
            )]))
        );
        assert_eq!(w.step(), WizardStep::CropDetails);
    }

    #[test]
    fn previous_never_validates_or_clears() {
        let (mut w, _, _) = wizard(false);
        fill_step_one(&mut w);
        w.next();
        w.next();
        assert!(w.errors().contains(Field::SowingDate));

        w.set_field(FieldUpdate::FarmName(String::new()));
        let t = w.previous();
        assert!(t.resets_scroll());
        assert_eq!(w.step(), WizardStep::FarmDetails);
        assert!(w.errors().contains(Field::SowingDate));
        assert_eq!(w.previous(), Transition::Stayed(WizardStep::FarmDetails));
    }

    #[test]
    fn navigating_back_keeps_fields() {
        let (mut w, _, _) = wizard(false);
        walk_to_review(&mut w);
        w.previous();
        w.previous();
        w.previous();
        let draft = w.draft();
        assert_eq!(draft.farm_name, "Green Valley Farm");
        assert_eq!(draft.sowing_date, "2025-06-15");
    }

    #[test]
    fn later_fields_can_be_set_early() {
        let (mut w, _, _) = wizard(false);
        w.set_field(FieldUpdate::SowingDate("2025-06-15".into()));
        fill_step_one(&mut w);
        w.next();
        assert!(w.next().resets_scroll());
        assert_eq!(w.step(), WizardStep::Preferences);
    }

    #[test]
    fn next_on_review_stays() {
        let (mut w, _, _) = wizard(false);
        walk_to_review(&mut w);
        assert_eq!(w.next(), Transition::Stayed(WizardStep::Review));
    }

    #[test]
    fn complete_outside_review_is_rejected() {
        let (mut w, session, nav) = wizard(false);
        assert_eq!(w.complete().unwrap_err(), WizardError::NotAtReview { step: 1 });
        assert_eq!(session.marks.load(Ordering::SeqCst), 0);
        assert!(nav.routes.lock().unwrap().is_empty());
    }

    #[test]
    fn demo_completion_skips_flag() {
        let (mut w, session, nav) = wizard(true);
        walk_to_review(&mut w);
        let done = w.complete().unwrap();
        assert!(!done.marked_complete);
        assert_eq!(session.marks.load(Ordering::SeqCst), 0);
        assert_eq!(*nav.routes.lock().unwrap(), vec![Route::Dashboard]);
    }

    #[test]
    fn completion_marks_once_and_navigates() {
        let (mut w, session, nav) = wizard(false);
        walk_to_review(&mut w);
        let done = w.complete().unwrap();
        assert!(done.marked_complete);
        assert_eq!(done.route, Route::Dashboard);
        assert_eq!(done.draft.farm_name, "Green Valley Farm");
        assert_eq!(session.marks.load(Ordering::SeqCst), 1);
        assert_eq!(*nav.routes.lock().unwrap(), vec![Route::Dashboard]);

        assert_eq!(w.complete().unwrap_err(), WizardError::AlreadyCompleted);
        assert_eq!(session.marks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn single_flight_location() {
        let (mut w, _, _) = wizard(false);
        let ticket = w.begin_locate().unwrap();
        assert!(w.is_locating());
        assert!(w.begin_locate().is_none());

        let coords = Coordinates {
            latitude: 18.5515,
            longitude: 73.9348,
        };
        assert!(w.apply_location(ticket, AcquireOutcome::Located(coords)));
        assert!(!w.is_locating());
        assert_eq!(w.draft().coordinates(), Some((18.5515, 73.9348)));
        assert!(!w.shows_location_hint());
    }

    #[test]
    fn denied_location_does_not_block() {
        let (mut w, _, _) = wizard(false);
        let ticket = w.begin_locate().unwrap();
        assert!(w.apply_location(ticket, AcquireOutcome::Failed(GeoError::PermissionDenied)));
        assert_eq!(w.location_message(), Some(PERMISSION_MESSAGE));
        assert!(w.draft().coordinates().is_none());

        fill_step_one(&mut w);
        assert!(w.next().resets_scroll());
        assert_eq!(w.location_message(), Some(PERMISSION_MESSAGE));
    }

    #[test]
    fn result_after_unmount_is_discarded() {
        let (mut w, _, _) = wizard(false);
        let ticket = w.begin_locate().unwrap();
        w.unmount();
        assert!(ticket.token().is_cancelled());
        let coords = Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        };
        assert!(!w.apply_location(ticket, AcquireOutcome::Located(coords)));
        assert!(w.draft().coordinates().is_none());
        assert!(w.begin_locate().is_none());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let (mut w, _, _) = wizard(false);
        let first = w.begin_locate().unwrap();
        w.cancel_locate();
        assert!(first.token().is_cancelled());
        let second = w.begin_locate().unwrap();
        assert!(!w.apply_location(first, AcquireOutcome::Failed(GeoError::Timeout)));
        assert!(w.location_message().is_none());
        assert!(w.is_locating());
        assert!(w.apply_location(second, AcquireOutcome::Failed(GeoError::Timeout)));
    }

    #[test]
    fn location_hint_respects_dismissal() {
        let (mut w, _, _) = wizard(false);
        assert!(w.shows_location_hint());
        w.dismiss_location_hint();
        assert!(!w.shows_location_hint());
        assert!(w.config().preferences.is_dismissed(banners::LOCATION_HINT));
    }
}
