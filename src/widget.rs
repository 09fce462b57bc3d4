use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::is_valid_email;
use crate::domain::WaitlistEmail;
use crate::domain::WaitlistEntry;
use crate::locale::Locale;
use crate::locale::LocaleCopy;
use crate::notification::DismissTimer;
use crate::notification::Feedback;
use crate::notification::FeedbackKind;
use crate::notification::COPIED_TTL;
use crate::notification::NOTIFICATION_TTL;
use crate::share::Clipboard;
use crate::waitlist_client::SubmitError;
use crate::waitlist_client::WaitlistClient;

/// Which form on the page a widget backs. Only used to tell them apart in
/// logs and in the shell; the two never share anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Top,
    Bottom,
}

impl Display for Slot {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Slot::Top => "top",
                Slot::Bottom => "bottom",
            }
        )
    }
}

// idle -> (validate, same tick) -> submitting -> success | error -> idle
//
// success/error fall back to idle when their notification expires. a failed
// validation never leaves idle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Everything a page needs to draw one form. Lives only as long as the widget.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionState {
    pub email: String,
    pub privacy_consent: bool,
    pub phase: Phase,
    pub feedback: Feedback,
    pub share_visible: bool,
    /// "Copied!" state of the share button
    pub share_copied: bool,
    /// Cosmetic "N+ players already joined" counter. Not synced with anything.
    pub signup_count: u64,
    // bumped on every notification / copy, so that a dismissal scheduled for an
    // older one can tell it has been superseded
    feedback_generation: u64,
    copied_generation: u64,
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool { self.phase == Phase::Submitting }
}

/// What `submit` ended up doing. The user-visible side of each outcome is
/// already in the state by the time this is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission from this widget was already in flight; nothing was sent
    AlreadySubmitting,
    InvalidEmail,
    ConsentMissing,
    Accepted,
    /// The collector answered with a non-2xx
    Rejected,
    /// Collector unreachable, timed out, or not configured
    NetworkError,
}

#[derive(Clone, Debug)]
pub struct WidgetOptions {
    pub locale: Locale,
    /// Gate submission on the privacy checkbox
    pub require_privacy_consent: bool,
    /// Reveal the share button after a successful sign-up
    pub share_affordance: bool,
    /// What the share button copies
    pub share_url: String,
    pub initial_signup_count: u64,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            require_privacy_consent: false,
            share_affordance: false,
            share_url: String::new(),
            initial_signup_count: 500,
        }
    }
}

/// Whether the submit button is clickable. The only state that disables it on
/// its own is an in-flight submission.
pub fn submit_enabled(
    email_valid: bool,
    consent_ok: bool,
    submitting: bool,
) -> bool {
    email_valid && consent_ok && !submitting
}

/// One email form: input, validation, submission and its feedback.
///
/// All methods take `&self`; share it with `Arc` if more than one task needs
/// it (e.g. to keep typing while a submission is in flight). Must be used from
/// within a tokio runtime, since notifications schedule their own dismissal.
pub struct WaitlistWidget {
    slot: Slot,
    options: WidgetOptions,
    client: WaitlistClient,
    state: Arc<watch::Sender<SubmissionState>>,
    notification_timer: DismissTimer,
    copied_timer: DismissTimer,
}

/// Puts the widget back to idle if a submission ends without settling,
/// including when the `submit` future is dropped mid-request
struct SubmittingGuard<'a> {
    state: &'a watch::Sender<SubmissionState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let stuck = s.is_submitting();
            if stuck {
                s.phase = Phase::Idle;
            }
            stuck
        });
    }
}

impl WaitlistWidget {
    pub fn new(
        slot: Slot,
        client: WaitlistClient,
        options: WidgetOptions,
    ) -> Self {
        let initial = SubmissionState {
            signup_count: options.initial_signup_count,
            ..Default::default()
        };
        let (state, _) = watch::channel(initial);
        Self {
            slot,
            options,
            client,
            state: Arc::new(state),
            notification_timer: DismissTimer::default(),
            copied_timer: DismissTimer::default(),
        }
    }

    pub fn slot(&self) -> Slot { self.slot }

    pub fn options(&self) -> &WidgetOptions { &self.options }

    fn copy(&self) -> &'static LocaleCopy { self.options.locale.copy() }

    pub fn snapshot(&self) -> SubmissionState { self.state.borrow().clone() }

    /// Notified on every state change, including the timed dismissals
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> { self.state.subscribe() }

    /// Keystroke handler. Never shows a validation error; that only happens on
    /// submit.
    pub fn set_email(
        &self,
        candidate: impl Into<String>,
    ) {
        let candidate = candidate.into();
        self.state.send_if_modified(|s| {
            let changed = s.email != candidate;
            s.email = candidate;
            changed
        });
    }

    pub fn set_privacy_consent(
        &self,
        agreed: bool,
    ) {
        self.state.send_if_modified(|s| {
            let changed = s.privacy_consent != agreed;
            s.privacy_consent = agreed;
            changed
        });
    }

    pub fn is_submit_enabled(&self) -> bool {
        let s = self.state.borrow();
        submit_enabled(
            is_valid_email(&s.email),
            s.privacy_consent || !self.options.require_privacy_consent,
            s.is_submitting(),
        )
    }

    pub fn submit_label(&self) -> &'static str {
        match self.state.borrow().is_submitting() {
            true => self.copy().submit_busy,
            false => self.copy().submit_idle,
        }
    }

    pub fn share_label(&self) -> &'static str {
        match self.state.borrow().share_copied {
            true => self.copy().share_copied,
            false => self.copy().share_idle,
        }
    }

    /// Show `text` under the form, replacing whatever was there, and clear it
    /// after `NOTIFICATION_TTL`. An older pending dismissal is cancelled so it
    /// can't wipe this message early.
    pub fn show_notification(
        &self,
        text: impl Into<String>,
        kind: FeedbackKind,
    ) {
        self.settle(|_| {}, Feedback::new(text, kind));
    }

    /// Apply `transition` and show `feedback` as a single state change, then
    /// schedule the dismissal
    fn settle(
        &self,
        transition: impl FnOnce(&mut SubmissionState),
        feedback: Feedback,
    ) {
        let mut generation = 0;
        self.state.send_modify(|s| {
            transition(s);
            s.feedback = feedback;
            s.feedback_generation += 1;
            generation = s.feedback_generation;
        });

        let state = Arc::clone(&self.state);
        self.notification_timer.schedule(NOTIFICATION_TTL, move || {
            state.send_if_modified(|s| {
                if s.feedback_generation != generation {
                    return false;
                }
                s.feedback = Feedback::default();
                if matches!(s.phase, Phase::Success | Phase::Error) {
                    s.phase = Phase::Idle;
                }
                true
            });
        });
    }

    /// Check the form and, if it's good, flip to `Submitting` in the same state
    /// change, so two callers can't both get past this point
    fn begin_submission(&self) -> Result<WaitlistEmail, SubmitOutcome> {
        let mut started = Err(SubmitOutcome::AlreadySubmitting);
        let require_consent = self.options.require_privacy_consent;
        self.state.send_if_modified(|s| {
            if s.is_submitting() {
                return false;
            }
            match WaitlistEmail::parse(s.email.clone()) {
                Err(_) => {
                    started = Err(SubmitOutcome::InvalidEmail);
                    false
                }
                Ok(_) if require_consent && !s.privacy_consent => {
                    started = Err(SubmitOutcome::ConsentMissing);
                    false
                }
                Ok(email) => {
                    s.phase = Phase::Submitting;
                    started = Ok(email);
                    true
                }
            }
        });
        started
    }

    /// Submit handler. Re-validates regardless of whether the button was
    /// enabled, and does nothing at all if this widget is already submitting.
    ///
    /// Input is cleared only on success; on any failure the user keeps what
    /// they typed so they can retry.
    #[tracing::instrument(
        name = "Submitting waitlist form",
        skip(self),
        fields(
            slot = %self.slot,
            locale = %self.options.locale,
            outcome = tracing::field::Empty,
        )
    )]
    pub async fn submit(&self) -> SubmitOutcome {
        let outcome = self.submit_inner().await;
        tracing::Span::current().record("outcome", tracing::field::debug(&outcome));
        outcome
    }

    async fn submit_inner(&self) -> SubmitOutcome {
        let copy = self.copy();
        let email = match self.begin_submission() {
            Ok(email) => email,
            Err(outcome) => {
                match outcome {
                    SubmitOutcome::InvalidEmail => {
                        self.show_notification(copy.invalid_email, FeedbackKind::Error)
                    }
                    SubmitOutcome::ConsentMissing => {
                        self.show_notification(copy.consent_missing, FeedbackKind::Error)
                    }
                    // the button is disabled while in flight; a click that gets
                    // through anyway is dropped silently
                    _ => tracing::debug!("submission already in flight, ignoring"),
                }
                return outcome;
            }
        };

        let _guard = SubmittingGuard { state: &*self.state };
        let entry = WaitlistEntry::new(email);

        match self.client.submit(&entry).await {
            Ok(()) => {
                tracing::info!("waitlist entry accepted");
                let share = self.options.share_affordance;
                self.settle(
                    |s| {
                        s.phase = Phase::Success;
                        s.email.clear();
                        s.privacy_consent = false;
                        s.share_visible |= share;
                        s.signup_count += 1;
                    },
                    Feedback::new(copy.success, FeedbackKind::Success),
                );
                SubmitOutcome::Accepted
            }
            Err(SubmitError::Rejected { message, .. }) => {
                let text = message.unwrap_or_else(|| copy.submit_failed.to_string());
                self.settle(
                    |s| s.phase = Phase::Error,
                    Feedback::new(text, FeedbackKind::Error),
                );
                SubmitOutcome::Rejected
            }
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "failed to submit waitlist entry"
                );
                self.settle(
                    |s| s.phase = Phase::Error,
                    Feedback::new(copy.network_error, FeedbackKind::Error),
                );
                SubmitOutcome::NetworkError
            }
        }
    }

    /// The demo placeholder on the page isn't wired to anything yet
    pub fn demo_click(&self) { self.show_notification(self.copy().demo_coming_soon, FeedbackKind::Info) }

    /// Copy the page link to `clipboard` and flip the share button to its
    /// "copied" state for `COPIED_TTL`. Only does anything once the share
    /// button has been revealed. A clipboard failure is logged and otherwise
    /// ignored; returns whether the link was copied.
    pub fn copy_share_link(
        &self,
        clipboard: &dyn Clipboard,
    ) -> bool {
        if !self.state.borrow().share_visible {
            tracing::debug!(slot = %self.slot, "share link requested before it was revealed");
            return false;
        }
        if let Err(e) = clipboard.set_text(&self.options.share_url) {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "failed to copy share link"
            );
            return false;
        }

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.share_copied = true;
            s.copied_generation += 1;
            generation = s.copied_generation;
        });
        let state = Arc::clone(&self.state);
        self.copied_timer.schedule(COPIED_TTL, move || {
            state.send_if_modified(|s| {
                let current = s.copied_generation == generation;
                if current {
                    s.share_copied = false;
                }
                current
            });
        });
        true
    }
}
