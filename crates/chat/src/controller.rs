use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use medassist_ask::{AskOutcome, AskService};
use snafu::ResultExt;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::error::{ChatResult, MissingRuntimeSnafu};
use crate::events::{ExchangeFailure, FailureCause, IgnoreReason, SubmitOutcome};
use crate::ids::MessageId;
use crate::message::{Message, MessagePatch};
use crate::scroll::{ScrollCoordinator, ScrollRevision, ScrollSignal};
use crate::state::{SessionState, SessionTransition};
use crate::transcript::Transcript;

/// Drives the single-flight submission cycle of one conversation.
///
/// `submit` performs the transcript mutations synchronously and hands the network call to the
/// runtime; the placeholder is resolved in place whenever that call settles. The controller is the
/// only writer of its transcript; everything else reads snapshots.
pub struct SessionController {
    shared: Arc<Shared>,
    runtime: Handle,
}

struct Shared {
    service: Arc<dyn AskService>,
    user_id: u64,
    session: Mutex<Session>,
    signals: watch::Sender<ScrollSignal>,
}

#[derive(Default)]
struct Session {
    transcript: Transcript,
    state: SessionState,
    scroll: ScrollCoordinator,
    failures: Vec<ExchangeFailure>,
}

impl SessionController {
    /// Must be called from within a Tokio runtime; exchanges are spawned onto it.
    pub fn new(service: Arc<dyn AskService>, user_id: u64) -> ChatResult<Self> {
        let runtime = Handle::try_current().context(MissingRuntimeSnafu {
            stage: "session-controller-new",
        })?;

        let (signals, _) = watch::channel(ScrollSignal::default());
        let shared = Arc::new(Shared {
            service,
            user_id,
            session: Mutex::new(Session::default()),
            signals,
        });
        shared.publish(&mut shared.lock());

        Ok(Self { shared, runtime })
    }

    /// Seeds an empty transcript with a final assistant welcome message.
    pub fn with_greeting(self, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        if greeting.trim().is_empty() {
            return self;
        }

        {
            let mut session = self.shared.lock();
            if session.transcript.is_empty() {
                session
                    .transcript
                    .append(Message::assistant_greeting(greeting));
                self.shared.publish(&mut session);
            }
        }
        self
    }

    /// Starts an exchange for `text` unless it is blank or one is already in flight.
    pub fn submit(&self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            tracing::debug!("ignoring blank submission");
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        let (user_message_id, placeholder_id) = {
            let mut session = self.shared.lock();
            let user_message = Message::user(question);
            let placeholder = Message::assistant_placeholder();
            let placeholder_id = placeholder.id;

            let next_state = match session
                .state
                .apply(SessionTransition::Submit { placeholder_id })
            {
                Ok(next_state) => next_state,
                Err(rejection) => {
                    tracing::debug!(?rejection, "exchange in flight; dropping submission");
                    return SubmitOutcome::Ignored(IgnoreReason::Busy);
                }
            };

            let user_message_id = session.transcript.append(user_message);
            session.transcript.append(placeholder);
            session.state = next_state;
            self.shared.publish(&mut session);
            (user_message_id, placeholder_id)
        };

        tracing::debug!(
            %placeholder_id,
            question_len = question.len(),
            "submission accepted"
        );
        self.runtime.spawn(Shared::run_exchange(
            Arc::clone(&self.shared),
            placeholder_id,
            question.to_string(),
        ));

        SubmitOutcome::Accepted {
            user_message_id,
            placeholder_id,
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Message>> {
        self.shared.lock().transcript.snapshot()
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    pub fn user_id(&self) -> u64 {
        self.shared.user_id
    }

    pub fn revision(&self) -> ScrollRevision {
        self.shared.signals.borrow().revision
    }

    /// Receives a new [`ScrollSignal`] whenever the transcript grows or the pending flag flips.
    pub fn subscribe(&self) -> watch::Receiver<ScrollSignal> {
        self.shared.signals.subscribe()
    }

    /// Diagnostic reasons of failed or abandoned exchanges, oldest first.
    pub fn failures(&self) -> Vec<ExchangeFailure> {
        self.shared.lock().failures.clone()
    }

    /// Waits until no exchange is in flight.
    pub async fn settled(&self) {
        let mut signals = self.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = signals.wait_for(|signal| !signal.pending).await;
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        // Every critical section leaves the session consistent, so a poisoned guard is usable.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &mut Session) {
        let transcript_len = session.transcript.len();
        let pending = session.state.is_pending();
        if session.scroll.observe(transcript_len, pending).is_some() {
            self.signals
                .send_replace(session.scroll.signal(transcript_len, pending));
        }
    }

    async fn run_exchange(self: Arc<Self>, placeholder_id: MessageId, question: String) {
        let outcome = self.service.ask(self.user_id, question).await;
        self.settle(placeholder_id, outcome);
    }

    fn settle(&self, placeholder_id: MessageId, outcome: AskOutcome) {
        let mut session = self.lock();
        let next_state = match session
            .state
            .apply(SessionTransition::Settle { placeholder_id })
        {
            Ok(next_state) => next_state,
            Err(rejection) => {
                tracing::error!(
                    %placeholder_id,
                    ?rejection,
                    "settlement does not match the active exchange; ignoring it"
                );
                return;
            }
        };

        let (patch, cause) = match outcome {
            AskOutcome::Success(answer) => (MessagePatch::answered(answer), None),
            AskOutcome::Failure(reason) => {
                tracing::warn!(
                    %placeholder_id,
                    reason = %reason,
                    "ask exchange failed; showing fallback notice"
                );
                (MessagePatch::failed(), Some(FailureCause::Service(reason)))
            }
        };

        let cause = match session.transcript.replace(placeholder_id, patch) {
            Ok(message) => {
                tracing::info!(%placeholder_id, status = ?message.status, "exchange resolved");
                cause
            }
            Err(error) => {
                tracing::error!(
                    %placeholder_id,
                    error = %error,
                    "placeholder missing from transcript; abandoning exchange"
                );
                Some(FailureCause::Desynchronized {
                    details: error.to_string(),
                })
            }
        };

        if let Some(cause) = cause {
            session.failures.push(ExchangeFailure {
                placeholder_id,
                cause,
            });
        }

        session.state = next_state;
        self.publish(&mut session);
    }
}
