#![deny(unsafe_code)]

//! Conversational symptom-assessment session.
//!
//! [`SessionController`] owns an append-only [`Transcript`] and runs one exchange at a time
//! against an [`medassist_ask::AskService`], resolving each assistant placeholder in place.
pub mod controller;
/// Submission outcomes and exchange diagnostics.
pub mod events;
pub mod ids;
/// Transcript entries and the patches that resolve placeholders.
pub mod message;
pub mod scroll;
/// Exchange lifecycle state machine.
pub mod state;
pub mod transcript;

mod error;

pub use controller::SessionController;
pub use error::{ChatError, ChatResult};
pub use events::{ExchangeFailure, FailureCause, IgnoreReason, SubmitOutcome};
pub use ids::MessageId;
pub use message::{
    DEFAULT_GREETING, FAILURE_FALLBACK_BODY, Message, MessagePatch, MessageStatus, PENDING_MARKER,
    Role,
};
pub use scroll::{ScrollCoordinator, ScrollRevision, ScrollSignal};
pub use state::{SessionState, SessionTransition, TransitionRejection, TransitionResult};
pub use transcript::Transcript;
