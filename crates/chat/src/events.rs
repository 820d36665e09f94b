use medassist_ask::FailureReason;

use crate::ids::MessageId;

/// Result of a `submit` call. Ignored submissions leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        user_message_id: MessageId,
        placeholder_id: MessageId,
    },
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Text was empty after trimming.
    Empty,
    /// An exchange is already in flight; submissions are dropped, not queued.
    Busy,
}

/// Why an exchange ended without an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    Service(FailureReason),
    /// The placeholder could not be resolved; the exchange was abandoned.
    Desynchronized { details: String },
}

/// Diagnostic record of a failed exchange, kept out of the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeFailure {
    pub placeholder_id: MessageId,
    pub cause: FailureCause,
}
