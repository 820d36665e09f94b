use crate::ids::MessageId;

/// Exchange lifecycle of one session. At most one exchange is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Awaiting { placeholder_id: MessageId },
}

/// State transition input for the exchange lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Submit { placeholder_id: MessageId },
    Settle { placeholder_id: MessageId },
}

/// Rejection reason for illegal session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejection {
    AlreadyAwaiting {
        active: MessageId,
        attempted: MessageId,
    },
    NotAwaiting,
    PlaceholderMismatch {
        active: MessageId,
        attempted: MessageId,
    },
}

pub type TransitionResult = Result<SessionState, TransitionRejection>;

impl SessionState {
    /// Placeholder awaiting resolution, present if and only if the state is `Awaiting`.
    pub fn placeholder_id(&self) -> Option<MessageId> {
        match self {
            Self::Awaiting { placeholder_id } => Some(*placeholder_id),
            Self::Idle => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Awaiting { .. })
    }

    /// Applies one transition deterministically.
    ///
    /// `Submit` is only legal from `Idle`; `Settle` must name the active placeholder exactly.
    pub fn apply(&self, transition: SessionTransition) -> TransitionResult {
        match transition {
            SessionTransition::Submit { placeholder_id } => self.apply_submit(placeholder_id),
            SessionTransition::Settle { placeholder_id } => self.apply_settle(placeholder_id),
        }
    }

    fn apply_submit(&self, placeholder_id: MessageId) -> TransitionResult {
        match self {
            Self::Idle => Ok(Self::Awaiting { placeholder_id }),
            Self::Awaiting {
                placeholder_id: active,
            } => Err(TransitionRejection::AlreadyAwaiting {
                active: *active,
                attempted: placeholder_id,
            }),
        }
    }

    fn apply_settle(&self, placeholder_id: MessageId) -> TransitionResult {
        match self {
            Self::Awaiting {
                placeholder_id: active,
            } if *active == placeholder_id => Ok(Self::Idle),
            Self::Awaiting {
                placeholder_id: active,
            } => Err(TransitionRejection::PlaceholderMismatch {
                active: *active,
                attempted: placeholder_id,
            }),
            Self::Idle => Err(TransitionRejection::NotAwaiting),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_then_settle_round_trips_to_idle() {
        let placeholder_id = MessageId::new_v7();
        let awaiting = SessionState::Idle
            .apply(SessionTransition::Submit { placeholder_id })
            .expect("submit from idle");

        assert_eq!(awaiting.placeholder_id(), Some(placeholder_id));
        assert!(awaiting.is_pending());
        assert_eq!(
            awaiting.apply(SessionTransition::Settle { placeholder_id }),
            Ok(SessionState::Idle)
        );
    }

    #[test]
    fn second_submit_while_awaiting_is_rejected() {
        let active = MessageId::new_v7();
        let attempted = MessageId::new_v7();
        let awaiting = SessionState::Awaiting {
            placeholder_id: active,
        };

        assert_eq!(
            awaiting.apply(SessionTransition::Submit {
                placeholder_id: attempted
            }),
            Err(TransitionRejection::AlreadyAwaiting { active, attempted })
        );
    }

    #[test]
    fn settle_must_match_active_placeholder() {
        let active = MessageId::new_v7();
        let stale = MessageId::new_v7();
        let awaiting = SessionState::Awaiting {
            placeholder_id: active,
        };

        assert_eq!(
            awaiting.apply(SessionTransition::Settle {
                placeholder_id: stale
            }),
            Err(TransitionRejection::PlaceholderMismatch {
                active,
                attempted: stale
            })
        );
        assert_eq!(
            SessionState::Idle.apply(SessionTransition::Settle {
                placeholder_id: active
            }),
            Err(TransitionRejection::NotAwaiting)
        );
    }
}
