use chrono::{DateTime, Utc};
use medassist_ask::{AskAnswer, PlanItem};

use crate::ids::MessageId;

/// Reserved body of an unresolved placeholder. Never authoritative content; check `status`.
pub const PENDING_MARKER: &str = "Typing…";

/// Body shown when an exchange fails, whatever the underlying cause.
pub const FAILURE_FALLBACK_BODY: &str =
    "Couldn't reach the advisory service. Please try again in a moment.";

pub const DEFAULT_GREETING: &str = "Hello! I'm your AI medical assistant. Please describe your \
symptoms and I'll help provide general guidance. Remember, this is not a substitute for \
professional medical advice.";

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

/// Governs whether `body`, `plan` and `disclaimer` are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Final,
    Pending,
    Failed,
}

/// One transcript entry. `id`, `role` and `created_at` are fixed at insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub plan: Vec<PlanItem>,
    pub disclaimer: Option<String>,
    pub status: MessageStatus,
}

impl Message {
    fn new(role: Role, body: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            id: MessageId::new_v7(),
            role,
            body: body.into(),
            created_at: Utc::now(),
            plan: Vec::new(),
            disclaimer: None,
            status,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text, MessageStatus::Final)
    }

    /// Assistant entry inserted on submission and resolved in place later.
    pub fn assistant_placeholder() -> Self {
        Self::new(Role::Assistant, PENDING_MARKER, MessageStatus::Pending)
    }

    pub fn assistant_greeting(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text, MessageStatus::Final)
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}

/// Replacement for the mutable part of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePatch {
    pub body: String,
    pub plan: Vec<PlanItem>,
    pub disclaimer: Option<String>,
    pub status: MessageStatus,
}

impl MessagePatch {
    pub fn answered(answer: AskAnswer) -> Self {
        Self {
            body: answer.answer_text,
            plan: answer.plan,
            disclaimer: answer.disclaimer,
            status: MessageStatus::Final,
        }
    }

    pub fn failed() -> Self {
        Self {
            body: FAILURE_FALLBACK_BODY.to_string(),
            plan: Vec::new(),
            disclaimer: None,
            status: MessageStatus::Failed,
        }
    }

    pub(crate) fn apply_to(self, message: &mut Message) {
        message.body = self.body;
        message.plan = self.plan;
        message.disclaimer = self.disclaimer;
        message.status = self.status;
    }
}
