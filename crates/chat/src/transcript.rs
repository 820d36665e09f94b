use std::sync::Arc;

use snafu::OptionExt;

use crate::error::{ChatResult, MessageNotFoundSnafu};
use crate::ids::MessageId;
use crate::message::{Message, MessagePatch};

/// Ordered, append-only message log. Insertion order is display order.
///
/// Entries are never removed or reordered. Snapshots share storage with the transcript until the
/// next mutation, which copies on write, so a held snapshot keeps its point-in-time contents.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Arc<Vec<Message>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) -> MessageId {
        let id = message.id;
        Arc::make_mut(&mut self.messages).push(message);
        id
    }

    /// Applies `patch` in place, keeping position, role and creation time.
    pub fn replace(&mut self, id: MessageId, patch: MessagePatch) -> ChatResult<&Message> {
        // Placeholders live near the tail, so search from the back.
        let index = self
            .messages
            .iter()
            .rposition(|message| message.id == id)
            .context(MessageNotFoundSnafu {
                stage: "replace-message",
                id,
            })?;

        let message = &mut Arc::make_mut(&mut self.messages)[index];
        patch.apply_to(message);
        Ok(message)
    }

    pub fn snapshot(&self) -> Arc<Vec<Message>> {
        Arc::clone(&self.messages)
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use medassist_ask::{AskAnswer, PlanItem};

    use super::*;
    use crate::error::ChatError;
    use crate::message::{MessageStatus, PENDING_MARKER, Role};

    #[test]
    fn replace_resolves_placeholder_in_place() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("I have a headache"));
        let placeholder_id = transcript.append(Message::assistant_placeholder());
        let before = transcript
            .get(placeholder_id)
            .cloned()
            .expect("placeholder should exist");
        assert_eq!(before.body, PENDING_MARKER);

        let answer = AskAnswer::new("Rest and hydrate.")
            .with_disclaimer("Not medical advice.")
            .with_plan(vec![PlanItem::new(Some("Water"), None, None)]);
        let resolved = transcript
            .replace(placeholder_id, MessagePatch::answered(answer))
            .expect("replace should succeed")
            .clone();

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.snapshot()[1].id, placeholder_id);
        assert_eq!(resolved.role, Role::Assistant);
        assert_eq!(resolved.created_at, before.created_at);
        assert_eq!(resolved.status, MessageStatus::Final);
        assert_eq!(resolved.body, "Rest and hydrate.");
        assert_eq!(resolved.disclaimer.as_deref(), Some("Not medical advice."));
        assert_eq!(resolved.plan.len(), 1);
    }

    #[test]
    fn replace_unknown_id_fails_without_mutation() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("hello"));
        let before = transcript.snapshot();

        let result = transcript.replace(MessageId::new_v7(), MessagePatch::failed());

        assert!(matches!(result, Err(ChatError::MessageNotFound { .. })));
        assert_eq!(*transcript.snapshot(), *before);
    }

    #[test]
    fn snapshot_keeps_point_in_time_contents() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("first"));
        let placeholder_id = transcript.append(Message::assistant_placeholder());
        let snapshot = transcript.snapshot();

        transcript.append(Message::user("second"));
        transcript
            .replace(placeholder_id, MessagePatch::failed())
            .expect("replace should succeed");

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[1].is_pending());
        assert_eq!(transcript.len(), 3);
        assert_eq!(
            transcript.get(placeholder_id).map(|message| message.status),
            Some(MessageStatus::Failed)
        );
    }

    #[test]
    fn order_is_preserved_across_mixed_operations() {
        let mut transcript = Transcript::new();
        let mut expected = Vec::new();
        for turn in 0..25 {
            expected.push(transcript.append(Message::user(format!("question {turn}"))));
            let placeholder_id = transcript.append(Message::assistant_placeholder());
            expected.push(placeholder_id);
            let patch = if turn % 3 == 0 {
                MessagePatch::failed()
            } else {
                MessagePatch::answered(AskAnswer::new(format!("answer {turn}")))
            };
            transcript
                .replace(placeholder_id, patch)
                .expect("replace should succeed");
            assert_eq!(transcript.len(), expected.len());
        }

        let ids = transcript
            .snapshot()
            .iter()
            .map(|message| message.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, expected);
    }
}
