use std::fmt;
use std::str::FromStr;

use snafu::ResultExt;
use uuid::Uuid;

use crate::error::{ChatError, ChatResult, InvalidMessageIdSnafu};

/// Opaque transcript entry identifier; a placeholder keeps its id when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn parse(raw: &str) -> ChatResult<Self> {
        let parsed = Uuid::parse_str(raw).context(InvalidMessageIdSnafu {
            stage: "parse-message-id",
            raw: raw.to_string(),
        })?;
        Ok(Self(parsed))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<Uuid> for MessageId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for MessageId {
    type Err = ChatError;

    fn from_str(raw: &str) -> ChatResult<Self> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_parse_back() {
        let first = MessageId::new_v7();
        let second = MessageId::new_v7();

        assert_ne!(first, second);
        assert_eq!(first.to_string().parse::<MessageId>().ok(), Some(first));
        assert!(matches!(
            MessageId::parse("typing-1"),
            Err(ChatError::InvalidMessageId { .. })
        ));
    }
}
