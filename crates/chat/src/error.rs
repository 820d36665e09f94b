use snafu::Snafu;

use crate::ids::MessageId;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatError {
    #[snafu(display("message '{id}' was not found in the transcript on `{stage}`"))]
    MessageNotFound { stage: &'static str, id: MessageId },
    #[snafu(display("message id '{raw}' is invalid"))]
    InvalidMessageId {
        stage: &'static str,
        raw: String,
        source: uuid::Error,
    },
    #[snafu(display("session controller requires a tokio runtime on `{stage}`"))]
    MissingRuntime {
        stage: &'static str,
        source: tokio::runtime::TryCurrentError,
    },
}

pub type ChatResult<T> = Result<T, ChatError>;
