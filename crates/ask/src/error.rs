use snafu::Snafu;

use crate::wire::FailureReason;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AskError {
    #[snafu(display("failed to resolve ask service configuration on `{stage}`: {source}"))]
    Config {
        stage: &'static str,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
    #[snafu(display("ask service URL '{url}' is invalid: {details}"))]
    InvalidBaseUrl {
        stage: &'static str,
        url: String,
        details: String,
    },
    #[snafu(display("failed to build http client on `{stage}`: {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("ask request failed on `{stage}`: {source}"))]
    Transport {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("ask request timed out on `{stage}`"))]
    Timeout {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("ask service returned status {status}: {body}"))]
    Status {
        stage: &'static str,
        status: u16,
        body: String,
    },
    #[snafu(display("failed to read ask response body on `{stage}`: {source}"))]
    ReadBody {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("failed to decode ask response on `{stage}`: {source}"))]
    Decode {
        stage: &'static str,
        source: serde_json::Error,
    },
}

pub type ClientResult<T> = Result<T, AskError>;

impl AskError {
    /// Wraps a transport error, routing elapsed deadlines to `Timeout`.
    pub(crate) fn from_transport(stage: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { stage, source }
        } else if source.is_body() || source.is_decode() {
            Self::ReadBody { stage, source }
        } else {
            Self::Transport { stage, source }
        }
    }

    /// Collapses the error into the classification handed to the session layer.
    pub fn into_failure_reason(self) -> FailureReason {
        match self {
            Self::Timeout { .. } => FailureReason::Timeout,
            Self::Status { status, body, .. } => FailureReason::Status { status, body },
            Self::Decode { source, .. } => FailureReason::Malformed {
                details: source.to_string(),
            },
            other @ (Self::Config { .. }
            | Self::InvalidBaseUrl { .. }
            | Self::BuildClient { .. }
            | Self::Transport { .. }
            | Self::ReadBody { .. }) => FailureReason::Transport {
                details: other.to_string(),
            },
        }
    }
}
