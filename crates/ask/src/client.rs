use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Url;
use snafu::ResultExt;

use crate::config::AskConfig;
use crate::error::{AskError, BuildClientSnafu, ClientResult, DecodeSnafu, StatusSnafu};
use crate::wire::{AskAnswer, AskOutcome, AskRequest, AskResponse};

/// Boundary to the remote advisory backend.
///
/// Implementations must classify every fault into [`AskOutcome::Failure`]; the returned future
/// always resolves exactly once.
pub trait AskService: Send + Sync {
    fn ask(&self, user_id: u64, question: String) -> BoxFuture<'_, AskOutcome>;
}

/// Stateless HTTP client for `POST <base-url>/ask`.
#[derive(Debug, Clone)]
pub struct AskServiceClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl AskServiceClient {
    pub fn new(config: &AskConfig) -> ClientResult<Self> {
        let raw_endpoint = config.endpoint();
        let endpoint = Url::parse(&raw_endpoint).map_err(|source| AskError::InvalidBaseUrl {
            stage: "parse-ask-endpoint",
            url: raw_endpoint.clone(),
            details: source.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .build()
            .context(BuildClientSnafu {
                stage: "build-http-client",
            })?;

        Ok(Self {
            http,
            endpoint,
            timeout: config.request_timeout(),
        })
    }

    pub fn from_global() -> ClientResult<Self> {
        Self::new(AskConfig::global())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Runs one exchange and folds any fault into a classified failure.
    pub async fn ask_question(&self, user_id: u64, question: String) -> AskOutcome {
        let request = AskRequest::new(user_id, question);
        tracing::debug!(
            endpoint = %self.endpoint,
            user_id,
            question_len = request.question.len(),
            "dispatching ask request"
        );

        match self.exchange(&request).await {
            Ok(answer) => {
                tracing::debug!(
                    endpoint = %self.endpoint,
                    plan_items = answer.plan.len(),
                    "ask request answered"
                );
                AskOutcome::Success(answer)
            }
            Err(error) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %error,
                    "ask request failed"
                );
                AskOutcome::Failure(error.into_failure_reason())
            }
        }
    }

    async fn exchange(&self, request: &AskRequest) -> ClientResult<AskAnswer> {
        let mut builder = self.http.post(self.endpoint.clone()).json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| AskError::from_transport("send-ask-request", source))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AskError::from_transport("read-ask-response", source))?;

        if !status.is_success() {
            return StatusSnafu {
                stage: "ask-http-status",
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        let parsed = serde_json::from_str::<AskResponse>(&body).context(DecodeSnafu {
            stage: "decode-ask-response",
        })?;
        Ok(parsed.into())
    }
}

impl AskService for AskServiceClient {
    fn ask(&self, user_id: u64, question: String) -> BoxFuture<'_, AskOutcome> {
        self.ask_question(user_id, question).boxed()
    }
}
