use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Title shown for plan items that arrive without one.
pub const DEFAULT_PLAN_ITEM_TITLE: &str = "Recommendation";

/// JSON body posted to `<base-url>/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub user_id: u64,
    pub question: String,
}

impl AskRequest {
    pub fn new(user_id: u64, question: impl Into<String>) -> Self {
        Self {
            user_id,
            question: question.into(),
        }
    }
}

/// Deployed backends echo the caller either as an integer or as a string uid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResponseUserId {
    Numeric(u64),
    Text(String),
}

/// Raw success body returned by the ask service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub user_id: Option<ResponseUserId>,
    pub answer_text: String,
    #[serde(default)]
    pub disclaimer: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub plan: Vec<PlanItem>,
}

/// One recommendation of an answer's plan. Every field is optional; partial items are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanItem {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub rationale: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cautions: Vec<String>,
}

impl PlanItem {
    pub fn new(
        title: Option<&str>,
        instructions: Option<&str>,
        rationale: Option<&str>,
    ) -> Self {
        Self {
            title: title.map(str::to_string),
            instructions: instructions.map(str::to_string),
            rationale: rationale.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_PLAN_ITEM_TITLE)
    }
}

/// Successful answer after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskAnswer {
    pub answer_text: String,
    pub disclaimer: Option<String>,
    pub plan: Vec<PlanItem>,
}

impl AskAnswer {
    pub fn new(answer_text: impl Into<String>) -> Self {
        Self {
            answer_text: answer_text.into(),
            disclaimer: None,
            plan: Vec::new(),
        }
    }

    pub fn with_disclaimer(mut self, disclaimer: impl Into<String>) -> Self {
        self.disclaimer = Some(disclaimer.into());
        self
    }

    pub fn with_plan(mut self, plan: Vec<PlanItem>) -> Self {
        self.plan = plan;
        self
    }
}

impl From<AskResponse> for AskAnswer {
    fn from(response: AskResponse) -> Self {
        let disclaimer = response
            .disclaimer
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Self {
            answer_text: response.answer_text,
            disclaimer,
            plan: response.plan,
        }
    }
}

/// Why an exchange did not produce an answer. Diagnostic only, never user-facing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Transport { details: String },
    Timeout,
    Status { status: u16, body: String },
    Malformed { details: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { details } => write!(formatter, "transport failure: {details}"),
            Self::Timeout => write!(formatter, "request timed out"),
            Self::Status { status, body } => write!(formatter, "status {status}: {body}"),
            Self::Malformed { details } => write!(formatter, "malformed response: {details}"),
        }
    }
}

/// Classified result of one ask exchange; transport faults never escape as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Success(AskAnswer),
    Failure(FailureReason),
}

impl AskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_backend_field_names() {
        let body = serde_json::to_value(AskRequest::new(1, "I have a headache"))
            .expect("request should serialize");

        assert_eq!(
            body,
            serde_json::json!({ "user_id": 1, "question": "I have a headache" })
        );
    }

    #[test]
    fn response_accepts_string_user_id_and_missing_plan() {
        let response: AskResponse = serde_json::from_str(
            r#"{"user_id":"dev-user-1","answer_text":"Rest.","disclaimer":"Educational use only."}"#,
        )
        .expect("lenient body should parse");

        assert_eq!(
            response.user_id,
            Some(ResponseUserId::Text("dev-user-1".to_string()))
        );
        assert!(response.plan.is_empty());
    }

    #[test]
    fn partial_plan_items_and_null_plan_parse() {
        let response: AskResponse = serde_json::from_str(
            r#"{
                "user_id": 1,
                "answer_text": "Try ginger tea.",
                "disclaimer": "",
                "plan": [
                    {"title": "Ginger tea", "category": "herb", "cautions": null},
                    {"rationale": "Keeps you hydrated"}
                ]
            }"#,
        )
        .expect("partial plan should parse");
        let answer = AskAnswer::from(response);

        assert_eq!(answer.disclaimer, None);
        assert_eq!(answer.plan.len(), 2);
        assert_eq!(answer.plan[0].display_title(), "Ginger tea");
        assert_eq!(answer.plan[0].category.as_deref(), Some("herb"));
        assert!(answer.plan[0].cautions.is_empty());
        assert_eq!(answer.plan[1].display_title(), DEFAULT_PLAN_ITEM_TITLE);

        let null_plan: AskResponse =
            serde_json::from_str(r#"{"answer_text":"ok","plan":null}"#).expect("null plan");
        assert!(null_plan.plan.is_empty());
    }

    #[test]
    fn response_without_answer_text_is_rejected() {
        let parsed = serde_json::from_str::<AskResponse>(r#"{"user_id":1,"plan":[]}"#);
        assert!(parsed.is_err());
    }
}
