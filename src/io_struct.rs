use crate::error::GatewayError;
use serde::{Deserialize, Deserializer, Serialize};

/// Inbound bodies whose required fields must be present and non-empty.
pub trait Validate {
    fn validate(&self) -> Result<(), GatewayError>;
}

fn require(ok: bool, msg: &str) -> Result<(), GatewayError> {
    if ok {
        Ok(())
    } else {
        Err(GatewayError::Validation(msg.to_string()))
    }
}

/// Reads an explicit JSON `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct ViewReqInput {
    #[serde(default, rename = "image", deserialize_with = "null_as_default")]
    pub image_base64: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collection: String,
}

impl Validate for ViewReqInput {
    fn validate(&self) -> Result<(), GatewayError> {
        require(!self.image_base64.is_empty(), "Missing image")
    }
}

#[derive(Debug, Deserialize)]
pub struct ListenReqInput {
    #[serde(default, rename = "audio", deserialize_with = "null_as_default")]
    pub audio_base64: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collection: String,
}

impl Validate for ListenReqInput {
    fn validate(&self) -> Result<(), GatewayError> {
        require(!self.audio_base64.is_empty(), "Missing audio")
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadReqInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collection: String,
}

impl Validate for ReadReqInput {
    fn validate(&self) -> Result<(), GatewayError> {
        require(!self.text.is_empty(), "Missing text")
    }
}

/// Body shared by `/document`, `/think` and `/explain`.
#[derive(Debug, Deserialize)]
pub struct PromptReqInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collection: String,
}

pub const MISSING_PROMPT: &str = "Invalid JSON or missing 'prompt' field";

impl Validate for PromptReqInput {
    fn validate(&self) -> Result<(), GatewayError> {
        require(!self.prompt.is_empty(), MISSING_PROMPT)
    }
}

#[derive(Debug, Deserialize)]
pub struct RememberReqInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin: String,
    pub tags: Option<Vec<String>>,
    /// ISO 8601, forwarded untouched.
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collection: String,
}

impl Validate for RememberReqInput {
    fn validate(&self) -> Result<(), GatewayError> {
        require(
            !self.text.is_empty() && !self.subject.is_empty(),
            "Missing 'text' or 'subject'",
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct AskReqInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collection: String,
}

impl Validate for AskReqInput {
    fn validate(&self) -> Result<(), GatewayError> {
        require(!self.query.is_empty(), "Invalid JSON or missing 'query'")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub plan: String,
    pub documentation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}
