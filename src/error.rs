use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Errors raised while relaying a request to the external services.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("POST {url} failed: {body}")]
    Upstream { url: String, body: String },

    #[error("{context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Validation(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn upstream(url: impl Into<String>, body: impl Into<String>) -> Self {
        GatewayError::Upstream {
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Level for the error log line: `warn` for validation, `error` otherwise.
    pub fn log_level(&self) -> log::Level {
        match self {
            GatewayError::Validation(_) => log::Level::Warn,
            _ => log::Level::Error,
        }
    }

    /// Labels the error with the handler stage that failed.
    pub fn at(self, stage: &'static str) -> ApiError {
        ApiError { stage, inner: self }
    }
}

/// A [`GatewayError`] as returned to the inbound caller.
///
/// Validation errors are reported verbatim; every other error is prefixed with
/// the stage label, e.g. `Planning failed: configuration error: ...`.
#[derive(Debug)]
pub struct ApiError {
    stage: &'static str,
    inner: GatewayError,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            GatewayError::Validation(msg) => f.write_str(msg),
            other => write!(f, "{}: {}", self.stage, other),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.inner.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        log::log!(self.inner.log_level(), "{}", self);
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

pub trait StageExt<T> {
    fn stage(self, stage: &'static str) -> Result<T, ApiError>;
}

impl<T> StageExt<T> for GatewayResult<T> {
    fn stage(self, stage: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| e.at(stage))
    }
}
