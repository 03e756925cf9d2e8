use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, FragviewError>;

#[derive(Debug, Error)]
pub enum FragviewError {
    #[error("malformed encoded content: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("decoded bytes are not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error(
        "matched range {matched_start}..{matched_end} is inconsistent with line range {start}..{end}"
    )]
    InvalidRange {
        start: usize,
        end: usize,
        matched_start: usize,
        matched_end: usize,
    },

    #[error("fragment index {index} is out of range for {len} fragments")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("response generation {response} does not match session generation {current}")]
    StaleResponse { response: u64, current: u64 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl FragviewError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "DECODE_ERROR",
            Self::Encoding(_) => "ENCODING_ERROR",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            Self::StaleResponse { .. } => "STALE_RESPONSE",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Regex(_) => "REGEX_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Http(_) => "HTTP_ERROR",
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            details: None,
        }
    }
}
