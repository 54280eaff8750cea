use status_core::StatusError;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("Failed to parse status report: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unrecognized resource type: {0}")]
    UnknownType(String),

    #[error(transparent)]
    Status(#[from] StatusError),
}

impl HookError {
    pub fn code(&self) -> &'static str {
        match self {
            HookError::Stdin(_) => "stdin_error",
            HookError::Parse(_) => "invalid_report",
            HookError::Encode(_) => "encode_error",
            HookError::UnknownType(_) => "unknown_type",
            HookError::Status(err) => err.code(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            HookError::Parse(_) | HookError::UnknownType(_) => 400,
            HookError::Stdin(_) | HookError::Encode(_) => 500,
            HookError::Status(err) => err.http_status(),
        }
    }
}
