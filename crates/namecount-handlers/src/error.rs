use namecount_queue::QueueError;
use namecount_store::StoreError;

/// Core error classification for greet and drain handling
#[derive(Debug, Clone)]
pub enum HandlerError {
    // 400-level: Client errors
    InvalidName {
        reason: String,
    },
    NotFound,
    MethodNotAllowed,

    // 500-level: Server errors
    QueueFailed {
        message: String,
    },
    StoreUnavailable {
        message: String,
    },
    CorruptDocument {
        message: String,
    },
}

impl HandlerError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidName { .. } => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::QueueFailed { .. } => 502,
            Self::StoreUnavailable { .. } => 502,
            Self::CorruptDocument { .. } => 500,
        }
    }

    /// Error type string for responses
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => "InvalidName",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::QueueFailed { .. } => "QueueFailed",
            Self::StoreUnavailable { .. } => "StoreUnavailable",
            Self::CorruptDocument { .. } => "CorruptDocument",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            Self::InvalidName { reason } => format!("Invalid name: {}", reason),
            Self::NotFound => "not found".to_string(),
            Self::MethodNotAllowed => "method not allowed".to_string(),
            Self::QueueFailed { message } => format!("Failed to queue name: {}", message),
            Self::StoreUnavailable { message } => {
                format!("Counter storage unavailable: {}", message)
            }
            Self::CorruptDocument { message } => {
                format!("Counter document is corrupt: {}", message)
            }
        }
    }
}

impl From<QueueError> for HandlerError {
    fn from(err: QueueError) -> Self {
        Self::QueueFailed {
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CorruptDocument { .. } => Self::CorruptDocument {
                message: err.to_string(),
            },
            _ => Self::StoreUnavailable {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = HandlerError::InvalidName {
            reason: "empty".into(),
        };
        assert_eq!(err.status_code(), 400);

        assert_eq!(HandlerError::NotFound.status_code(), 404);
        assert_eq!(HandlerError::MethodNotAllowed.status_code(), 405);

        let err = HandlerError::QueueFailed {
            message: "failed".into(),
        };
        assert_eq!(err.status_code(), 502);

        let err = HandlerError::StoreUnavailable {
            message: "failed".into(),
        };
        assert_eq!(err.status_code(), 502);

        let err = HandlerError::CorruptDocument {
            message: "failed".into(),
        };
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_error_types() {
        let err = HandlerError::InvalidName {
            reason: "empty".into(),
        };
        assert_eq!(err.error_type(), "InvalidName");

        let err = HandlerError::QueueFailed {
            message: "failed".into(),
        };
        assert_eq!(err.error_type(), "QueueFailed");
    }
}
