// Platform detection based on environment variables
//
// Auto-detects runtime environment:
// - AWS Lambda: AWS_LAMBDA_FUNCTION_NAME env var present
// - Server: not present (default)

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Server,
    Lambda,
}

impl Platform {
    /// Auto-detect the current platform based on environment variables
    pub fn detect() -> Self {
        if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
            Platform::Lambda
        } else {
            Platform::Server
        }
    }

    /// Get platform-specific defaults
    pub fn defaults(&self) -> PlatformDefaults {
        match self {
            Platform::Server => PlatformDefaults {
                store_backend: "fs",
                queue_backend: "memory",
            },
            Platform::Lambda => PlatformDefaults {
                store_backend: "s3",
                queue_backend: "sqs",
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformDefaults {
    pub store_backend: &'static str,
    pub queue_backend: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_differ_per_platform() {
        assert_eq!(Platform::Server.defaults().store_backend, "fs");
        assert_eq!(Platform::Server.defaults().queue_backend, "memory");
        assert_eq!(Platform::Lambda.defaults().store_backend, "s3");
        assert_eq!(Platform::Lambda.defaults().queue_backend, "sqs");
    }
}
