use crate::config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Core error type for the auto-mocking container
#[derive(Debug, Error)]
pub enum AutoMockError {
    #[error("No constructor found for type '{type_name}'")]
    NoConstructorFound { type_name: String },

    #[error("Mock verification failed with {} unmet expectation(s):\n{}", .failures.len(), render_failures(.failures))]
    VerificationFailed { failures: Vec<VerificationFailure> },

    /// Error returned by the constructor body itself, surfaced as-is
    #[error(transparent)]
    Invocation(Box<dyn std::error::Error + Send + Sync>),

    #[error("Argument {index} has type '{actual}' but '{expected}' was requested")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Argument {index} of type '{type_name}' is missing")]
    MissingArgument {
        index: usize,
        type_name: &'static str,
    },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl AutoMockError {
    /// Create a new no constructor found error
    pub fn no_constructor_found(type_name: impl Into<String>) -> Self {
        Self::NoConstructorFound {
            type_name: type_name.into(),
        }
    }

    /// Wrap an error raised inside a constructor body
    pub fn invocation<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Invocation(error.into())
    }

    /// Build a verification error, or `None` when there is nothing to report
    pub fn verification(failures: Vec<VerificationFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self::VerificationFailed { failures })
        }
    }

    /// Check if the error is a verification failure
    pub fn is_verification(&self) -> bool {
        matches!(self, Self::VerificationFailed { .. })
    }

    /// Check if the error is a missing constructor
    pub fn is_no_constructor(&self) -> bool {
        matches!(self, Self::NoConstructorFound { .. })
    }

    /// Check if the error came from the constructor body
    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation(_))
    }

    /// Unmet expectations carried by a verification failure
    pub fn failures(&self) -> &[VerificationFailure] {
        match self {
            Self::VerificationFailed { failures } => failures,
            _ => &[],
        }
    }
}

/// A mock whose expectations were not met at verification time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationFailure {
    /// Type name of the generated mock
    pub mock: &'static str,
    /// What the mock reported when its expectations were checked
    pub message: String,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.mock, self.message)
    }
}

fn render_failures(failures: &[VerificationFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("  - {}", failure))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AutoMockError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(mock: &'static str, message: &str) -> VerificationFailure {
        VerificationFailure {
            mock,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_verification_without_failures_is_none() {
        assert!(AutoMockError::verification(Vec::new()).is_none());
    }

    #[test]
    fn test_verification_message_lists_every_failure() {
        let error = AutoMockError::verification(vec![
            failure("MockClock", "now called 0 times"),
            failure("MockMailer", "send called 2 times"),
        ])
        .unwrap();

        let message = error.to_string();
        assert!(message.contains("2 unmet expectation(s)"));
        assert!(message.contains("  - MockClock: now called 0 times"));
        assert!(message.contains("  - MockMailer: send called 2 times"));
        assert!(error.is_verification());
        assert_eq!(error.failures().len(), 2);
    }

    #[test]
    fn test_invocation_error_is_transparent() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "clock is unset");
        let error = AutoMockError::invocation(source);

        assert!(error.is_invocation());
        assert_eq!(error.to_string(), "clock is unset");
    }
}
