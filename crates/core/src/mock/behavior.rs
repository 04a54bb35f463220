use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Strictness mode of a mock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockBehavior {
    /// Every call must match a configured expectation
    Strict,
    /// Unconfigured calls succeed with default results
    Loose,
    /// Defer to the behavior the mock factory was configured with
    #[default]
    Default,
}

impl MockBehavior {
    /// Resolve `Default` against the factory's behavior.
    ///
    /// A factory that was itself configured with `Default` behaves strictly.
    pub fn resolve(self, fallback: MockBehavior) -> MockBehavior {
        match (self, fallback) {
            (MockBehavior::Default, MockBehavior::Default) => MockBehavior::Strict,
            (MockBehavior::Default, fallback) => fallback,
            (behavior, _) => behavior,
        }
    }

    /// Check if the behavior is strict
    pub fn is_strict(&self) -> bool {
        matches!(self, MockBehavior::Strict)
    }

    /// Check if the behavior is loose
    pub fn is_loose(&self) -> bool {
        matches!(self, MockBehavior::Loose)
    }

    /// Get the behavior name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MockBehavior::Strict => "strict",
            MockBehavior::Loose => "loose",
            MockBehavior::Default => "default",
        }
    }
}

impl std::fmt::Display for MockBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MockBehavior {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(MockBehavior::Strict),
            "loose" => Ok(MockBehavior::Loose),
            "default" => Ok(MockBehavior::Default),
            _ => Err(ConfigError::invalid_value(
                "default_behavior",
                s,
                "strict, loose, or default",
            )),
        }
    }
}
