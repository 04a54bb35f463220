use crate::config::{ConfigError, ConfigSource};
use crate::mock::MockBehavior;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Environment variable selecting the repository's default behavior
pub const DEFAULT_BEHAVIOR_ENV: &str = "AUTOMOCK_DEFAULT_BEHAVIOR";

/// Environment variable toggling verification when a container is dropped
pub const VERIFY_ON_DROP_ENV: &str = "AUTOMOCK_VERIFY_ON_DROP";

const DEFAULT_BEHAVIOR_FIELD: &str = "default_behavior";
const VERIFY_ON_DROP_FIELD: &str = "verify_on_drop";

/// Options controlling how a container creates and verifies mocks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawOptions")]
pub struct ContainerOptions {
    /// Behavior applied to mocks created with `MockBehavior::Default`
    pub default_behavior: MockBehavior,
    /// Run verification once when the container goes out of scope
    pub verify_on_drop: bool,
    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

/// Serialized form; a missing field keeps its default
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawOptions {
    default_behavior: Option<MockBehavior>,
    verify_on_drop: Option<bool>,
}

impl From<RawOptions> for ContainerOptions {
    fn from(raw: RawOptions) -> Self {
        let mut options = Self::new();

        if let Some(behavior) = raw.default_behavior {
            options.default_behavior = behavior;
            options
                .sources
                .insert(DEFAULT_BEHAVIOR_FIELD.to_string(), ConfigSource::Deserialized);
        }

        if let Some(verify_on_drop) = raw.verify_on_drop {
            options.verify_on_drop = verify_on_drop;
            options
                .sources
                .insert(VERIFY_ON_DROP_FIELD.to_string(), ConfigSource::Deserialized);
        }

        options
    }
}

impl ContainerOptions {
    /// Create options with default values
    pub fn new() -> Self {
        let mut sources = HashMap::new();
        sources.insert(
            DEFAULT_BEHAVIOR_FIELD.to_string(),
            ConfigSource::Default(MockBehavior::Default.to_string()),
        );
        sources.insert(
            VERIFY_ON_DROP_FIELD.to_string(),
            ConfigSource::Default("true".to_string()),
        );

        Self {
            default_behavior: MockBehavior::Default,
            verify_on_drop: true,
            sources,
        }
    }

    /// Load options from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::new();

        if let Some(raw) = read_env(DEFAULT_BEHAVIOR_ENV)? {
            options.default_behavior = raw.parse()?;
            options.sources.insert(
                DEFAULT_BEHAVIOR_FIELD.to_string(),
                ConfigSource::EnvVar(DEFAULT_BEHAVIOR_ENV.to_string()),
            );
        }

        if let Some(raw) = read_env(VERIFY_ON_DROP_ENV)? {
            options.verify_on_drop = parse_bool(VERIFY_ON_DROP_FIELD, &raw)?;
            options.sources.insert(
                VERIFY_ON_DROP_FIELD.to_string(),
                ConfigSource::EnvVar(VERIFY_ON_DROP_ENV.to_string()),
            );
        }

        for (field, source) in &options.sources {
            tracing::debug!(field = field.as_str(), source = %source, "container option");
        }

        Ok(options)
    }

    /// Set the behavior used for `MockBehavior::Default` mocks
    pub fn with_default_behavior(mut self, behavior: MockBehavior) -> Self {
        self.default_behavior = behavior;
        self.sources
            .insert(DEFAULT_BEHAVIOR_FIELD.to_string(), ConfigSource::Programmatic);
        self
    }

    /// Enable or disable verification on drop
    pub fn with_verify_on_drop(mut self, verify_on_drop: bool) -> Self {
        self.verify_on_drop = verify_on_drop;
        self.sources
            .insert(VERIFY_ON_DROP_FIELD.to_string(), ConfigSource::Programmatic);
        self
    }

    /// Get configuration source information for debugging
    pub fn config_sources(&self) -> &HashMap<String, ConfigSource> {
        &self.sources
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::environment_error(format!(
            "{} is not valid unicode",
            key
        ))),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_value(field, value, "true or false")),
    }
}
