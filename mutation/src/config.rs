//! Pipeline configuration.

use bastion_access::UnsetRulePolicy;
use serde::Deserialize;
use thiserror::Error;

/// Nesting bound applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Errors raised while loading a `PipelineConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse pipeline config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid pipeline config: {message}")]
    Invalid { message: String },
}

/// Tunables for a `MutationPipeline`.
///
/// ```toml
/// max_depth = 5
/// require_explicit_access = true
/// redact_unreadable_fields = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Nested nodes deeper than this are passed to the store without access
    /// checks or hooks. This bounds recursion on cyclic schemas; it is not an
    /// authorization mechanism.
    pub max_depth: usize,
    /// Treat an unset access rule as deny instead of allow.
    pub require_explicit_access: bool,
    /// Strip fields the caller may not read from the returned record.
    pub redact_unreadable_fields: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            require_explicit_access: false,
            redact_unreadable_fields: true,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_explicit_access(mut self, required: bool) -> Self {
        self.require_explicit_access = required;
        self
    }

    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact_unreadable_fields = redact;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn unset_rule_policy(&self) -> UnsetRulePolicy {
        if self.require_explicit_access {
            UnsetRulePolicy::Explicit
        } else {
            UnsetRulePolicy::Permissive
        }
    }
}
