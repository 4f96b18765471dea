use serde::Deserialize;
use thiserror::Error;

/// Macro replay depth used when no configuration says otherwise.
pub const DEFAULT_MAX_MACRO_DEPTH: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid compiler configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Compiler settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// How deeply macro invocations may nest before the invocation is
    /// rejected. `None` replays without any bound, so a self-invoking macro
    /// recurses until the stack runs out.
    pub max_macro_depth: Option<usize>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            max_macro_depth: Some(DEFAULT_MAX_MACRO_DEPTH),
        }
    }
}

impl CompilerConfig {
    /// Replay macros without a depth bound.
    pub fn unbounded() -> Self {
        CompilerConfig {
            max_macro_depth: None,
        }
    }

    /// Load settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
