//! Layered configuration: built-in defaults, optional JSON file, environment
//! overrides.
//!
//! Resolution happens exactly once at startup and produces an immutable
//! value that is passed by reference into every component; nothing mutates
//! configuration during a run. The merge order is
//! `defaults <- config file <- environment`, where the file is either the
//! explicit `--config` path or `~/.winnower/config.json` when present.

use crate::error::WinnowerError;
use crate::provider::LlmProvider;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable overriding the OpenAI model id.
pub const ENV_OPENAI_MODEL: &str = "WINNOWER_OPENAI_MODEL";
/// Environment variable overriding the Anthropic model id.
pub const ENV_ANTHROPIC_MODEL: &str = "WINNOWER_ANTHROPIC_MODEL";
/// Environment variable overriding `max_tokens` (parsed as integer).
pub const ENV_MAX_TOKENS: &str = "WINNOWER_MAX_TOKENS";
/// Environment variable overriding `temperature` (parsed as float).
pub const ENV_TEMPERATURE: &str = "WINNOWER_TEMPERATURE";

/// Process-wide configuration, read-only after [`WinnowerConfig::load`].
#[derive(Clone)]
pub struct WinnowerConfig {
    /// Model id used for the `openai` provider.
    pub openai_model: String,

    /// Model id used for the `anthropic` provider.
    pub anthropic_model: String,

    /// Maximum tokens the model may generate per paper. Must be >= 1.
    pub max_tokens: u32,

    /// Sampling temperature in `[0, 1]`. Low values keep the extraction
    /// faithful to the source text.
    pub temperature: f32,

    /// Verbose diagnostics (full error chains on per-paper failures).
    pub verbose: bool,

    /// Pre-constructed provider. Takes precedence over the `--model` name
    /// when building an extractor; used by tests and embedders that need a
    /// custom provider. Never read from a config file.
    pub provider: Option<Arc<dyn LlmProvider>>,
}

impl Default for WinnowerConfig {
    fn default() -> Self {
        Self {
            openai_model: "gpt-4".to_string(),
            anthropic_model: "claude-3-sonnet-20240229".to_string(),
            max_tokens: 4000,
            temperature: 0.1,
            verbose: false,
            provider: None,
        }
    }
}

impl fmt::Debug for WinnowerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WinnowerConfig")
            .field("openai_model", &self.openai_model)
            .field("anthropic_model", &self.anthropic_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("verbose", &self.verbose)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LlmProvider>"))
            .finish()
    }
}

/// Optional keys accepted in the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileOverrides {
    openai_model: Option<String>,
    anthropic_model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    verbose: Option<bool>,
}

impl WinnowerConfig {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist and parse; a missing or
    /// malformed explicit file is a fatal [`WinnowerError::InvalidConfig`].
    /// Without one, `~/.winnower/config.json` is used when present and
    /// silently skipped otherwise. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, WinnowerError> {
        let mut config = Self::default();

        match path {
            Some(explicit) => {
                config.apply_file(explicit)?;
            }
            None => {
                if let Some(default_path) = Self::default_config_path() {
                    if default_path.exists() {
                        config.apply_file(&default_path)?;
                    }
                }
            }
        }

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location: `~/.winnower/config.json`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".winnower").join("config.json"))
    }

    /// Write the built-in defaults as a JSON config file and return its
    /// path. `dir` defaults to `~/.winnower`.
    pub fn write_default(dir: Option<&Path>) -> Result<PathBuf, WinnowerError> {
        let dir = match dir {
            Some(d) => d.to_path_buf(),
            None => dirs::home_dir()
                .map(|home| home.join(".winnower"))
                .ok_or_else(|| {
                    WinnowerError::InvalidConfig("could not determine home directory".into())
                })?,
        };
        std::fs::create_dir_all(&dir)?;

        let defaults = Self::default();
        let json = serde_json::json!({
            "openai_model": defaults.openai_model,
            "anthropic_model": defaults.anthropic_model,
            "max_tokens": defaults.max_tokens,
            "temperature": defaults.temperature,
            "verbose": defaults.verbose,
        });
        let path = dir.join("config.json");
        let body = serde_json::to_string_pretty(&json)
            .map_err(|e| WinnowerError::InvalidConfig(e.to_string()))?;
        std::fs::write(&path, body).map_err(|e| WinnowerError::OutputWrite {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), WinnowerError> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            WinnowerError::InvalidConfig(format!(
                "cannot read config file '{}': {e}",
                path.display()
            ))
        })?;
        let overrides: FileOverrides = serde_json::from_str(&body).map_err(|e| {
            WinnowerError::InvalidConfig(format!(
                "malformed config file '{}': {e}",
                path.display()
            ))
        })?;

        if let Some(v) = overrides.openai_model {
            self.openai_model = v;
        }
        if let Some(v) = overrides.anthropic_model {
            self.anthropic_model = v;
        }
        if let Some(v) = overrides.max_tokens {
            self.max_tokens = v;
        }
        if let Some(v) = overrides.temperature {
            self.temperature = v;
        }
        if let Some(v) = overrides.verbose {
            self.verbose = v;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), WinnowerError> {
        if let Ok(v) = std::env::var(ENV_OPENAI_MODEL) {
            self.openai_model = v;
        }
        if let Ok(v) = std::env::var(ENV_ANTHROPIC_MODEL) {
            self.anthropic_model = v;
        }
        if let Ok(v) = std::env::var(ENV_MAX_TOKENS) {
            self.max_tokens = v.parse().map_err(|_| {
                WinnowerError::InvalidConfig(format!(
                    "{ENV_MAX_TOKENS} must be an integer, got '{v}'"
                ))
            })?;
        }
        if let Ok(v) = std::env::var(ENV_TEMPERATURE) {
            self.temperature = v.parse().map_err(|_| {
                WinnowerError::InvalidConfig(format!(
                    "{ENV_TEMPERATURE} must be a number, got '{v}'"
                ))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), WinnowerError> {
        if self.max_tokens == 0 {
            return Err(WinnowerError::InvalidConfig(
                "max_tokens must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(WinnowerError::InvalidConfig(format!(
                "temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
