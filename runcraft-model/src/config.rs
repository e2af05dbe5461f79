//! Run configuration
//!
//! `ConfigFactory` reads the credential, validates the sampling parameters
//! and produces a [`Configuration`]. Nothing here touches the network.

use crate::error::{self, Error, Result};
use crate::provider::{CompletionRequest, OpenAIProvider, ProviderConfig};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Environment variable holding the API credential
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Gemini's OpenAI-compatible endpoint
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: i64 = 1000;

// ============================================================================
// Model identifiers
// ============================================================================

/// Models served behind the compatibility endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelId {
    #[default]
    Gemini20Flash,
    Gemini20FlashLite,
    Gemini15Flash,
    Gemini15Pro,
    Gemini25Flash,
    Gemini25Pro,
}

impl ModelId {
    pub const ALL: [ModelId; 6] = [
        ModelId::Gemini20Flash,
        ModelId::Gemini20FlashLite,
        ModelId::Gemini15Flash,
        ModelId::Gemini15Pro,
        ModelId::Gemini25Flash,
        ModelId::Gemini25Pro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gemini20Flash => "gemini-2.0-flash",
            ModelId::Gemini20FlashLite => "gemini-2.0-flash-lite",
            ModelId::Gemini15Flash => "gemini-1.5-flash",
            ModelId::Gemini15Pro => "gemini-1.5-pro",
            ModelId::Gemini25Flash => "gemini-2.5-flash",
            ModelId::Gemini25Pro => "gemini-2.5-pro",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_parameter("model_id", s, format!("unknown model: {}", s))
                    .with_operation("config::parse_model")
            })
    }
}

// ============================================================================
// Settings and run configuration
// ============================================================================

/// Sampling parameters forwarded with every request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelSettings {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl ModelSettings {
    pub fn new(temperature: f32, max_tokens: usize) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        }
    }

    /// Copy the settings onto a request
    pub fn apply(&self, mut request: CompletionRequest) -> CompletionRequest {
        if let Some(t) = self.temperature {
            request = request.with_temperature(t);
        }
        if let Some(max) = self.max_tokens {
            request = request.with_max_tokens(max);
        }
        request
    }
}

/// Everything one model invocation needs besides the agent and the input
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub model: ModelId,
    pub settings: ModelSettings,
    /// Kept for parity with hosted agent runtimes; runcraft never uploads traces
    pub tracing_disabled: bool,
}

impl RunConfig {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            settings: ModelSettings::default(),
            tracing_disabled: true,
        }
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(ModelId::default())
    }
}

/// A validated connection descriptor
#[derive(Clone)]
pub struct Configuration {
    api_key: String,
    endpoint: String,
    model_id: ModelId,
    temperature: f32,
    max_output_tokens: usize,
}

impl Configuration {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model_id(&self) -> ModelId {
        self.model_id
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_output_tokens(&self) -> usize {
        self.max_output_tokens
    }

    pub fn with_model(mut self, model_id: ModelId) -> Self {
        self.model_id = model_id;
        self
    }

    pub fn settings(&self) -> ModelSettings {
        ModelSettings::new(self.temperature, self.max_output_tokens)
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(self.model_id).with_settings(self.settings())
    }

    pub fn provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::gemini(self.api_key.clone())
            .with_model(self.model_id.as_str());
        config.base_url = self.endpoint.clone();
        config
    }

    /// Build the HTTP provider for this configuration
    pub fn connect(&self) -> Result<OpenAIProvider> {
        OpenAIProvider::new(self.provider_config())
            .map_err(|e| e.with_operation("config::connect"))
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Named parameter sets for common kinds of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigPreset {
    Creative,
    Analytical,
    Balanced,
    Concise,
}

impl ConfigPreset {
    pub const ALL: [ConfigPreset; 4] = [
        ConfigPreset::Creative,
        ConfigPreset::Analytical,
        ConfigPreset::Balanced,
        ConfigPreset::Concise,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigPreset::Creative => "creative",
            ConfigPreset::Analytical => "analytical",
            ConfigPreset::Balanced => "balanced",
            ConfigPreset::Concise => "concise",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            ConfigPreset::Creative => 0.9,
            ConfigPreset::Analytical => 0.2,
            ConfigPreset::Balanced => 0.7,
            ConfigPreset::Concise => 0.5,
        }
    }

    pub fn max_output_tokens(&self) -> i64 {
        match self {
            ConfigPreset::Creative => 1500,
            ConfigPreset::Analytical => 800,
            ConfigPreset::Balanced => 1000,
            ConfigPreset::Concise => 200,
        }
    }
}

impl FromStr for ConfigPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ConfigPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::invalid_parameter("preset", s, format!("unknown preset: {}", s)))
    }
}

// ============================================================================
// Factory
// ============================================================================

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builds [`Configuration`]s from the environment
pub struct ConfigFactory {
    lookup: Lookup,
}

impl ConfigFactory {
    /// Read the credential from the process environment
    pub fn from_env() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Read the credential through `lookup` instead of the process environment
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Validate the parameters and produce a configuration.
    ///
    /// A missing credential is reported before any parameter problem.
    pub fn build(&self, temperature: f32, max_output_tokens: i64) -> Result<Configuration> {
        let api_key = (self.lookup)(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::missing_credential(API_KEY_VAR).with_operation("config::build"))?;

        if !(0.0..=1.0).contains(&temperature) {
            return Err(error::invalid_temperature(temperature).with_operation("config::build"));
        }

        let max_output_tokens = usize::try_from(max_output_tokens)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                error::invalid_max_output_tokens(max_output_tokens).with_operation("config::build")
            })?;

        let config = Configuration {
            api_key,
            endpoint: GEMINI_ENDPOINT.to_string(),
            model_id: ModelId::default(),
            temperature,
            max_output_tokens,
        };
        debug!(
            model = %config.model_id,
            temperature,
            max_output_tokens,
            "built configuration"
        );
        Ok(config)
    }

    /// `build(0.7, 1000)`
    pub fn build_default(&self) -> Result<Configuration> {
        self.build(DEFAULT_TEMPERATURE, DEFAULT_MAX_OUTPUT_TOKENS)
    }

    pub fn build_preset(&self, preset: ConfigPreset) -> Result<Configuration> {
        self.build(preset.temperature(), preset.max_output_tokens())
            .map_err(|e| e.with_context("preset", preset.name()))
    }

    /// One configuration per preset, in [`ConfigPreset::ALL`] order
    pub fn build_presets(&self) -> Result<Vec<(ConfigPreset, Configuration)>> {
        ConfigPreset::ALL
            .into_iter()
            .map(|preset| Ok((preset, self.build_preset(preset)?)))
            .collect()
    }
}

impl Default for ConfigFactory {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn factory_with_key() -> ConfigFactory {
        ConfigFactory::with_lookup(|key| (key == API_KEY_VAR).then(|| "test-key".to_string()))
    }

    fn factory_without_key() -> ConfigFactory {
        ConfigFactory::with_lookup(|_| None)
    }

    #[test]
    fn test_build_defaults() {
        let config = factory_with_key().build_default().unwrap();
        assert_eq!(config.endpoint(), GEMINI_ENDPOINT);
        assert_eq!(config.model_id(), ModelId::Gemini20Flash);
        assert_eq!(config.temperature(), 0.7);
        assert_eq!(config.max_output_tokens(), 1000);
    }

    #[test]
    fn test_temperature_bounds_inclusive() {
        let factory = factory_with_key();
        assert!(factory.build(0.0, 1000).is_ok());
        assert!(factory.build(1.0, 1000).is_ok());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let factory = factory_with_key();
        for t in [-0.01, -1.0, 1.01, 2.0, f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let err = factory.build(t, 1000).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "temperature {}", t);
            assert_eq!(err.operation(), "config::build");
        }
    }

    #[test]
    fn test_max_output_tokens_not_positive() {
        let factory = factory_with_key();
        for n in [0, -1, -1000, i64::MIN] {
            let err = factory.build(0.5, n).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "max_output_tokens {}", n);
        }
        assert_eq!(factory.build(0.5, 1).unwrap().max_output_tokens(), 1);
    }

    #[test]
    fn test_missing_credential_wins() {
        let factory = factory_without_key();
        for (t, n) in [(0.7, 1000), (5.0, 1000), (0.7, -3), (f32::NAN, 0)] {
            let err = factory.build(t, n).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingCredential);
        }
    }

    #[test]
    fn test_empty_credential_is_missing() {
        for value in ["", "   "] {
            let value = value.to_string();
            let factory = ConfigFactory::with_lookup(move |_| Some(value.clone()));
            let err = factory.build_default().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingCredential);
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = factory_with_key().build_default().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("gemini-2.0-flash"));
    }

    #[test]
    fn test_run_config_carries_settings() {
        let config = factory_with_key().build(0.1, 200).unwrap();
        let run = config.run_config();
        assert_eq!(run.model, ModelId::Gemini20Flash);
        assert_eq!(run.settings, ModelSettings::new(0.1, 200));
        assert!(run.tracing_disabled);

        let provider = config.provider_config();
        assert_eq!(provider.api_key.as_deref(), Some("test-key"));
        assert_eq!(provider.base_url, GEMINI_ENDPOINT);
    }

    #[test]
    fn test_settings_apply() {
        let request = ModelSettings::new(0.3, 64).apply(CompletionRequest::default());
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(64));

        let request = ModelSettings::default().apply(CompletionRequest::default());
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_presets() {
        let presets = factory_with_key().build_presets().unwrap();
        let names: Vec<_> = presets.iter().map(|(p, _)| p.name()).collect();
        assert_eq!(names, ["creative", "analytical", "balanced", "concise"]);

        let (_, concise) = &presets[3];
        assert_eq!(concise.temperature(), 0.5);
        assert_eq!(concise.max_output_tokens(), 200);

        assert_eq!("analytical".parse::<ConfigPreset>().unwrap(), ConfigPreset::Analytical);
        assert!("wild".parse::<ConfigPreset>().is_err());
    }

    #[test]
    fn test_model_id_parse() {
        for model in ModelId::ALL {
            assert_eq!(model.as_str().parse::<ModelId>().unwrap(), model);
        }
        let err = "gpt-5".parse::<ModelId>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_connect_does_not_need_network() {
        let config = factory_with_key().build_default().unwrap();
        let provider = config.connect().unwrap();
        assert_eq!(provider.config().default_model, "gemini-2.0-flash");
    }
}
