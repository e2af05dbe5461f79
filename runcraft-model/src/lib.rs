//! # runcraft model
//!
//! Everything needed to talk to a hosted model.
//!
//! ## Core Concepts
//! - **Configuration**: validated credential, endpoint, model id and sampling parameters
//! - **RunConfig**: the model and settings used for one invocation
//! - **Provider**: trait-based LLM communication (OpenAI-compatible chat completions)

pub mod config;
pub mod error;
pub mod provider;

pub use config::{
    ConfigFactory, ConfigPreset, Configuration, ModelId, ModelSettings, RunConfig,
    API_KEY_VAR, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, GEMINI_ENDPOINT,
};
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
    OpenAIProvider, ProviderConfig, ProviderError, Role, Usage, UsageTracker,
};
