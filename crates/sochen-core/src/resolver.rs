use std::fmt;

use crate::env::{self, EnvSnapshot};
use crate::error::{ResolveError, Result};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Sampling temperature for the OpenAI-compatible constructor.
pub const OPENAI_TEMPERATURE: f32 = 0.7;
/// Generation-length ceiling for the Anthropic constructor. Not configurable.
pub const ANTHROPIC_MAX_TOKENS: u32 = 20000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAICompatible,
    Anthropic,
}

impl ProviderKind {
    /// Parse a provider identifier, case-insensitive and trimmed.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAICompatible),
            "anthropic" => Some(ProviderKind::Anthropic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAICompatible => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied values that take precedence over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub model: Option<String>,
    pub provider: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

/// Fully resolved constructor keyword set for one provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRequest {
    OpenAiCompatible {
        model: String,
        temperature: f32,
        api_key: String,
        base_url: Option<String>,
    },
    Anthropic {
        model_name: String,
        max_tokens: u32,
        api_key: String,
    },
}

impl ModelRequest {
    pub fn provider(&self) -> ProviderKind {
        match self {
            ModelRequest::OpenAiCompatible { .. } => ProviderKind::OpenAICompatible,
            ModelRequest::Anthropic { .. } => ProviderKind::Anthropic,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ModelRequest::OpenAiCompatible { model, .. } => model,
            ModelRequest::Anthropic { model_name, .. } => model_name,
        }
    }

    pub fn api_key(&self) -> &str {
        match self {
            ModelRequest::OpenAiCompatible { api_key, .. } => api_key,
            ModelRequest::Anthropic { api_key, .. } => api_key,
        }
    }
}

/// Turn overrides plus an environment snapshot into a constructor request.
///
/// Precedence, highest first: an explicit provider override must name a
/// supported provider; otherwise OpenAI-compatible is inferred when a
/// base_url override, an api_key override, or `OPENAI_API_KEY` is present,
/// then Anthropic when `ANTHROPIC_API_KEY` is present. Nothing resolvable
/// is an error, never a silent fallback.
pub fn resolve(overrides: &Overrides, env: &EnvSnapshot) -> Result<ModelRequest> {
    let provider = match overrides.provider.as_deref() {
        Some(raw) => ProviderKind::parse(raw)
            .ok_or_else(|| ResolveError::UnsupportedProvider(raw.to_string()))?,
        None => infer_provider(overrides, env).ok_or(ResolveError::NoCredentials)?,
    };
    build_request(provider, overrides, env)
}

fn infer_provider(overrides: &Overrides, env: &EnvSnapshot) -> Option<ProviderKind> {
    if overrides.base_url.is_some()
        || overrides.api_key.is_some()
        || env.contains(env::OPENAI_API_KEY)
    {
        return Some(ProviderKind::OpenAICompatible);
    }
    if env.contains(env::ANTHROPIC_API_KEY) {
        return Some(ProviderKind::Anthropic);
    }
    None
}

fn build_request(
    provider: ProviderKind,
    overrides: &Overrides,
    env: &EnvSnapshot,
) -> Result<ModelRequest> {
    match provider {
        ProviderKind::OpenAICompatible => {
            let api_key = overrides
                .api_key
                .clone()
                .or_else(|| env.get(env::OPENAI_API_KEY).map(str::to_string))
                .ok_or_else(|| ResolveError::MissingCredential(provider))?;
            let model = overrides
                .model
                .clone()
                .or_else(|| env.get(env::OPENAI_MODEL).map(str::to_string))
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
            let base_url = overrides
                .base_url
                .clone()
                .or_else(|| env.get(env::OPENAI_BASE_URL).map(str::to_string));
            Ok(ModelRequest::OpenAiCompatible {
                model,
                temperature: OPENAI_TEMPERATURE,
                api_key,
                base_url,
            })
        }
        ProviderKind::Anthropic => {
            let api_key = overrides
                .api_key
                .clone()
                .or_else(|| env.get(env::ANTHROPIC_API_KEY).map(str::to_string))
                .ok_or_else(|| ResolveError::MissingCredential(provider))?;
            let model_name = overrides
                .model
                .clone()
                .or_else(|| env.get(env::ANTHROPIC_MODEL).map(str::to_string))
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string());
            Ok(ModelRequest::Anthropic {
                model_name,
                max_tokens: ANTHROPIC_MAX_TOKENS,
                api_key,
            })
        }
    }
}
