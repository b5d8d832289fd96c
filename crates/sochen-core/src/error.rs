use thiserror::Error;

use crate::resolver::ProviderKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unsupported provider override '{0}', expected 'openai' or 'anthropic'")]
    UnsupportedProvider(String),
    #[error("no API key configured")]
    NoCredentials,
    #[error("missing API key for provider: {0}")]
    MissingCredential(ProviderKind),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
