use reqwest::Client;

use crate::resolver::{ModelRequest, ProviderKind};

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicChatModel;
pub use openai::OpenAiChatModel;

/// Constructed chat model handle. Holds the HTTP client and resolved
/// parameters for the downstream agent loop; no requests are sent here.
#[derive(Debug, Clone)]
pub enum ChatModel {
    OpenAiCompatible(OpenAiChatModel),
    Anthropic(AnthropicChatModel),
}

impl ChatModel {
    pub fn build(request: &ModelRequest, client: Client) -> Self {
        match request {
            ModelRequest::OpenAiCompatible {
                model,
                temperature,
                api_key,
                base_url,
            } => ChatModel::OpenAiCompatible(OpenAiChatModel::new(
                client,
                model,
                *temperature,
                api_key,
                base_url.as_deref(),
            )),
            ModelRequest::Anthropic {
                model_name,
                max_tokens,
                api_key,
            } => ChatModel::Anthropic(AnthropicChatModel::new(
                client,
                model_name,
                *max_tokens,
                api_key,
            )),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        match self {
            ChatModel::OpenAiCompatible(_) => ProviderKind::OpenAICompatible,
            ChatModel::Anthropic(_) => ProviderKind::Anthropic,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ChatModel::OpenAiCompatible(model) => model.model(),
            ChatModel::Anthropic(model) => model.model_name(),
        }
    }

    /// Concrete URL the agent loop would post completions to.
    pub fn endpoint(&self) -> String {
        match self {
            ChatModel::OpenAiCompatible(model) => model.chat_completions_url(),
            ChatModel::Anthropic(model) => model.messages_url(),
        }
    }

    pub fn api_key(&self) -> &str {
        match self {
            ChatModel::OpenAiCompatible(model) => model.api_key(),
            ChatModel::Anthropic(model) => model.api_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_openai_handle_with_default_endpoint() {
        let request = ModelRequest::OpenAiCompatible {
            model: "gpt-5-mini".to_string(),
            temperature: 0.7,
            api_key: "test-key".to_string(),
            base_url: None,
        };
        let model = ChatModel::build(&request, Client::new());
        assert_eq!(model.provider(), ProviderKind::OpenAICompatible);
        assert_eq!(
            model.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn builds_openai_handle_with_custom_endpoint() {
        let request = ModelRequest::OpenAiCompatible {
            model: "meta/llama3-70b-instruct".to_string(),
            temperature: 0.7,
            api_key: "router-key".to_string(),
            base_url: Some("https://opencode.ai/zen/v1/".to_string()),
        };
        let model = ChatModel::build(&request, Client::new());
        assert_eq!(
            model.endpoint(),
            "https://opencode.ai/zen/v1/chat/completions"
        );
        match model {
            ChatModel::OpenAiCompatible(inner) => assert!(inner.uses_custom_endpoint()),
            ChatModel::Anthropic(_) => panic!("wrong provider"),
        }
    }

    #[test]
    fn builds_anthropic_handle() {
        let request = ModelRequest::Anthropic {
            model_name: "claude-3-opus".to_string(),
            max_tokens: 20000,
            api_key: "anthropic-key".to_string(),
        };
        let model = ChatModel::build(&request, Client::new());
        assert_eq!(model.provider(), ProviderKind::Anthropic);
        assert_eq!(model.model(), "claude-3-opus");
        assert_eq!(model.endpoint(), "https://api.anthropic.com/v1/messages");
    }
}
