use reqwest::Client;

pub const BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicChatModel {
    client: Client,
    model_name: String,
    max_tokens: u32,
    api_key: String,
}

impl AnthropicChatModel {
    pub fn new(client: Client, model_name: &str, max_tokens: u32, api_key: &str) -> Self {
        Self {
            client,
            model_name: model_name.to_string(),
            max_tokens,
            api_key: api_key.to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn version(&self) -> &'static str {
        DEFAULT_VERSION
    }

    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", BASE_URL)
    }
}
