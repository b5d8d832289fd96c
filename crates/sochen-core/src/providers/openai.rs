use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: Client,
    model: String,
    temperature: f32,
    api_key: String,
    base_url: String,
}

impl OpenAiChatModel {
    pub fn new(
        client: Client,
        model: &str,
        temperature: f32,
        api_key: &str,
        base_url: Option<&str>,
    ) -> Self {
        let base_url = base_url
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            client,
            model: model.to_string(),
            temperature,
            api_key: api_key.to_string(),
            base_url,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// True when resolution pointed this handle at a non-default,
    /// OpenAI-compatible endpoint.
    pub fn uses_custom_endpoint(&self) -> bool {
        self.base_url != DEFAULT_BASE_URL
    }
}
