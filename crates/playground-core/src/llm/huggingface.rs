use crate::constants::{defaults, endpoints};
use crate::error::PlaygroundError;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the Hugging Face serverless Inference API.
pub struct HuggingFaceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HuggingFaceClient {
    pub fn new() -> Result<Self, PlaygroundError> {
        Self::with_timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, PlaygroundError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: endpoints::HF_INFERENCE_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self, model: &str) -> String {
        format!("{}/models/{}/v1/chat/completions", self.base_url, model)
    }

    fn generation_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    async fn post_json<B: Serialize>(
        &self,
        url: &str,
        credential: &Credential,
        body: &B,
    ) -> Result<String, PlaygroundError> {
        tracing::debug!(url, "sending inference request");

        let response = self
            .client
            .post(url)
            .bearer_auth(credential.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(PlaygroundError::Inference(format!(
                "Hugging Face API error ({}): {}",
                status, response_text
            )));
        }

        Ok(response_text)
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationBody<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    do_sample: bool,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
    Failure { error: String },
}

fn parse_chat_response(body: &str) -> Result<String, PlaygroundError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| PlaygroundError::inference(format!("Failed to parse response: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| PlaygroundError::inference("No choices in chat completion response"))?;

    choice
        .message
        .content
        .ok_or_else(|| PlaygroundError::inference("No content in chat completion response"))
}

fn parse_generation_response(body: &str) -> Result<String, PlaygroundError> {
    let response: GenerationResponse = serde_json::from_str(body)
        .map_err(|e| PlaygroundError::inference(format!("Failed to parse response: {e}")))?;

    match response {
        GenerationResponse::Batch(items) => Ok(items
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .unwrap_or_default()),
        GenerationResponse::Single(g) => Ok(g.generated_text),
        GenerationResponse::Failure { error } => Err(PlaygroundError::Inference(error)),
    }
}

#[async_trait::async_trait]
impl InferenceBackend for HuggingFaceClient {
    async fn chat_completion(&self, request: &CompletionRequest) -> Result<String, PlaygroundError> {
        let body = ChatRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            stream: false,
        };

        let text = self
            .post_json(&self.chat_url(&request.model), &request.credential, &body)
            .await?;
        parse_chat_response(&text)
    }

    async fn text_generation(&self, request: &GenerationRequest) -> Result<String, PlaygroundError> {
        let body = GenerationBody {
            inputs: &request.prompt,
            parameters: GenerationParameters {
                max_new_tokens: request.max_new_tokens,
                do_sample: request.do_sample,
                temperature: request.temperature,
                return_full_text: false,
            },
        };

        let text = self
            .post_json(&self.generation_url(&request.model), &request.credential, &body)
            .await?;
        parse_generation_response(&text)
    }
}
