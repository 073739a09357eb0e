use crate::constants::{defaults, fallback, limits};
use crate::context::Conversation;
use crate::error::PlaygroundError;
use crate::llm::{CompletionRequest, Credential, GenerationRequest, InferenceBackend, Message, Role};

/// Model selection and token budget for a single turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOptions {
    pub model: String,
    pub max_tokens: u32,
}

impl TurnOptions {
    /// `max_tokens` is snapped onto the supported range and step.
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens: clamp_max_tokens(max_tokens),
        }
    }
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self::new(defaults::MODEL, defaults::MAX_TOKENS)
    }
}

/// Clamp into 128..=1024, then round to the nearest 64-token step.
pub fn clamp_max_tokens(value: u32) -> u32 {
    let step = limits::MAX_TOKENS_STEP;
    let clamped = value.clamp(limits::MIN_MAX_TOKENS, limits::MAX_MAX_TOKENS);
    let snapped = (clamped + step / 2) / step * step;
    snapped.clamp(limits::MIN_MAX_TOKENS, limits::MAX_MAX_TOKENS)
}

/// Terminal state a turn reached.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Chat completion answered.
    Primary,
    /// Chat completion failed, text generation answered.
    Fallback { primary_error: String },
    /// Both stages failed; the reply text is the composite error.
    Failed {
        primary_error: String,
        fallback_error: String,
    },
}

/// Text to append as the assistant message, plus how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub outcome: TurnOutcome,
}

impl Reply {
    pub fn is_degraded(&self) -> bool {
        !matches!(self.outcome, TurnOutcome::Primary)
    }
}

/// Wraps the user's message in the instruction markers the fallback model expects.
pub fn instruction_prompt(content: &str) -> String {
    format!(
        "{}{}{}",
        fallback::INSTRUCTION_OPEN,
        content,
        fallback::INSTRUCTION_CLOSE
    )
}

pub fn composite_error(primary: &str, fallback: &str) -> String {
    format!("Error: {primary}\nFallback also failed: {fallback}")
}

/// Produces assistant replies: structured chat completion first, raw text
/// generation from the latest user turn when that fails.
pub struct CompletionGateway {
    backend: Box<dyn InferenceBackend>,
    system_prompt: String,
}

impl CompletionGateway {
    pub fn new(backend: Box<dyn InferenceBackend>) -> Self {
        Self {
            backend,
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// System message followed by every stored message, in order.
    pub fn build_messages(&self, conversation: &Conversation) -> Vec<Message> {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(conversation.messages().iter().cloned());
        messages
    }

    /// Run one turn against `conversation` without mutating it.
    ///
    /// Only `MissingCredential` is returned as an error; remote failures end
    /// up in the reply.
    pub async fn complete(
        &self,
        conversation: &Conversation,
        options: &TurnOptions,
        credential: &str,
    ) -> Result<Reply, PlaygroundError> {
        let credential = Credential::new(credential).ok_or(PlaygroundError::MissingCredential)?;

        let messages = self.build_messages(conversation);

        let primary_error = match self.primary(&messages, options, &credential).await {
            Ok(text) => {
                tracing::info!(model = %options.model, "chat completion succeeded");
                return Ok(Reply {
                    text,
                    outcome: TurnOutcome::Primary,
                });
            }
            Err(e) => e.to_string(),
        };

        tracing::warn!(error = %primary_error, "chat completion failed, falling back to text generation");

        match self.fallback(&messages, options, &credential).await {
            Ok(text) => {
                tracing::info!(model = %options.model, "text generation fallback succeeded");
                Ok(Reply {
                    text,
                    outcome: TurnOutcome::Fallback { primary_error },
                })
            }
            Err(e) => {
                let fallback_error = e.to_string();
                tracing::warn!(error = %fallback_error, "text generation fallback failed");
                Ok(Reply {
                    text: composite_error(&primary_error, &fallback_error),
                    outcome: TurnOutcome::Failed {
                        primary_error,
                        fallback_error,
                    },
                })
            }
        }
    }

    /// Run a turn and append the reply as an assistant message.
    pub async fn respond(
        &self,
        conversation: &mut Conversation,
        options: &TurnOptions,
        credential: &str,
    ) -> Result<Reply, PlaygroundError> {
        let reply = self.complete(conversation, options, credential).await?;
        conversation.append(Role::Assistant, reply.text.clone());
        Ok(reply)
    }

    /// Record `input` as a user message, then respond to it.
    ///
    /// With a missing credential the user message stays in the history and
    /// no reply is appended.
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        input: &str,
        options: &TurnOptions,
        credential: &str,
    ) -> Result<Reply, PlaygroundError> {
        conversation.append(Role::User, input.trim());
        self.respond(conversation, options, credential).await
    }

    async fn primary(
        &self,
        messages: &[Message],
        options: &TurnOptions,
        credential: &Credential,
    ) -> Result<String, PlaygroundError> {
        let request = CompletionRequest {
            messages: messages.to_vec(),
            model: options.model.clone(),
            max_tokens: options.max_tokens,
            credential: credential.clone(),
        };
        tracing::debug!(model = %request.model, messages = request.messages.len(), "chat completion request");

        let text = self.backend.chat_completion(&request).await?;
        Ok(text.trim().to_string())
    }

    async fn fallback(
        &self,
        messages: &[Message],
        options: &TurnOptions,
        credential: &Credential,
    ) -> Result<String, PlaygroundError> {
        let latest_user = messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::User)
            .ok_or(PlaygroundError::NoUserMessage)?;

        let request = GenerationRequest {
            prompt: instruction_prompt(latest_user.content()),
            model: options.model.clone(),
            max_new_tokens: options.max_tokens,
            do_sample: fallback::DO_SAMPLE,
            temperature: fallback::TEMPERATURE,
            credential: credential.clone(),
        };
        tracing::debug!(model = %request.model, "text generation request");

        let text = self.backend.text_generation(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(PlaygroundError::EmptyGeneration);
        }
        Ok(text.to_string())
    }
}
