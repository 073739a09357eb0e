use std::path::{Path, PathBuf};

use anyhow::Result;
use playground_core::constants::{defaults, export, limits};
use playground_core::gateway::clamp_max_tokens;
use playground_core::{CompletionGateway, Conversation, Message, PlaygroundError, Role, Settings, TurnOptions};

use crate::commands::{handle_command, CommandResult};

/// What the front end should show after one line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Assistant reply appended to the conversation.
    Reply { message: Message, degraded: bool },
    /// Informational text.
    Notice(String),
    /// Blocking notice; nothing was sent.
    Warning(String),
    Cleared,
    Quit,
    /// Blank input.
    Ignored,
}

/// One chat session: owns the conversation and the per-session model choice.
pub struct ChatSession {
    gateway: CompletionGateway,
    conversation: Conversation,
    options: TurnOptions,
    models: Vec<String>,
    token: String,
}

impl ChatSession {
    pub fn new(gateway: CompletionGateway, settings: &Settings, token: impl Into<String>) -> Self {
        Self {
            gateway,
            conversation: Conversation::new(),
            options: settings.turn_options(),
            models: settings.models.clone(),
            token: token.into(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn options(&self) -> &TurnOptions {
        &self.options
    }

    pub async fn handle_input(&mut self, input: &str) -> Result<SessionEvent> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(SessionEvent::Ignored);
        }

        match handle_command(input) {
            CommandResult::NotACommand => self.send(input).await,
            CommandResult::Message(text) => Ok(SessionEvent::Notice(text)),
            CommandResult::Quit => Ok(SessionEvent::Quit),
            CommandResult::Clear => {
                self.conversation.clear();
                Ok(SessionEvent::Cleared)
            }
            CommandResult::Export(path) => {
                let path = path.unwrap_or_else(|| defaults::EXPORT_FILE_NAME.to_string());
                match export_to(&self.conversation, Path::new(&path)) {
                    Ok(Some(written)) => Ok(SessionEvent::Notice(format!(
                        "Conversation exported to {}",
                        written.display()
                    ))),
                    Ok(None) => Ok(SessionEvent::Warning("Nothing to export yet.".into())),
                    // The session and its history outlive a failed write.
                    Err(e) => {
                        tracing::warn!(path = %path, "export failed: {e}");
                        Ok(SessionEvent::Warning(format!("Export failed: {e}")))
                    }
                }
            }
            CommandResult::ShowHistory => {
                if self.conversation.is_empty() {
                    return Ok(SessionEvent::Notice("No messages yet.".into()));
                }
                let lines: Vec<String> =
                    self.conversation.messages().iter().map(render_message).collect();
                Ok(SessionEvent::Notice(lines.join("\n\n")))
            }
            CommandResult::ShowStatus => Ok(SessionEvent::Notice(format!(
                "Model: {}\nMax tokens: {}\nMessages: {}",
                self.options.model,
                self.options.max_tokens,
                self.conversation.len()
            ))),
            CommandResult::ListModels => {
                let lines: Vec<String> = self
                    .models
                    .iter()
                    .map(|m| {
                        let marker = if *m == self.options.model { "*" } else { " " };
                        format!("{marker} {m}")
                    })
                    .collect();
                Ok(SessionEvent::Notice(lines.join("\n")))
            }
            CommandResult::ModelChanged(model) => {
                if self.models.iter().any(|m| *m == model) {
                    self.options.model = model;
                    Ok(SessionEvent::Notice(format!("Model set to {}", self.options.model)))
                } else {
                    Ok(SessionEvent::Notice(format!(
                        "Unknown model: {model}. Available: {}",
                        self.models.join(", ")
                    )))
                }
            }
            CommandResult::MaxTokensChanged(n) => {
                self.options.max_tokens = clamp_max_tokens(n);
                let mut text = format!("Max tokens set to {}", self.options.max_tokens);
                if self.options.max_tokens != n {
                    text.push_str(&format!(
                        " (allowed range {}-{} in steps of {})",
                        limits::MIN_MAX_TOKENS,
                        limits::MAX_MAX_TOKENS,
                        limits::MAX_TOKENS_STEP
                    ));
                }
                Ok(SessionEvent::Notice(text))
            }
        }
    }

    async fn send(&mut self, input: &str) -> Result<SessionEvent> {
        match self
            .gateway
            .send(&mut self.conversation, input, &self.options, &self.token)
            .await
        {
            Ok(reply) => {
                let message = self
                    .conversation
                    .last_message()
                    .cloned()
                    .unwrap_or_else(|| Message::assistant(reply.text.clone()));
                Ok(SessionEvent::Reply {
                    message,
                    degraded: reply.is_degraded(),
                })
            }
            Err(PlaygroundError::MissingCredential) => Ok(SessionEvent::Warning(
                "Please provide your Hugging Face token (--token or HF_TOKEN) to continue.".into(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write the transcript to `path`. Returns `None` without touching the
/// filesystem when the conversation is empty.
pub fn export_to(conversation: &Conversation, path: &Path) -> Result<Option<PathBuf>> {
    let Some(text) = conversation.export() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    Ok(Some(path.to_path_buf()))
}

pub fn render_message(message: &Message) -> String {
    let label = match message.role() {
        Role::User => export::USER_LABEL,
        _ => export::BOT_LABEL,
    };
    match message.timestamp() {
        Some(ts) => format!(
            "{label} [{}]\n{}",
            ts.format(export::TIMESTAMP_FORMAT),
            message.content()
        ),
        None => format!("{label}\n{}", message.content()),
    }
}
