use crate::constants::export;
use crate::llm::{Message, Role};

/// Ordered, append-only message history for one chat session.
///
/// The system prompt is never stored here; the gateway prepends it when it
/// builds a request.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `content` with the current local time and append it.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Message {
        let message = Message::now(role, content);
        self.messages.push(message.clone());
        message
    }

    /// Append an already-built message, keeping whatever timestamp it carries.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Latest user turn, skipping any assistant replies after it.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role() == Role::User)
    }

    pub fn can_export(&self) -> bool {
        !self.is_empty()
    }

    /// Plain-text transcript, or `None` when there is nothing to export.
    pub fn export(&self) -> Option<String> {
        if !self.can_export() {
            return None;
        }

        let mut blocks = Vec::with_capacity(self.messages.len() + 1);
        blocks.push(export::HEADER.to_string());
        blocks.extend(self.messages.iter().map(render_block));
        Some(blocks.join("\n\n"))
    }
}

fn display_label(role: Role) -> &'static str {
    match role {
        Role::User => export::USER_LABEL,
        _ => export::BOT_LABEL,
    }
}

fn render_block(message: &Message) -> String {
    let ts = message
        .timestamp()
        .map(|t| format!(" [{}]", t.format(export::TIMESTAMP_FORMAT)))
        .unwrap_or_default();
    format!("{}{}: {}", display_label(message.role()), ts, message.content())
}
