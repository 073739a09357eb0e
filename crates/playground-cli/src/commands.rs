/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Clear the chat.
    Clear,
    /// Quit the application.
    Quit,
    /// Export the conversation, optionally to a given path.
    Export(Option<String>),
    /// Change the model.
    ModelChanged(String),
    /// List selectable models.
    ListModels,
    /// Change the max-token budget.
    MaxTokensChanged(u32),
    /// Print the conversation so far.
    ShowHistory,
    /// Show model, token budget and message count.
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let parts: Vec<&str> = input.trim().splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/clear" => CommandResult::Clear,

        "/export" => {
            if arg.is_empty() {
                CommandResult::Export(None)
            } else {
                CommandResult::Export(Some(arg.to_string()))
            }
        }
        "/history" => CommandResult::ShowHistory,
        "/status" => CommandResult::ShowStatus,

        "/model" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /model <model-id>  (see /models)".into())
            } else {
                CommandResult::ModelChanged(arg.to_string())
            }
        }
        "/models" => CommandResult::ListModels,
        "/max-tokens" | "/tokens" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /max-tokens <128-1024>".into())
            } else {
                match arg.parse::<u32>() {
                    Ok(n) => CommandResult::MaxTokensChanged(n),
                    Err(_) => CommandResult::Message(format!(
                        "Invalid token count: {arg}. Usage: /max-tokens <128-1024>"
                    )),
                }
            }
        }
        "/version" => CommandResult::Message(format!(
            "LLM Playground v{}",
            env!("CARGO_PKG_VERSION")
        )),

        _ => {
            if cmd.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
LLM Playground commands

  CHAT
    /clear                    Clear chat history
    /history                  Show the conversation so far
    /export [file]            Save the conversation as text (default conversation.txt)

  MODEL
    /model <id>               Change model
    /models                   List selectable models
    /max-tokens <n>           Set the reply budget (128-1024)
    /status                   Show model, budget and message count

  OTHER
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit";

    CommandResult::Message(help_text.into())
}
