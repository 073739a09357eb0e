// Library interface for playground-cli
// This allows integration tests to access internal modules

// NOTE: commands.rs and session.rs are also declared in main.rs, so the
// path attribute points both crates at the same source file.

#[path = "commands.rs"]
pub mod commands;

#[path = "session.rs"]
pub mod session;

pub use commands::{handle_command, CommandResult};
pub use session::{export_to, render_message, ChatSession, SessionEvent};
