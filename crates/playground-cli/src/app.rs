use anyhow::{bail, Result};
use playground_core::{Conversation, PlaygroundError, Settings};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::session::{render_message, ChatSession, SessionEvent};

// ── Single prompt mode ──────────────────────────────────────────────────

pub async fn run_single_prompt(settings: &Settings, token: &str, prompt: &str) -> Result<()> {
    let gateway = settings.build_gateway()?;
    let options = settings.turn_options();
    let mut conversation = Conversation::new();

    match gateway.send(&mut conversation, prompt, &options, token).await {
        Ok(reply) => {
            if reply.is_degraded() {
                tracing::warn!(outcome = ?reply.outcome, "reply did not come from chat completion");
            }
            println!("{}", reply.text);
            Ok(())
        }
        Err(PlaygroundError::MissingCredential) => {
            bail!("Please provide your Hugging Face token (--token or HF_TOKEN) to continue.")
        }
        Err(e) => Err(e.into()),
    }
}

// ── Interactive session ─────────────────────────────────────────────────

pub async fn run_interactive(settings: Settings, token: String) -> Result<()> {
    let gateway = settings.build_gateway()?;
    let mut session = ChatSession::new(gateway, &settings, token);

    println!(
        "LLM Playground ({}, max {} tokens). Type /help for commands.",
        session.options().model,
        session.options().max_tokens
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        // The turn completes before the next line is read.
        match session.handle_input(&line).await? {
            SessionEvent::Reply { message, degraded } => {
                if degraded {
                    eprintln!("[degraded reply]");
                }
                println!("{}\n", render_message(&message));
            }
            SessionEvent::Notice(text) => println!("{text}\n"),
            SessionEvent::Warning(text) => eprintln!("Warning: {text}\n"),
            SessionEvent::Cleared => println!("Chat cleared.\n"),
            SessionEvent::Quit => break,
            SessionEvent::Ignored => {}
        }
    }

    Ok(())
}
