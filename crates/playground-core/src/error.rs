use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("No Hugging Face token provided")]
    MissingCredential,

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("No user message found")]
    NoUserMessage,

    #[error("Empty response from text_generation")]
    EmptyGeneration,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlaygroundError {
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
