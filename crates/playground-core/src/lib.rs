pub mod error;
pub mod constants;
pub mod llm;
pub mod context;
pub mod gateway;
pub mod config;

// Re-export key types
pub use error::PlaygroundError;
pub use llm::{
    CompletionRequest, Credential, GenerationRequest, HuggingFaceClient, InferenceBackend,
    Message, Role,
};
pub use context::Conversation;
pub use gateway::{CompletionGateway, Reply, TurnOptions, TurnOutcome};
pub use config::Settings;
