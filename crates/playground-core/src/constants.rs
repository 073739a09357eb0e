/// LLM Playground — centralized constants.
/// Model ids, endpoints, limits and prompt text live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const MISTRAL_7B_INSTRUCT_V02: &str = "mistralai/Mistral-7B-Instruct-v0.2";
    pub const MISTRAL_7B_INSTRUCT_V01: &str = "mistralai/Mistral-7B-Instruct-v0.1";

    /// Models offered for selection, in display order.
    pub const SELECTABLE: &[&str] = &[MISTRAL_7B_INSTRUCT_V02, MISTRAL_7B_INSTRUCT_V01];
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const HF_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const MODEL: &str = super::models::MISTRAL_7B_INSTRUCT_V02;
    pub const TOKEN_ENV: &str = "HF_TOKEN";
    pub const MAX_TOKENS: u32 = 512;
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    pub const SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable assistant.";
    pub const EXPORT_FILE_NAME: &str = "conversation.txt";
}

// ─── Limits ───────────────────────────────────────────────────────────────────

pub mod limits {
    pub const MIN_MAX_TOKENS: u32 = 128;
    pub const MAX_MAX_TOKENS: u32 = 1024;
    pub const MAX_TOKENS_STEP: u32 = 64;
}

// ─── Fallback Generation ──────────────────────────────────────────────────────

pub mod fallback {
    /// Sampling temperature for the raw text-generation call.
    pub const TEMPERATURE: f32 = 0.7;
    pub const DO_SAMPLE: bool = true;
    pub const INSTRUCTION_OPEN: &str = "<s>[INST] ";
    pub const INSTRUCTION_CLOSE: &str = " [/INST]";
}

// ─── Export ───────────────────────────────────────────────────────────────────

pub mod export {
    /// Header block; its trailing newline leaves an extra blank line before the first message.
    pub const HEADER: &str = "🧠 LLM Playground conversation export\n";
    pub const USER_LABEL: &str = "You";
    pub const BOT_LABEL: &str = "Bot";
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}
