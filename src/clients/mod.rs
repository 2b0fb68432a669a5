pub mod gemini_client;
pub mod llm_client;
pub mod openai_client;

pub use gemini_client::GeminiClient;
pub use llm_client::{client_from_config, GenerationSettings, LlmClient};
pub use openai_client::OpenAiClient;
