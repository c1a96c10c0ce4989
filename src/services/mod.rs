pub mod feedback;
pub mod gemini;
pub mod livekit;
pub mod pdf;
pub mod question_generator;
pub mod question_pool;

pub use gemini::{AiError, GeminiClient};
