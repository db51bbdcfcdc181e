pub mod ai;
pub mod anthropic;
pub mod diff;
pub mod gemini;
pub mod github;
pub mod openai;
