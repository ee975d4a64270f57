//! LLMドライバーとプロバイダの実装
//!
//! OpenAI Chat Completions 互換エンドポイントへの同期呼び出しを提供します。

pub mod config;
pub mod driver;
pub mod openai_compat;
pub mod provider;

pub use config::{ConfigOverrides, ProviderConfig};
pub use driver::LlmDriver;
pub use openai_compat::{chat_completions_payload, OpenAiCompatProvider};
pub use provider::{LlmProvider, Message};
