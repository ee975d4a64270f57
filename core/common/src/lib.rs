//! coach 共通ライブラリ
//!
//! 学生の成績データを LLM に渡してフィードバック文を得る機能を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型
pub mod domain;

/// Ports & Adapters
pub mod ports;
pub mod adapter;

/// LLMドライバーとプロバイダ
pub mod llm;

/// プロンプト組み立て
pub mod prompt;

/// フィードバック生成
pub mod feedback;

pub use domain::StudentData;
pub use error::Error;
pub use feedback::FeedbackGenerator;
