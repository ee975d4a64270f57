//! LLMドライバーの実装
//!
//! プロバイダに依存しない共通処理（ペイロード生成 → HTTP → テキスト抽出）を提供します。

use crate::error::Error;
use crate::llm::provider::{LlmProvider, Message};

/// LLMドライバー
pub struct LlmDriver<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmDriver<P> {
    /// 新しいドライバーを作成
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// メッセージ列を送信して最初の choice のテキストを取得
    ///
    /// リトライ・既定値へのフォールバックは行わない。
    pub fn chat(&self, messages: &[Message]) -> Result<String, Error> {
        let request_json = self.request_json(messages)?;
        let response_json = self.provider.make_http_request(&request_json)?;
        self.provider
            .parse_response_text(&response_json)?
            .ok_or_else(|| Error::no_completion("No text in first completion choice"))
    }

    /// 送信するリクエスト JSON 文字列
    pub fn request_json(&self, messages: &[Message]) -> Result<String, Error> {
        let payload = self.provider.make_request_payload(messages)?;
        serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))
    }

    /// プロバイダを取得
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
