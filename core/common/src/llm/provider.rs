//! LLMプロバイダのトレイト定義

use crate::domain::ModelName;
use crate::error::Error;
use serde::Serialize;
use serde_json::Value;

/// LLMプロバイダのトレイト
///
/// 実装は OpenAI Chat Completions 互換プロバイダ 1 つのみ。
/// テストではスタブ実装に差し替える。
pub trait LlmProvider {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// リクエストに使うモデル名
    fn model(&self) -> &ModelName;

    /// リクエストペイロードを生成
    ///
    /// # Arguments
    /// * `messages` - 送信するメッセージ列（system / user）
    ///
    /// # Returns
    /// * `Ok(Value)` - リクエストJSON
    /// * `Err(Error)` - エラー
    fn make_request_payload(&self, messages: &[Message]) -> Result<Value, Error>;

    /// HTTPリクエストを実行してレスポンスを取得
    ///
    /// # Arguments
    /// * `request_json` - リクエストJSON文字列
    ///
    /// # Returns
    /// * `Ok(String)` - レスポンスJSON文字列
    /// * `Err(Error)` - 通信エラー・非 2xx ステータス
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンスから最初の choice のテキストを抽出
    ///
    /// # Returns
    /// * `Ok(Some(String))` - 抽出したテキスト（無加工）
    /// * `Ok(None)` - choice はあるが content が null
    /// * `Err(Error)` - JSON 不正・choices が空など
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;
}

/// メッセージ構造体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}
