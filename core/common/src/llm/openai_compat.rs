//! OpenAI Chat Completions 互換 (/chat/completions) プロバイダ
//!
//! 既定は OpenRouter。base_url で任意の互換エンドポイントを指定可能。
//! API キーと HTTP クライアントは生成時に一度だけ用意し、以後の呼び出しで使い回す。

use crate::domain::{ApiKey, ModelName};
use crate::error::Error;
use crate::llm::config::ProviderConfig;
use crate::llm::provider::{LlmProvider, Message};
use crate::ports::outbound::EnvResolver;
use serde_json::{json, Value};
use std::time::Duration;

/// リクエストペイロードを生成する（stream なし）
///
/// temperature が None のときはキー自体を含めない。
pub fn chat_completions_payload(
    model: &ModelName,
    temperature: Option<f32>,
    messages: &[Message],
) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|m| json!({ "role": m.role, "content": m.content }))
        .collect();
    let mut payload = json!({
        "model": model.as_str(),
        "messages": messages,
        "stream": false
    });
    if let Some(t) = temperature {
        payload["temperature"] = json!(t);
    }
    payload
}

/// OpenAI Chat Completions 互換プロバイダ
pub struct OpenAiCompatProvider {
    client: reqwest::blocking::Client,
    url: String,
    model: ModelName,
    api_key: ApiKey,
    temperature: Option<f32>,
    referer: Option<String>,
    title: Option<String>,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `config` - 解決済みの設定
    /// * `env` - `config.api_key_env` の値を読む
    ///
    /// API キーが未設定（空文字含む）の場合はその場で Env エラーを返す。
    pub fn new(config: &ProviderConfig, env: &dyn EnvResolver) -> Result<Self, Error> {
        let api_key = env.var(&config.api_key_env).ok_or_else(|| {
            Error::env(format!(
                "{} environment variable is not set",
                config.api_key_env
            ))
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: config.chat_completions_url(),
            model: config.model.clone(),
            api_key: ApiKey::new(api_key),
            temperature: config.temperature,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// エラーレスポンス本文から人間向けメッセージを取り出す
fn upstream_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    fn model(&self) -> &ModelName {
        &self.model
    }

    fn make_request_payload(&self, messages: &[Message]) -> Result<Value, Error> {
        Ok(chat_completions_payload(
            &self.model,
            self.temperature,
            messages,
        ))
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let mut builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .bearer_auth(self.api_key.expose())
            .body(request_json.to_string());

        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::http(format!(
                "Chat completions error: {}",
                upstream_error_message(status, &response_text)
            )));
        }

        Ok(response_text)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        // "error": null は正常応答として扱う
        if let Some(err) = v.get("error").filter(|e| !e.is_null()) {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("API error: {}", msg)));
        }

        let first = v["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .ok_or_else(|| Error::no_completion("Response contains no completion choices"))?;

        Ok(first["message"]["content"].as_str().map(|s| s.to_string()))
    }
}
