//! プロバイダ設定
//!
//! 既定値 → 設定ファイル（JSON）→ 環境変数 → CLI の順に上書きして ProviderConfig を組み立てる。

use crate::domain::ModelName;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// 設定ファイルのパスを指す環境変数
pub const ENV_CONFIG: &str = "COACH_CONFIG";
pub const ENV_BASE_URL: &str = "COACH_BASE_URL";
pub const ENV_MODEL: &str = "COACH_MODEL";

/// 解決済みのプロバイダ設定
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// API のベース URL（末尾の / は除去済み）
    pub base_url: String,
    pub model: ModelName,
    /// API キーを読む環境変数名
    pub api_key_env: String,
    /// 温度（None のときペイロードに含めない）
    pub temperature: Option<f32>,
    /// リクエストタイムアウト秒（None のときタイムアウトなし）
    pub timeout_secs: Option<u64>,
    /// OpenRouter の HTTP-Referer ヘッダ
    pub referer: Option<String>,
    /// OpenRouter の X-Title ヘッダ
    pub title: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: ModelName::new(DEFAULT_MODEL),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: None,
            timeout_secs: None,
            referer: None,
            title: None,
        }
    }
}

impl ProviderConfig {
    /// 上書き値を適用する（Some のフィールドだけ差し替える）
    pub fn apply(&mut self, o: ConfigOverrides) {
        if let Some(v) = o.base_url {
            self.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = o.model {
            self.model = ModelName::new(v);
        }
        if let Some(v) = o.api_key_env {
            self.api_key_env = v;
        }
        if o.temperature.is_some() {
            self.temperature = o.temperature;
        }
        if o.timeout_secs.is_some() {
            self.timeout_secs = o.timeout_secs;
        }
        if o.referer.is_some() {
            self.referer = o.referer;
        }
        if o.title.is_some() {
            self.title = o.title;
        }
    }

    /// chat completions エンドポイントの URL
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// 1 レイヤー分の上書き値（設定ファイル / 環境変数 / CLI）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    /// `default_model` でも書ける。両方あるファイルは duplicate field で失敗する
    #[serde(alias = "default_model")]
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub referer: Option<String>,
    pub title: Option<String>,
}

impl ConfigOverrides {
    /// JSON 文字列からパース（未知のキーは無視）
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 設定ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io_msg(format!("Failed to read config {:?}: {}", path, e)))?;
        Self::parse(&text)
            .map_err(|e| Error::json(format!("Invalid config {:?}: {}", path, e)))
    }

    /// COACH_BASE_URL / COACH_MODEL を読む
    pub fn from_env(env: &dyn EnvResolver) -> Self {
        Self {
            base_url: env.var(ENV_BASE_URL),
            model: env.var(ENV_MODEL),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StaticEnvResolver;

    #[test]
    fn test_default_config() {
        let cfg = ProviderConfig::default();
        assert_eq!(cfg.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(cfg.model.as_str(), "mistralai/mistral-7b-instruct");
        assert_eq!(cfg.api_key_env, "OPENROUTER_API_KEY");
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.timeout_secs, None);
        assert_eq!(
            cfg.chat_completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_empty_object() {
        let o = ConfigOverrides::parse("{}").unwrap();
        assert_eq!(o, ConfigOverrides::default());
    }

    #[test]
    fn test_parse_model_and_alias_together_fails() {
        let err = ConfigOverrides::parse(r#"{"model": "a", "default_model": "b"}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate field `model`"));
    }

    #[test]
    fn test_parse_all_fields_and_unknown_keys() {
        let json = r#"
        {
            "base_url": "http://localhost:11434/v1/",
            "default_model": "llama3.1",
            "api_key_env": "LOCAL_KEY",
            "temperature": 0.4,
            "timeout_secs": 30,
            "referer": "https://example.edu",
            "title": "Study Coach",
            "unused": true
        }
        "#;
        let o = ConfigOverrides::parse(json).unwrap();
        assert_eq!(o.model.as_deref(), Some("llama3.1"));
        assert_eq!(o.temperature, Some(0.4));

        let mut cfg = ProviderConfig::default();
        cfg.apply(o);
        assert_eq!(cfg.base_url, "http://localhost:11434/v1");
        assert_eq!(cfg.model.as_str(), "llama3.1");
        assert_eq!(cfg.api_key_env, "LOCAL_KEY");
        assert_eq!(cfg.timeout_secs, Some(30));
        assert_eq!(cfg.referer.as_deref(), Some("https://example.edu"));
        assert_eq!(cfg.title.as_deref(), Some("Study Coach"));
        assert_eq!(
            cfg.chat_completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut cfg = ProviderConfig::default();
        cfg.apply(ConfigOverrides {
            temperature: Some(0.2),
            ..Default::default()
        });
        cfg.apply(ConfigOverrides {
            model: Some("openai/gpt-4o-mini".to_string()),
            ..Default::default()
        });
        assert_eq!(cfg.temperature, Some(0.2));
        assert_eq!(cfg.model.as_str(), "openai/gpt-4o-mini");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_env() {
        let env = StaticEnvResolver::new()
            .with(ENV_MODEL, "meta-llama/llama-3-8b-instruct")
            .with(ENV_BASE_URL, "");
        let o = ConfigOverrides::from_env(&env);
        assert_eq!(o.model.as_deref(), Some("meta-llama/llama-3-8b-instruct"));
        assert_eq!(o.base_url, None);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coach.json");
        std::fs::write(&path, r#"{"model": "m1"}"#).unwrap();
        let o = ConfigOverrides::load(&path).unwrap();
        assert_eq!(o.model.as_deref(), Some("m1"));

        std::fs::write(&path, "{ not json").unwrap();
        let err = ConfigOverrides::load(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        let err = ConfigOverrides::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
