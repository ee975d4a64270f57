//! 配線: 標準アダプタで App を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use coach_common::adapter::{FileJsonLog, NoopLog, StderrLog, StdEnvResolver, TeeLog};
use coach_common::error::Error;
use coach_common::llm::config::ENV_CONFIG;
use coach_common::llm::{ConfigOverrides, ProviderConfig};
use coach_common::ports::outbound::{EnvResolver, Log};

use crate::cli::Config;

/// JSONL ログファイルのパスを指す環境変数
pub const ENV_LOG_FILE: &str = "COACH_LOG_FILE";

/// 起動時に一度だけ組み立てる依存一式
pub struct App {
    pub env: Arc<dyn EnvResolver>,
    pub logger: Arc<dyn Log>,
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_coach(config: &Config) -> App {
    let env: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger = build_logger(config, env.as_ref());
    App { env, logger }
}

/// --log-file / COACH_LOG_FILE と -v から Log を組み立てる
pub fn build_logger(config: &Config, env: &dyn EnvResolver) -> Arc<dyn Log> {
    let mut logs: Vec<Arc<dyn Log>> = Vec::new();
    let log_file = config
        .log_file
        .clone()
        .or_else(|| env.var(ENV_LOG_FILE).map(PathBuf::from));
    if let Some(path) = log_file {
        logs.push(Arc::new(FileJsonLog::new(path)));
    }
    if config.verbose {
        logs.push(Arc::new(StderrLog));
    }
    match logs.len() {
        0 => Arc::new(NoopLog),
        1 => logs.swap_remove(0),
        _ => Arc::new(TeeLog::new(logs)),
    }
}

/// 既定値 → 設定ファイル → 環境変数 → CLI の順に ProviderConfig を解決する
pub fn resolve_provider_config(
    config: &Config,
    env: &dyn EnvResolver,
) -> Result<ProviderConfig, Error> {
    let mut resolved = ProviderConfig::default();
    let config_path = config
        .config_path
        .clone()
        .or_else(|| env.var(ENV_CONFIG).map(PathBuf::from));
    if let Some(path) = config_path {
        resolved.apply(ConfigOverrides::load(&path)?);
    }
    resolved.apply(ConfigOverrides::from_env(env));
    resolved.apply(config.overrides());
    Ok(resolved)
}
