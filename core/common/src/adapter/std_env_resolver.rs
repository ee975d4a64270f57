//! 標準環境変数解決実装（std::env を委譲）

use crate::ports::outbound::EnvResolver;
use std::collections::HashMap;
use std::env;

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|s| !s.is_empty())
    }
}

/// 固定の値を返す環境変数解決実装（テストや埋め込み用）
#[derive(Debug, Clone, Default)]
pub struct StaticEnvResolver {
    vars: HashMap<String, String>,
}

impl StaticEnvResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvResolver for StaticEnvResolver {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).filter(|s| !s.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_env_resolver() {
        let env = StaticEnvResolver::new()
            .with("OPENROUTER_API_KEY", "sk-test")
            .with("EMPTY", "");
        assert_eq!(env.var("OPENROUTER_API_KEY").as_deref(), Some("sk-test"));
        assert_eq!(env.var("EMPTY"), None);
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn test_std_env_resolver_missing_var() {
        let env = StdEnvResolver;
        assert_eq!(env.var("COACH_TEST_SURELY_UNSET_VARIABLE_9F3A"), None);
    }
}
