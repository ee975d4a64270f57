//! 環境変数解決 Outbound ポート
//!
//! 認証情報や設定の上書き値を環境変数から読む。
//! usecase はこの trait 経由でのみ環境変数にアクセスする。

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `coach_common::adapter::StdEnvResolver` や `StaticEnvResolver`（テスト用）など。
pub trait EnvResolver: Send + Sync {
    /// 環境変数を読む。未設定・空文字は None。
    fn var(&self, name: &str) -> Option<String>;
}
