//! アダプター（外界の I/O を trait で抽象化）
//!
//! usecase は ports の trait 経由でのみ環境変数・ログに触れる。
//! 実装は標準実装（Std*）やテスト用の固定値実装を注入する。

pub mod file_json_log;
pub mod human_log;
pub mod std_env_resolver;

pub use file_json_log::{FileJsonLog, NoopLog, TeeLog};
pub use human_log::StderrLog;
pub use std_env_resolver::{StaticEnvResolver, StdEnvResolver};
