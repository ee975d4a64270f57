//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。各バリアントは終了コード（sysexits 準拠）を持つ。

/// 引数不正・入力不正
pub const EX_USAGE: i32 = 64;
/// 内部エラー
pub const EX_SOFTWARE: i32 = 70;
/// I/O・通信エラー
pub const EX_IOERR: i32 = 74;

/// エラー型
///
/// 呼び出し側で握りつぶさず、そのまま上位へ伝播させる。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    InvalidArgument(String),
    /// clap が整形済みの引数エラー（使い方の表示を含む）
    #[error("{0}")]
    Cli(String),
    #[error("{0}")]
    Env(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Http(String),
    #[error("{0}")]
    Json(String),
    #[error("{0}")]
    NoCompletion(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn cli(msg: impl Into<String>) -> Self {
        Self::Cli(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn no_completion(msg: impl Into<String>) -> Self {
        Self::NoCompletion(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::Cli(_) | Self::Env(_) => EX_USAGE,
            Self::Io(_) | Self::Http(_) | Self::Json(_) | Self::NoCompletion(_) => EX_IOERR,
            Self::System(_) => EX_SOFTWARE,
        }
    }

    /// 使い方の表示が必要なエラーか（CLI 用）
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
