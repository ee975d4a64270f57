//! 人間向けログ（LogRecord → stderr へ 1 行で出力）
//!
//! -v / --verbose 指定時のみ配線される。fields は要点のみ（巨大化防止）。

use crate::error::Error;
use crate::ports::outbound::{Log, LogRecord};

const FIELDS_SUMMARY_MAX: usize = 400;

/// fields を短い文字列にする
fn fields_summary(record: &LogRecord) -> String {
    let fields = match &record.fields {
        Some(f) if !f.is_empty() => f,
        _ => return String::new(),
    };
    let s = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    if s.len() <= FIELDS_SUMMARY_MAX {
        return s;
    }
    let truncated = s.chars().take(FIELDS_SUMMARY_MAX).collect::<String>();
    format!("{}... (len={})", truncated, s.len())
}

/// 1 レコードを人間向けの 1 行に整形する
pub fn format_line(record: &LogRecord) -> String {
    let mut line = format!("[{}] {}", record.level.as_str(), record.message);
    if let Some(kind) = &record.kind {
        line.push_str(&format!(" ({})", kind));
    }
    let summary = fields_summary(record);
    if !summary.is_empty() {
        line.push(' ');
        line.push_str(&summary);
    }
    line
}

/// stderr へ出力する Log 実装
#[derive(Debug, Clone, Default)]
pub struct StderrLog;

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        eprintln!("{}", format_line(record));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::LogLevel;

    #[test]
    fn test_format_line_with_kind_and_fields() {
        let rec = LogRecord::new(LogLevel::Info, "feedback request finished")
            .kind("llm")
            .field("elapsed_ms", 120);
        assert_eq!(
            format_line(&rec),
            "[info] feedback request finished (llm) elapsed_ms=120"
        );
    }

    #[test]
    fn test_format_line_plain() {
        let rec = LogRecord::new(LogLevel::Error, "boom");
        assert_eq!(format_line(&rec), "[error] boom");
    }

    #[test]
    fn test_format_line_truncates_large_fields() {
        let rec = LogRecord::new(LogLevel::Debug, "payload").field("body", "x".repeat(1000));
        let line = format_line(&rec);
        assert!(line.contains("... (len="));
        assert!(line.len() < 600);
    }
}
