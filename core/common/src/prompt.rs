//! プロンプト組み立て
//!
//! system は固定のコーチ人格、user は成績データの埋め込みと出力形式の指示。

use crate::domain::StudentData;
use crate::llm::provider::Message;

/// system メッセージ（入力によらず不変）
pub const SYSTEM_PROMPT: &str = "You are a helpful educational coach.";

const FORMAT_INSTRUCTIONS: &str = r#"Analyze it and generate feedback categories with scores, status, tips, strengths.
Return JSON format like:
{
  "feedback": [
    {
      "title": "...",
      "score": ...,
      "status": "...",
      "tips": ["..."],
      "strengths": ["..."]
    },
    ...
  ]
}"#;

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// user メッセージ本文
pub fn build_user_prompt(data: &StudentData) -> String {
    format!("The student data is: {}\n{}", data, FORMAT_INSTRUCTIONS)
}

/// [system, user] の 2 メッセージ
pub fn build_messages(data: &StudentData) -> [Message; 2] {
    [
        Message::system(system_prompt()),
        Message::user(build_user_prompt(data)),
    ]
}
