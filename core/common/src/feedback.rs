//! フィードバック生成
//!
//! 成績データ → プロンプト → 1 回の同期 LLM 呼び出し → 最初の choice のテキストをそのまま返す。
//! 返り値は JSON であることを期待するが、ここでは検証しない。

use std::sync::Arc;
use std::time::Instant;

use crate::domain::StudentData;
use crate::error::Error;
use crate::llm::driver::LlmDriver;
use crate::llm::provider::LlmProvider;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use crate::prompt::build_messages;

/// フィードバック生成器
///
/// 起動時に一度だけ組み立て、呼び出し側へ明示的に渡す。呼び出し間で状態を持たない。
pub struct FeedbackGenerator<P: LlmProvider> {
    driver: LlmDriver<P>,
    logger: Arc<dyn Log>,
}

impl<P: LlmProvider> FeedbackGenerator<P> {
    pub fn new(provider: P, logger: Arc<dyn Log>) -> Self {
        Self {
            driver: LlmDriver::new(provider),
            logger,
        }
    }

    /// 成績データからフィードバック文を生成する
    ///
    /// エラーはログに記録したうえでそのまま返す。
    pub fn generate(&self, data: &StudentData) -> Result<String, Error> {
        let provider = self.driver.provider();
        let messages = build_messages(data);
        self.log(
            LogRecord::new(LogLevel::Info, "feedback request started")
                .field("provider", provider.name())
                .field("model", provider.model().as_str())
                .field("fields", data.len()),
        );

        let started = Instant::now();
        let result = self.driver.chat(&messages);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(text) => self.log(
                LogRecord::new(LogLevel::Info, "feedback request finished")
                    .field("model", provider.model().as_str())
                    .field("elapsed_ms", elapsed_ms)
                    .field("response_len", text.len()),
            ),
            Err(e) => self.log(
                LogRecord::new(LogLevel::Error, "feedback request failed")
                    .kind("error")
                    .field("model", provider.model().as_str())
                    .field("elapsed_ms", elapsed_ms)
                    .field("error", e.to_string())
                    .field("exit_code", e.exit_code()),
            ),
        }
        result
    }

    /// 送信されるリクエスト JSON（送信はしない）
    pub fn request_json(&self, data: &StudentData) -> Result<String, Error> {
        self.driver.request_json(&build_messages(data))
    }

    pub fn provider(&self) -> &P {
        self.driver.provider()
    }

    // ログ書き込みの失敗は結果に影響させない
    fn log(&self, record: LogRecord) {
        let record = match record.kind {
            Some(_) => record,
            None => record.kind("llm"),
        };
        let _ = self.logger.log(&record.layer("usecase"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::NoopLog;
    use crate::domain::ModelName;
    use crate::llm::provider::Message;
    use crate::prompt::SYSTEM_PROMPT;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::sync::Mutex;

    /// 送信内容を記録し、固定レスポンスを返すスタブ
    struct StubProvider {
        model: ModelName,
        response: Result<String, Error>,
        sent: RefCell<Vec<String>>,
    }

    impl StubProvider {
        fn returning(body: Value) -> Self {
            Self {
                model: ModelName::new("stub-model"),
                response: Ok(body.to_string()),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn failing(err: Error) -> Self {
            Self {
                model: ModelName::new("stub-model"),
                response: Err(err),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn last_messages(&self) -> Vec<Value> {
            let sent = self.sent.borrow();
            let v: Value = serde_json::from_str(sent.last().unwrap()).unwrap();
            v["messages"].as_array().unwrap().clone()
        }
    }

    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &ModelName {
            &self.model
        }

        fn make_request_payload(&self, messages: &[Message]) -> Result<Value, Error> {
            Ok(json!({ "model": self.model.as_str(), "messages": messages }))
        }

        fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
            self.sent.borrow_mut().push(request_json.to_string());
            self.response.clone()
        }

        fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
            let v: Value = serde_json::from_str(response_json)?;
            let first = v["choices"]
                .as_array()
                .and_then(|c| c.first())
                .ok_or_else(|| Error::no_completion("no choices"))?;
            Ok(first["message"]["content"].as_str().map(|s| s.to_string()))
        }
    }

    struct RecordingLog {
        records: Mutex<Vec<LogRecord>>,
    }

    impl Log for RecordingLog {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    fn student() -> StudentData {
        StudentData::from_json_str(
            r#"{"studyHours": 3, "socialMediaTime": 5, "physicalActivity": 1, "sleepHours": 6, "previousGrade": 68}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_generate_returns_first_choice_verbatim() {
        let raw = "```json\n{\"feedback\": [{\"title\": \"Sleep\", \"score\": 60}]}\n```\n";
        let generator = FeedbackGenerator::new(StubProvider::returning(completion(raw)), Arc::new(NoopLog));
        assert_eq!(generator.generate(&student()).unwrap(), raw);
    }

    #[test]
    fn test_generate_sends_system_and_user_messages() {
        let data = student();
        let generator = FeedbackGenerator::new(StubProvider::returning(completion("ok")), Arc::new(NoopLog));
        generator.generate(&data).unwrap();

        let messages = generator.provider().last_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_PROMPT);
        assert_eq!(messages[1]["role"], "user");
        assert!(messages[1]["content"]
            .as_str()
            .unwrap()
            .contains(&data.to_string()));
    }

    #[test]
    fn test_generate_is_deterministic_against_stub() {
        let generator = FeedbackGenerator::new(StubProvider::returning(completion("same")), Arc::new(NoopLog));
        let data = student();
        let first = generator.generate(&data).unwrap();
        let second = generator.generate(&data).unwrap();
        assert_eq!(first, second);
        let sent = generator.provider().sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
    }

    #[test]
    fn test_generate_zero_choices_is_error() {
        let generator = FeedbackGenerator::new(
            StubProvider::returning(json!({ "choices": [] })),
            Arc::new(NoopLog),
        );
        let err = generator.generate(&student()).unwrap_err();
        assert!(matches!(err, Error::NoCompletion(_)));
    }

    #[test]
    fn test_generate_null_content_is_error() {
        let generator = FeedbackGenerator::new(
            StubProvider::returning(json!({ "choices": [{ "message": { "content": null } }] })),
            Arc::new(NoopLog),
        );
        assert!(generator.generate(&student()).is_err());
    }

    #[test]
    fn test_generate_propagates_http_error_and_logs_it() {
        let log = Arc::new(RecordingLog {
            records: Mutex::new(Vec::new()),
        });
        let generator = FeedbackGenerator::new(
            StubProvider::failing(Error::http("HTTP request failed: connection refused")),
            log.clone(),
        );
        let err = generator.generate(&student()).unwrap_err();
        assert_eq!(err, Error::http("HTTP request failed: connection refused"));

        let records = log.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "feedback request started");
        assert_eq!(records[0].kind.as_deref(), Some("llm"));
        assert_eq!(records[1].level, LogLevel::Error);
        assert_eq!(records[1].kind.as_deref(), Some("error"));
        let fields = records[1].fields.as_ref().unwrap();
        assert_eq!(fields["error"], "HTTP request failed: connection refused");
        assert_eq!(fields["exit_code"], 74);
    }

    #[test]
    fn test_request_json_does_not_send() {
        let generator = FeedbackGenerator::new(StubProvider::returning(completion("x")), Arc::new(NoopLog));
        let s = generator.request_json(&student()).unwrap();
        assert!(s.contains("stub-model"));
        assert!(generator.provider().sent.borrow().is_empty());
    }
}
