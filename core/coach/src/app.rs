//! ユースケース: 成績データを読み、フィードバックを生成して出力する

use std::io::{Read, Write};

use coach_common::error::Error;
use coach_common::llm::{chat_completions_payload, LlmProvider, OpenAiCompatProvider};
use coach_common::ports::outbound::{LogLevel, LogRecord};
use coach_common::prompt::build_messages;
use coach_common::{FeedbackGenerator, StudentData};

use crate::cli::{help_text, Config};
use crate::input::read_student_data;
use crate::wiring::{resolve_provider_config, App};

/// lifecycle ログで包んで run する
pub fn run_logged(
    config: Config,
    app: &App,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<i32, Error> {
    let command = command_name(&config);
    let _ = app.logger.log(
        &LogRecord::new(LogLevel::Info, "command started")
            .layer("cli")
            .kind("lifecycle")
            .field("command", command),
    );
    let result = run(config, app, stdin, out);
    let code = match &result {
        Ok(code) => *code,
        Err(e) => e.exit_code(),
    };
    let _ = app.logger.log(
        &LogRecord::new(LogLevel::Info, "command finished")
            .layer("cli")
            .kind("lifecycle")
            .field("command", command)
            .field("exit_code", code),
    );
    if let Err(ref e) = result {
        let _ = app.logger.log(
            &LogRecord::new(LogLevel::Error, e.to_string())
                .layer("cli")
                .kind("error"),
        );
    }
    result
}

fn command_name(config: &Config) -> &'static str {
    if config.help {
        "help"
    } else if config.dry_run {
        "dry-run"
    } else {
        "feedback"
    }
}

/// Config に従って 1 回分の処理を行い、終了コードを返す
pub fn run(
    config: Config,
    app: &App,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<i32, Error> {
    if config.help {
        write!(out, "{}", help_text())?;
        return Ok(0);
    }

    let provider_config = resolve_provider_config(&config, app.env.as_ref())?;
    let data = read_student_data(&config, stdin)?;

    if config.dry_run {
        // 認証情報は読まず、ネットワークにも触れない
        let payload = chat_completions_payload(
            &provider_config.model,
            provider_config.temperature,
            &build_messages(&data),
        );
        writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(0);
    }

    let provider = OpenAiCompatProvider::new(&provider_config, app.env.as_ref())?;
    let generator = FeedbackGenerator::new(provider, app.logger.clone());
    write_feedback(&generator, &data, out)
}

/// 生成したテキストを無加工で出力する
pub fn write_feedback<P: LlmProvider>(
    generator: &FeedbackGenerator<P>,
    data: &StudentData,
    out: &mut dyn Write,
) -> Result<i32, Error> {
    let text = generator.generate(data)?;
    writeln!(out, "{}", text)?;
    out.flush()?;
    Ok(0)
}
