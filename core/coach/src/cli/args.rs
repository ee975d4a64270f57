use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use coach_common::error::Error;
use coach_common::llm::ConfigOverrides;
use std::path::PathBuf;

const BIN_NAME: &str = "coach";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// --dry-run: 送信せずにリクエスト JSON を表示する
    pub dry_run: bool,
    /// -v / --verbose: ログを stderr にも出す
    pub verbose: bool,
    /// -f / --file: 成績データ JSON のパス（"-" は stdin）
    pub file: Option<PathBuf>,
    /// 位置引数で渡されたインライン JSON
    pub data: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    /// --config: 設定ファイル（JSON）
    pub config_path: Option<PathBuf>,
    /// --log-file: JSONL ログの出力先
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// CLI レイヤーの上書き値
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key_env: self.api_key_env.clone(),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
            ..Default::default()
        }
    }

    /// 入力を stdin から読むか
    pub fn reads_stdin(&self) -> bool {
        match (&self.data, &self.file) {
            (None, None) => true,
            (None, Some(p)) => p.as_os_str() == "-",
            _ => false,
        }
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .about("Generate coaching feedback for a student's performance data via an LLM")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("file")
                .short('f')
                .long("file")
                .value_name("path")
                .help("Read student data (JSON object) from a file; '-' reads stdin")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Model name (default: mistralai/mistral-7b-instruct)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("base-url")
                .long("base-url")
                .value_name("url")
                .help("Chat completions base URL (default: https://openrouter.ai/api/v1)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("api-key-env")
                .long("api-key-env")
                .value_name("name")
                .help("Environment variable holding the API key (default: OPENROUTER_API_KEY)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("temperature")
                .short('t')
                .long("temperature")
                .value_name("value")
                .help("Sampling temperature (omitted from the request when not set)")
                .value_parser(value_parser!(f32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("timeout")
                .long("timeout")
                .value_name("secs")
                .help("Request timeout in seconds (default: none)")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("config")
                .long("config")
                .value_name("path")
                .help("JSON config file (also $COACH_CONFIG)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("log-file")
                .long("log-file")
                .value_name("path")
                .help("Append JSONL logs to this file (also $COACH_LOG_FILE)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Print the request payload instead of sending it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Echo log records to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("data")
                .index(1)
                .value_name("DATA_JSON")
                .help("Student data as an inline JSON object")
                .num_args(1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        dry_run: matches.get_flag("dry-run"),
        verbose: matches.get_flag("verbose"),
        file: matches.get_one::<PathBuf>("file").cloned(),
        data: matches.get_one::<String>("data").cloned(),
        model: matches.get_one::<String>("model").cloned(),
        base_url: matches.get_one::<String>("base-url").cloned(),
        api_key_env: matches.get_one::<String>("api-key-env").cloned(),
        temperature: matches.get_one::<f32>("temperature").copied(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        config_path: matches.get_one::<PathBuf>("config").cloned(),
        log_file: matches.get_one::<PathBuf>("log-file").cloned(),
    }
}

fn outcome_from(matches: clap::ArgMatches) -> ParseOutcome {
    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return ParseOutcome::GenerateCompletion(shell);
    }
    ParseOutcome::Config(matches_to_config(&matches))
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::cli(e.to_string()))?;
    Ok(outcome_from(matches))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[&str]) -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::cli(e.to_string()))?;
    Ok(outcome_from(matches))
}

/// ヘルプ文
pub fn help_text() -> String {
    let mut cmd = build_clap_command();
    let mut text = cmd.render_help().to_string();
    text.push_str(
        "\nEnvironment:\n  \
         OPENROUTER_API_KEY  API key (name configurable with --api-key-env)\n  \
         COACH_CONFIG        JSON config file\n  \
         COACH_BASE_URL      Base URL override\n  \
         COACH_MODEL         Model override\n  \
         COACH_LOG_FILE      JSONL log file\n\
         \nA .env file in the current directory is loaded first.\n\
         \nExamples:\n  \
         coach '{\"studyHours\": 3, \"sleepHours\": 6, \"previousGrade\": 72}'\n  \
         coach -f student.json -m openai/gpt-4o-mini\n  \
         cat student.json | coach --dry-run\n",
    );
    text
}

pub fn print_usage() {
    eprintln!("Usage: coach [options] [DATA_JSON]");
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
}
