//! CLI（引数解析・ヘルプ・補完）

mod args;

pub use args::{help_text, parse_args, print_completion, print_usage, Config, ParseOutcome};

#[cfg(test)]
pub use args::parse_args_from;
