mod app;
mod cli;
mod input;
mod wiring;


use std::io::{self, IsTerminal};
use std::process;

use cli::{parse_args, print_completion, print_usage, ParseOutcome};
use coach_common::error::Error;
use wiring::wire_coach;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            match &e {
                // clap の出力は Usage 込みで整形済み
                Error::Cli(msg) => eprint!("{}", msg),
                _ => {
                    if e.is_usage() {
                        print_usage();
                    }
                    eprintln!("coach: {}", e);
                }
            }
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    // .env は無くてもよい
    let _ = dotenvy::dotenv();

    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };

    // 端末から対話的に JSON を待たない
    if !config.help && config.reads_stdin() && io::stdin().is_terminal() {
        return Err(input::no_data_error());
    }

    let app = wire_coach(&config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    app::run_logged(config, &app, &mut stdin.lock(), &mut stdout.lock())
}
