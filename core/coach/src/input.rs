//! 成績データの読み込み（インライン引数 / ファイル / stdin）

use std::fs;
use std::io::Read;

use coach_common::error::Error;
use coach_common::StudentData;

use crate::cli::Config;

/// Config が指す入力元から StudentData を読む
pub fn read_student_data(config: &Config, stdin: &mut dyn Read) -> Result<StudentData, Error> {
    let text = match (&config.data, &config.file) {
        (Some(_), Some(_)) => {
            return Err(Error::invalid_argument(
                "Give student data either inline or with --file, not both",
            ))
        }
        (Some(inline), None) => inline.clone(),
        (None, _) if config.reads_stdin() => read_all(stdin)?,
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|e| Error::io_msg(format!("Failed to read {:?}: {}", path, e)))?,
        (None, None) => read_all(stdin)?,
    };

    if text.trim().is_empty() {
        return Err(no_data_error());
    }
    StudentData::from_json_str(&text)
}

pub fn no_data_error() -> Error {
    Error::invalid_argument(
        "No student data provided. Pass a JSON object as an argument, with --file, or on stdin.",
    )
}

fn read_all(stdin: &mut dyn Read) -> Result<String, Error> {
    let mut buf = String::new();
    stdin
        .read_to_string(&mut buf)
        .map_err(|e| Error::io_msg(format!("Failed to read stdin: {}", e)))?;
    Ok(buf)
}
