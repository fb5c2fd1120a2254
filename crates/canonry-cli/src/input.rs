//! Input reading helpers.

use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

/// Errors raised while reading CLI input.
#[derive(Error, Debug)]
pub enum InputError {
    /// File or stdin could not be read.
    #[error("failed to read {source_name}: {source}")]
    Io {
        /// File path, or `stdin`.
        source_name: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Input is not valid JSON.
    #[error("invalid JSON on line {line}: {source}")]
    InvalidJson {
        /// 1-based line number (1 for whole-document input).
        line: usize,
        /// Parser error.
        source: serde_json::Error,
    },
}

/// Reads a file, or stdin when `path` is absent or `-`.
pub fn read_text(path: Option<&str>) -> Result<String, InputError> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).map_err(|source| InputError::Io {
                source_name: path.to_string(),
                source,
            })
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| InputError::Io {
                    source_name: "stdin".to_string(),
                    source,
                })?;
            Ok(buffer)
        }
    }
}

/// Parses a whole document as one JSON value.
pub fn parse_document(text: &str) -> Result<Value, InputError> {
    serde_json::from_str(text).map_err(|source| InputError::InvalidJson { line: 1, source })
}

/// Parses JSON Lines, skipping blank lines. Yields `(line_number, value)`.
pub fn parse_lines(text: &str) -> Result<Vec<(usize, Value)>, InputError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map(|value| (idx + 1, value))
                .map_err(|source| InputError::InvalidJson {
                    line: idx + 1,
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped_and_numbered() {
        let parsed = parse_lines("{\"a\":1}\n\n  \n{\"a\":2}\n").unwrap();
        let lines: Vec<usize> = parsed.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![1, 4]);
    }

    #[test]
    fn bad_line_reports_its_number() {
        let err = parse_lines("{\"a\":1}\nnot json\n").unwrap_err();
        assert!(matches!(err, InputError::InvalidJson { line: 2, .. }));
    }
}
