//! Program Reader: turns program text into an ordered list of commands.
//!
//! One command per line. The first whitespace-separated token is the
//! verb, the remaining tokens are operands. Blank lines and lines whose
//! first token starts with `#` are skipped; there are no inline comments.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::cli::Settings;
use crate::error::{DslError, Result};
use crate::model::Command;

/// Read a program from `path`, falling back to `<input_dir>/<path>`.
pub fn read_program(path: &Path, settings: &Settings) -> Result<Vec<Command>> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let fallback = settings.input_dir.join(path);
            debug!(
                path = %path.display(),
                fallback = %fallback.display(),
                "program not found, trying input directory"
            );
            match fs::read_to_string(&fallback) {
                Ok(source) => source,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(DslError::SourceNotFound {
                        path: path.to_path_buf(),
                        fallback,
                    });
                }
                Err(error) => {
                    return Err(DslError::SourceRead {
                        path: fallback,
                        error,
                    });
                }
            }
        }
        Err(error) => {
            return Err(DslError::SourceRead {
                path: path.to_path_buf(),
                error,
            });
        }
    };

    let commands = parse_program(&source)?;
    debug!(commands = commands.len(), "program parsed");
    Ok(commands)
}

/// Split program text into commands, in source order.
pub fn parse_program(source: &str) -> Result<Vec<Command>> {
    let commands: Vec<Command> = source.lines().filter_map(parse_line).collect();

    if commands.is_empty() {
        return Err(DslError::EmptyProgram);
    }
    Ok(commands)
}

fn parse_line(line: &str) -> Option<Command> {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next()?;
    if verb.starts_with('#') {
        return None;
    }
    Some(Command {
        verb: verb.to_string(),
        operands: tokens.map(str::to_string).collect(),
    })
}
