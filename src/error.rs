//! Error taxonomy for reading and interpreting traffic programs.

use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

use crate::processor::verbs::Verb;

pub type Result<T, E = DslError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DslError {
    /// Program missing at the literal path and under the input directory.
    #[error("Cannot open file: {} (also tried {})", path.display(), fallback.display())]
    SourceNotFound { path: PathBuf, fallback: PathBuf },

    #[error("Cannot read file {}: {error}", path.display())]
    SourceRead { path: PathBuf, error: io::Error },

    #[error("No valid commands in file")]
    EmptyProgram,

    #[error("{verb} requires {expected}")]
    MissingOperand { verb: Verb, expected: &'static str },

    #[error("{verb}: invalid number `{text}` ({error})")]
    InvalidNumber {
        verb: Verb,
        text: String,
        error: ParseFloatError,
    },

    #[error("{verb}: {reason}")]
    InvalidOperand { verb: Verb, reason: String },

    /// A command ran before the state it depends on was computed.
    #[error("{verb}: {missing}")]
    Precedence { verb: Verb, missing: &'static str },

    #[error("Cannot write {}: {error}", path.display())]
    Export { path: PathBuf, error: io::Error },

    #[error("Cannot write report: {0}")]
    Report(io::Error),

    #[error("Line {line}: {kind}")]
    AtLine { line: usize, kind: Box<DslError> },
}

impl DslError {
    pub fn at_line(self, line: usize) -> Self {
        DslError::AtLine {
            line,
            kind: Box::new(self),
        }
    }

    /// Line number of the failing command, if the error carries one.
    pub fn line(&self) -> Option<usize> {
        match self {
            DslError::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The error with any line attribution peeled off.
    pub fn kind(&self) -> &DslError {
        match self {
            DslError::AtLine { kind, .. } => kind.kind(),
            other => other,
        }
    }
}
