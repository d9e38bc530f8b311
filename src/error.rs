// src/error.rs
//! Typed failures for the tree build and the command language.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons the selection tree could not be produced.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("directory '{}' does not exist", .0.display())]
    RootMissing(PathBuf),
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    /// Nothing under the root survived filtering. Callers treat this as a
    /// clean early exit, not a failure.
    #[error("no text files found under '{}'", .0.display())]
    NoTextFiles(PathBuf),
}

/// One diagnostic per rejected command token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("invalid command format: {0}")]
    Malformed(String),
    #[error("no line {0} in the tree")]
    NoSuchLine(usize),
    #[error("line {line} is not a directory ({token})")]
    NotADirectory { line: usize, token: String },
    #[error("line {line} has no extension #{index} (valid: {})", range_hint(.available))]
    ExtensionOutOfRange {
        line: usize,
        index: usize,
        available: usize,
    },
}

fn range_hint(available: &usize) -> String {
    if *available == 0 {
        "none".to_string()
    } else {
        format!("1-{available}")
    }
}
