//! Error types for the mprofile library

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MprofileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MprofileError>;

impl MprofileError {
    /// Build a [`MprofileError::Parse`] for a 1-based input line.
    pub fn parse<S: Into<String>>(line: u64, message: S) -> Self {
        MprofileError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Returns `true` if the error originated from a broken pipe.
///
/// Writing profiles to a closed stdout (e.g. `| head`) is not a failure.
#[inline]
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return io_err.kind() == io::ErrorKind::BrokenPipe;
        }
        if let Some(csv_err) = cause.downcast_ref::<csv::Error>() {
            if let csv::ErrorKind::Io(io_err) = csv_err.kind() {
                return io_err.kind() == io::ErrorKind::BrokenPipe;
            }
        }
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_nested_broken_pipe() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let err = anyhow::Error::new(MprofileError::Io(io_err)).context("writing profile");
        assert!(is_broken_pipe(&err));
    }

    #[test]
    fn ignores_other_errors() {
        let err = anyhow::Error::new(MprofileError::parse(3, "bad readcount"));
        assert!(!is_broken_pipe(&err));
        assert_eq!(
            MprofileError::parse(3, "bad readcount").to_string(),
            "Parse error on line 3: bad readcount"
        );
    }
}
