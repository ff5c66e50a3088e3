//! Pipeline error types

use ember_parser::ParseError;
use std::io;
use thiserror::Error;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum PipelineError {
    /// IO error reading or writing a document
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Document failed to parse
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A rename failed for a reason other than the source being gone.
    /// Missing sources never surface here; they are a successful no-op
    /// at the relocation layer.
    #[error("failed to rename '{from}' to '{to}': {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },
}

/// Specialized Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_error_display() {
        let err = PipelineError::Rename {
            from: "a.png".into(),
            to: "b.png".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to rename 'a.png' to 'b.png': denied");
    }
}
