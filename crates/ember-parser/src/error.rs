//! Parser error types

use thiserror::Error;

/// Parse failure. Every variant is fatal for the document: the adapter
/// contract is to fail loudly rather than hand back a partial tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A `:PROPERTIES:` drawer with no closing `:END:`
    #[error("unterminated property drawer starting at line {line}")]
    UnterminatedDrawer {
        /// 1-based line of the `:PROPERTIES:` opener
        line: usize,
    },

    /// A line inside a property drawer that is not a `:NAME: value` entry
    #[error("malformed drawer entry at line {line}: {content:?}")]
    MalformedProperty { line: usize, content: String },

    /// A `#+BEGIN_` block with no matching `#+END_`
    #[error("unterminated #+BEGIN_{name} block starting at line {line}")]
    UnterminatedBlock { name: String, line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::UnterminatedDrawer { line: 4 };
        assert_eq!(
            err.to_string(),
            "unterminated property drawer starting at line 4"
        );

        let err = ParseError::UnterminatedBlock {
            name: "SRC".into(),
            line: 10,
        };
        assert_eq!(
            err.to_string(),
            "unterminated #+BEGIN_SRC block starting at line 10"
        );
    }
}
