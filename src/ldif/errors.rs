//! Errors raised while decoding LDIF.

/// A failure to decode an LDIF stream.
#[derive(Debug, thiserror::Error)]
pub enum LdifError {
    /// The input violates LDIF syntax.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The underlying stream could not be read.
    #[error("failed to read LDIF input: {0}")]
    Io(#[from] std::io::Error),
}

impl LdifError {
    /// Create a syntax error for a 1-based line number.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// The offending line, when the error is a syntax error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

pub type LdifResult<T> = Result<T, LdifError>;
