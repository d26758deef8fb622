//! Errors produced while loading, parsing, and decoding a document.

use std::ops::Range;
use std::path::PathBuf;

use chumsky::error::Rich;
use chumsky::span::SimpleSpan;
use thiserror::Error;

use crate::path::FieldPath;

/// An owned syntax error, detached from the input it was found in so it can travel inside a
/// [`DecodeError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub span: Range<usize>,
    /// Full description, e.g. "found '}' expected JSON value".
    pub message: String,
    /// Short description used to label the span.
    pub reason: String,
}

impl SyntaxError {
    pub fn from_rich(e: &Rich<'_, char>) -> Self {
        Self {
            span: e.span().into_range(),
            message: e.to_string(),
            reason: e.reason().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read `{}`", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not well-formed JSON ({} error(s))", errors.len())]
    Parse { errors: Vec<SyntaxError> },

    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
        span: SimpleSpan<usize>,
    },

    #[error("cannot decode `{shape}` from {found}: expected object")]
    Shape {
        shape: String,
        found: &'static str,
        span: SimpleSpan<usize>,
    },

    #[error("nesting deeper than {limit} levels at {path}")]
    DepthExceeded {
        path: FieldPath,
        limit: usize,
        span: SimpleSpan<usize>,
    },
}

impl DecodeError {
    pub fn type_mismatch(
        path: &FieldPath,
        expected: &'static str,
        found: &'static str,
        span: SimpleSpan<usize>,
    ) -> Self {
        DecodeError::TypeMismatch {
            path: path.clone(),
            expected,
            found,
            span,
        }
    }

    /// The field path the error refers to, if it refers to one.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            DecodeError::TypeMismatch { path, .. } | DecodeError::DepthExceeded { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// Source region the error points at. Parse errors carry one span per syntax error instead.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            DecodeError::TypeMismatch { span, .. }
            | DecodeError::Shape { span, .. }
            | DecodeError::DepthExceeded { span, .. } => Some(span.into_range()),
            DecodeError::FileRead { .. } | DecodeError::Parse { .. } => None,
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
