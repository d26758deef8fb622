//! Decode JSON documents into records of a declared shape.
//!
//! Decoding happens in two stages. [`parser::parse`] turns text into a spanned [`parser::Json`]
//! tree, and the [`decoder`] copies the members of that tree into a [`Record`] laid out by a
//! [`Shape`]. Field types are checked along the way and any mismatch is reported with the path of
//! the field and the span of the offending value.
//!
//! ```
//! use jshape::{decode_as, parse};
//! use jshape::particle::Simple;
//!
//! let json = parse(r#"{"value": 2, "extra": "ignored"}"#).unwrap();
//! let simple: Simple = decode_as(&json).unwrap();
//! assert_eq!(simple.value, 2);
//! assert_eq!(simple.cake, "");
//! ```

pub mod config;
pub mod decoder;
pub mod encode;
pub mod error;
pub mod logging;
pub mod parser;
pub mod particle;
pub mod path;
pub mod record;
pub mod report;
pub mod shape;
mod spanned;

use std::path::Path;

use tracing::*;

pub use decoder::{decode, decode_as, DecodeOptions, Decoder};
pub use encode::{encode, encode_shaped};
pub use error::{DecodeError, DecodeResult, SyntaxError};
pub use parser::{parse, Json};
pub use path::FieldPath;
pub use record::{FieldValue, FromValue, Record, Shaped};
pub use shape::{Field, FieldType, Shape};
pub use spanned::Spanned;

/// Read a UTF-8 JSON document from disk.
pub fn read_document(path: &Path) -> DecodeResult<String> {
    std::fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), "failed to read input");
        DecodeError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Parse `src`, wrapping syntax errors in a [`DecodeError`].
pub fn parse_document(src: &str) -> DecodeResult<Spanned<Json>> {
    parse(src).map_err(|errors| DecodeError::Parse { errors })
}

/// Like [`parse_document`], rejecting documents nested deeper than `options.max_depth`.
pub fn parse_document_with(src: &str, options: &DecodeOptions) -> DecodeResult<Spanned<Json>> {
    parser::parse_bounded(src, options.max_depth).map_err(|errors| DecodeError::Parse { errors })
}
