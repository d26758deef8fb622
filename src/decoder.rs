//! The structural decoder: copies the members of a [`Json`] object into a [`Record`] laid out by a
//! [`Shape`].
//!
//! Decoding is total. Either every declared field ends up holding a value of its declared type, or
//! the call fails with a [`DecodeError`] naming the offending field. Keys the shape does not declare
//! are ignored, and declared keys that are absent leave the field at its default.

use indexmap::IndexMap;
use tracing::*;

use crate::error::{DecodeError, DecodeResult};
use crate::parser::Json;
use crate::path::{FieldPath, Seg};
use crate::record::{FieldValue, Record, Shaped};
use crate::shape::{FieldType, Shape};
use crate::Spanned;

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Records and sequences nested deeper than this fail with [`DecodeError::DepthExceeded`]. The
    /// top-level record counts as one level.
    pub max_depth: usize,
    /// When a tag has no exact match, accept the first key that is equal to it ignoring case.
    pub case_insensitive_keys: bool,
    /// Treat `null` like an absent key instead of a type mismatch.
    pub null_as_default: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            case_insensitive_keys: false,
            null_as_default: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode `source` into a record of `shape`, aborting on the first error.
    #[instrument(level = "debug", skip_all, fields(shape = %shape.name))]
    pub fn decode(&self, source: &Spanned<Json>, shape: &Shape) -> DecodeResult<Record> {
        Walk::new(&self.options, false).record(source, shape)
    }

    /// Decode as much of `source` as possible. Fields that fail to decode keep their default value
    /// and their errors are returned alongside the record.
    #[instrument(level = "debug", skip_all, fields(shape = %shape.name))]
    pub fn decode_best_effort(
        &self,
        source: &Spanned<Json>,
        shape: &Shape,
    ) -> (Record, Vec<DecodeError>) {
        let mut walk = Walk::new(&self.options, true);
        let record = match walk.record(source, shape) {
            Ok(record) => record,
            Err(e) => {
                walk.errors.push(e);
                shape.default_record()
            }
        };
        debug!(errors = walk.errors.len(), "best-effort decode finished");
        (record, walk.errors)
    }

    pub fn decode_as<T: Shaped>(&self, source: &Spanned<Json>) -> DecodeResult<T> {
        self.decode(source, &T::shape()).map(T::from_record)
    }
}

/// Decode with [`DecodeOptions::default`].
pub fn decode(source: &Spanned<Json>, shape: &Shape) -> DecodeResult<Record> {
    Decoder::default().decode(source, shape)
}

/// Decode straight into a [`Shaped`] struct with [`DecodeOptions::default`].
pub fn decode_as<T: Shaped>(source: &Spanned<Json>) -> DecodeResult<T> {
    Decoder::default().decode_as(source)
}

struct Walk<'o> {
    options: &'o DecodeOptions,
    path: FieldPath,
    depth: usize,
    best_effort: bool,
    errors: Vec<DecodeError>,
}

impl<'o> Walk<'o> {
    fn new(options: &'o DecodeOptions, best_effort: bool) -> Self {
        Self {
            options,
            path: FieldPath::root(),
            depth: 0,
            best_effort,
            errors: Vec::new(),
        }
    }

    fn record(&mut self, source: &Spanned<Json>, shape: &Shape) -> DecodeResult<Record> {
        // Nested records only get here with an object, so this is the top-level check.
        let Json::Object(members) = &source.val else {
            return Err(DecodeError::Shape {
                shape: shape.name.clone(),
                found: source.val.kind_desc(),
                span: source.span,
            });
        };

        self.nested(source.span, |walk| {
            let members = walk.index_members(members, shape);
            let mut record = Record::new(&shape.name);

            for field in &shape.fields {
                let value = match walk.lookup(&members, field.key()) {
                    None => field.ty.default_value(),
                    Some(member) => match walk.at(field.key(), |walk| walk.value(member, &field.ty))
                    {
                        Ok(value) => value,
                        Err(e) if walk.best_effort => {
                            debug!(error = %e, "keeping default for field");
                            walk.errors.push(e);
                            field.ty.default_value()
                        }
                        Err(e) => return Err(e),
                    },
                };
                record.insert(&field.name, value);
            }

            Ok(record)
        })
    }

    fn value(&mut self, source: &Spanned<Json>, ty: &FieldType) -> DecodeResult<FieldValue> {
        match (ty, &source.val) {
            (_, Json::Null) if self.options.null_as_default => Ok(ty.default_value()),
            (FieldType::Float, Json::Num(n)) => Ok(FieldValue::Float(*n)),
            (FieldType::Integer, Json::Num(n)) => match integral(*n) {
                Some(i) => Ok(FieldValue::Integer(i)),
                None => Err(self.mismatch(ty, source)),
            },
            (FieldType::Bool, Json::Bool(b)) => Ok(FieldValue::Bool(*b)),
            (FieldType::String, Json::Str(s)) => Ok(FieldValue::Str(s.clone())),
            (FieldType::Sequence(elem), Json::Array(items)) => self.nested(source.span, |walk| {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| walk.at(i, |walk| walk.value(item, elem)))
                    .collect::<DecodeResult<Vec<_>>>()
                    .map(FieldValue::Seq)
            }),
            (FieldType::Record(shape), Json::Object(_)) => {
                self.record(source, shape).map(FieldValue::Record)
            }
            _ => Err(self.mismatch(ty, source)),
        }
    }

    /// Run `f` one level deeper, failing instead if that would exceed the depth limit.
    fn nested<T>(
        &mut self,
        span: chumsky::span::SimpleSpan<usize>,
        f: impl FnOnce(&mut Self) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::DepthExceeded {
                path: self.path.clone(),
                limit: self.options.max_depth,
                span,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` with `seg` appended to the current path.
    fn at<T>(&mut self, seg: impl Into<Seg>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(seg);
        let result = f(self);
        self.path.pop();
        result
    }

    /// Key → value table for one object. The last occurrence of a duplicated key wins.
    fn index_members<'j>(
        &self,
        members: &'j [(Spanned<String>, Spanned<Json>)],
        shape: &Shape,
    ) -> IndexMap<&'j str, &'j Spanned<Json>> {
        let mut table = IndexMap::with_capacity(members.len());
        for (key, value) in members {
            if table.insert(key.val.as_str(), value).is_some() {
                warn!(path = %self.path, key = %key.val, "duplicate key, using the last occurrence");
            }
            if !shape.fields.iter().any(|f| f.key() == key.val) {
                trace!(path = %self.path, key = %key.val, shape = %shape.name, "key not declared by shape");
            }
        }
        table
    }

    fn lookup<'j>(
        &self,
        members: &IndexMap<&'j str, &'j Spanned<Json>>,
        key: &str,
    ) -> Option<&'j Spanned<Json>> {
        if let Some(value) = members.get(key) {
            return Some(*value);
        }
        if !self.options.case_insensitive_keys {
            return None;
        }
        let folded = key.to_lowercase();
        members
            .iter()
            .find(|(k, _)| k.to_lowercase() == folded)
            .map(|(k, v)| {
                trace!(path = %self.path, tag = key, matched = *k, "case-insensitive key match");
                *v
            })
    }

    fn mismatch(&self, ty: &FieldType, source: &Spanned<Json>) -> DecodeError {
        DecodeError::type_mismatch(
            &self.path,
            ty.expected_desc(),
            source.val.kind_desc(),
            source.span,
        )
    }
}

/// `n` as an `i64`, if it has no fractional part and is in range.
fn integral(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}
