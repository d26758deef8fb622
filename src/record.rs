//! Decoded records, and the glue between them and plain Rust structs.

use indexmap::IndexMap;

use crate::shape::Shape;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Bool(bool),
    Str(String),
    Seq(Vec<FieldValue>),
    Record(Record),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_owned())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        FieldValue::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl From<Record> for FieldValue {
    fn from(v: Record) -> Self {
        FieldValue::Record(v)
    }
}

/// Field values of a decoded instance of some [`Shape`], in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: String,
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            fields: IndexMap::new(),
        }
    }

    /// Name of the shape this record was built for.
    pub fn shape_name(&self) -> &str {
        &self.shape
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Remove a field and convert it, falling back to the default when the field is missing or
    /// holds a value of another type.
    pub fn take<T: FromValue>(&mut self, name: &str) -> T {
        self.fields
            .shift_remove(name)
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// Like [`Record::take`], for nested records.
    pub fn take_record<T: Shaped>(&mut self, name: &str) -> T {
        match self.fields.shift_remove(name) {
            Some(FieldValue::Record(record)) => T::from_record(record),
            _ => T::default(),
        }
    }

    /// Like [`Record::take`], for sequences of nested records.
    pub fn take_records<T: Shaped>(&mut self, name: &str) -> Vec<T> {
        match self.fields.shift_remove(name) {
            Some(FieldValue::Seq(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    FieldValue::Record(record) => Some(T::from_record(record)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Conversion out of a scalar or sequence [`FieldValue`].
pub trait FromValue: Sized + Default {
    fn from_value(value: FieldValue) -> Option<Self>;
}

impl FromValue for f64 {
    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(v),
            FieldValue::Integer(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Seq(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

/// A Rust struct with a declared [`Shape`].
///
/// `from_record` is only ever handed records the decoder produced from `Self::shape()`, so every
/// field is present and well-typed; implementations read them back with [`Record::take`] and
/// friends.
pub trait Shaped: Sized + Default {
    fn shape() -> Shape;

    fn from_record(record: Record) -> Self;

    fn to_record(&self) -> Record;
}
