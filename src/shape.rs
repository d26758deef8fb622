//! Shape descriptors: the declared fields, types and wire tags of a target record.
//!
//! A [`Shape`] is built once, usually inside [`Shaped::shape`](crate::Shaped::shape), and then
//! handed to the decoder. Tags are resolved when the shape is built, so decoding only ever performs
//! a plain lookup of [`Field::key`] in the source object.

use crate::record::{FieldValue, Record};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Float,
    /// A JSON number with no fractional part that fits in an `i64`.
    Integer,
    Bool,
    String,
    Sequence(Box<FieldType>),
    Record(Shape),
}

impl FieldType {
    pub fn sequence(elem: FieldType) -> Self {
        FieldType::Sequence(Box::new(elem))
    }

    /// Human readable name used in type mismatch errors.
    pub fn expected_desc(&self) -> &'static str {
        match self {
            FieldType::Float => "number",
            FieldType::Integer => "integer",
            FieldType::Bool => "bool",
            FieldType::String => "string",
            FieldType::Sequence(_) => "array",
            FieldType::Record(_) => "object",
        }
    }

    /// The value a field of this type holds when its key is absent.
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldType::Float => FieldValue::Float(0.0),
            FieldType::Integer => FieldValue::Integer(0),
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::String => FieldValue::Str(String::new()),
            FieldType::Sequence(_) => FieldValue::Seq(Vec::new()),
            FieldType::Record(shape) => FieldValue::Record(shape.default_record()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub tag: Option<String>,
    pub ty: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            tag: None,
            ty,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The key this field is matched against in a JSON object.
    pub fn key(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Shape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// A record with every declared field set to its type's default.
    pub fn default_record(&self) -> Record {
        let mut record = Record::new(&self.name);
        for field in &self.fields {
            record.insert(&field.name, field.ty.default_value());
        }
        record
    }
}
