//! Re-encoding records into minimal JSON objects.

use serde_json::{Map, Number, Value};

use crate::record::{FieldValue, Record, Shaped};
use crate::shape::{FieldType, Shape};

/// Largest magnitude below which every integer is exactly representable as an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Encode `record` as a JSON object keyed by tag, omitting every field that holds its type's
/// default value. Decoding the result with the same shape yields `record` again.
pub fn encode(record: &Record, shape: &Shape) -> Value {
    let mut object = Map::new();
    for field in &shape.fields {
        let Some(value) = record.get(&field.name) else {
            continue;
        };
        if *value == field.ty.default_value() {
            continue;
        }
        object.insert(field.key().to_owned(), encode_value(value, &field.ty));
    }
    Value::Object(object)
}

pub fn encode_shaped<T: Shaped>(value: &T) -> Value {
    encode(&value.to_record(), &T::shape())
}

fn encode_value(value: &FieldValue, ty: &FieldType) -> Value {
    match (value, ty) {
        (FieldValue::Record(record), FieldType::Record(shape)) => encode(record, shape),
        (FieldValue::Seq(items), FieldType::Sequence(elem)) => {
            Value::Array(items.iter().map(|item| encode_value(item, elem)).collect())
        }
        (FieldValue::Float(f), _) => float(*f),
        (FieldValue::Integer(i), _) => Value::from(*i),
        (FieldValue::Bool(b), _) => Value::Bool(*b),
        (FieldValue::Str(s), _) => Value::String(s.clone()),
        // Shape and record disagree; encode what the record holds.
        (FieldValue::Seq(items), _) => Value::Array(
            items
                .iter()
                .map(|item| encode_value(item, &FieldType::Float))
                .collect(),
        ),
        (FieldValue::Record(record), _) => Value::Object(
            record
                .iter()
                .map(|(k, v)| (k.to_owned(), encode_value(v, &FieldType::Float)))
                .collect(),
        ),
    }
}

/// JSON has a single number type, so integral floats are written without a fractional part.
/// Non-finite values have no JSON representation and become `null`.
fn float(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}
