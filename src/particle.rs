//! Typed records for the bundled demo documents (`demos/particle.json`, `demos/simple.json`).

use crate::record::{Record, Shaped};
use crate::shape::{Field, FieldType, Shape};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameter {
    pub alpha: f64,
    pub beta: f64,
}

impl Shaped for Parameter {
    fn shape() -> Shape {
        Shape::new("Parameter")
            .field(Field::new("alpha", FieldType::Float))
            .field(Field::new("beta", FieldType::Float))
    }

    fn from_record(mut record: Record) -> Self {
        Self {
            alpha: record.take("alpha"),
            beta: record.take("beta"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new("Parameter");
        record.insert("alpha", self.alpha);
        record.insert("beta", self.beta);
        record
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particle {
    /// Samples.
    pub s: Vec<f64>,
    /// Weight.
    pub w: f64,
    pub p: Parameter,
}

impl Shaped for Particle {
    fn shape() -> Shape {
        Shape::new("Particle")
            .field(Field::new("s", FieldType::sequence(FieldType::Float)).tag("s"))
            .field(Field::new("w", FieldType::Float).tag("w"))
            .field(Field::new("p", FieldType::Record(Parameter::shape())).tag("p"))
    }

    fn from_record(mut record: Record) -> Self {
        Self {
            s: record.take("s"),
            w: record.take("w"),
            p: record.take_record("p"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new("Particle");
        record.insert("s", self.s.clone());
        record.insert("w", self.w);
        record.insert("p", self.p.to_record());
        record
    }
}

/// The whole of `demos/particle.json`: a single particle under the `particle` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleDocument {
    pub particle: Particle,
}

impl Shaped for ParticleDocument {
    fn shape() -> Shape {
        Shape::new("ParticleDocument")
            .field(Field::new("particle", FieldType::Record(Particle::shape())))
    }

    fn from_record(mut record: Record) -> Self {
        Self {
            particle: record.take_record("particle"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new("ParticleDocument");
        record.insert("particle", self.particle.to_record());
        record
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simple {
    pub value: i64,
    pub cake: String,
    pub array: Vec<i64>,
    pub float: f64,
}

impl Shaped for Simple {
    fn shape() -> Shape {
        Shape::new("Simple")
            .field(Field::new("value", FieldType::Integer))
            .field(Field::new("cake", FieldType::String))
            .field(Field::new("array", FieldType::sequence(FieldType::Integer)))
            .field(Field::new("float", FieldType::Float))
    }

    fn from_record(mut record: Record) -> Self {
        Self {
            value: record.take("value"),
            cake: record.take("cake"),
            array: record.take("array"),
            float: record.take("float"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new("Simple");
        record.insert("value", self.value);
        record.insert("cake", self.cake.clone());
        record.insert("array", self.array.clone());
        record.insert("float", self.float);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_record_matches_shape() {
        let particle = Particle {
            s: vec![1.0],
            w: 0.5,
            p: Parameter {
                alpha: 0.1,
                beta: 0.2,
            },
        };
        let record = particle.to_record();
        let shape = Particle::shape();
        let names: Vec<_> = record.iter().map(|(k, _)| k).collect();
        let declared: Vec<_> = shape.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, declared);
        assert_eq!(Particle::from_record(record), particle);
    }

    #[test]
    fn default_record_converts_to_default_struct() {
        assert_eq!(
            Simple::from_record(Simple::shape().default_record()),
            Simple::default()
        );
    }
}
