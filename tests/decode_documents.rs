use std::path::Path;

use rstest::rstest;
use serde_json::json;

use jshape::particle::{Parameter, Particle, ParticleDocument, Simple};
use jshape::{
    decode, decode_as, encode, encode_shaped, parse, parse_document, parse_document_with,
    read_document, DecodeError, DecodeOptions, Field, FieldType, Record, Shape, Shaped,
};

/// A list of parameter sets under the `p` key.
#[derive(Debug, Default, PartialEq)]
struct Ensemble {
    params: Vec<Parameter>,
}

impl Shaped for Ensemble {
    fn shape() -> Shape {
        Shape::new("Ensemble").field(
            Field::new("params", FieldType::sequence(FieldType::Record(Parameter::shape())))
                .tag("p"),
        )
    }

    fn from_record(mut record: Record) -> Self {
        Self {
            params: record.take_records("params"),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new("Ensemble");
        record.insert(
            "params",
            self.params.iter().map(Shaped::to_record).collect::<Vec<_>>(),
        );
        record
    }
}

fn demo(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name);
    read_document(&path).unwrap()
}

#[test]
fn particle_demo_decodes() {
    let json = parse_document(&demo("particle.json")).unwrap();
    let doc: ParticleDocument = decode_as(&json).unwrap();
    assert_eq!(
        doc,
        ParticleDocument {
            particle: Particle {
                s: vec![10.0, 20.0, 30.0],
                w: 0.12345,
                p: Parameter {
                    alpha: 0.1,
                    beta: 10.1,
                },
            },
        }
    );
}

#[test]
fn simple_demo_decodes() {
    let json = parse_document(&demo("simple.json")).unwrap();
    let simple: Simple = decode_as(&json).unwrap();
    assert_eq!(
        simple,
        Simple {
            value: 2,
            ..Default::default()
        }
    );
}

#[test]
fn extra_keys_decode_identically() {
    let plain: Simple = decode_as(&parse(r#"{"value": 2}"#).unwrap()).unwrap();
    let extra: Simple = decode_as(&parse(r#"{"value": 2, "extra": "ignored"}"#).unwrap()).unwrap();
    assert_eq!(plain, extra);
}

#[test]
fn all_fields_present() {
    let src = r#"{"value": -4, "cake": "sponge", "array": [1, 2, 3], "float": 2.5}"#;
    let simple: Simple = decode_as(&parse(src).unwrap()).unwrap();
    assert_eq!(
        simple,
        Simple {
            value: -4,
            cake: "sponge".to_string(),
            array: vec![1, 2, 3],
            float: 2.5,
        }
    );
}

#[rstest]
#[case(r#"{"value": "2"}"#, "value")]
#[case(r#"{"float": "2.5"}"#, "float")]
#[case(r#"{"array": [1, "2"]}"#, "array[1]")]
fn numeric_field_given_string_fails(#[case] src: &str, #[case] field: &str) {
    let err = decode_as::<Simple>(&parse(src).unwrap()).unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }), "{err:?}");
    assert_eq!(err.path().unwrap().to_string(), field);
}

#[test]
fn nested_mismatch_names_full_path() {
    let src = r#"{"particle":{"s":[10,20,30],"w":0.12345,"p":{"alpha":"0.1","beta":10.1}}}"#;
    let err = decode_as::<ParticleDocument>(&parse(src).unwrap()).unwrap_err();
    assert_eq!(err.path().unwrap().to_string(), "particle.p.alpha");
}

#[test]
fn parse_errors_are_reported() {
    let err = parse_document(r#"{"particle": {"s": [1, 2,]}}"#).unwrap_err();
    let DecodeError::Parse { errors } = err else {
        panic!("expected parse error, got {err:?}");
    };
    assert!(!errors.is_empty());
}

#[test]
fn missing_file_is_a_read_error() {
    let err = read_document(Path::new("does/not/exist.json")).unwrap_err();
    assert!(matches!(err, DecodeError::FileRead { .. }));
}

#[rstest]
#[case(json!({"particle": {"s": [10, 20, 30], "w": 0.12345, "p": {"alpha": 0.1, "beta": 10.1}}}))]
#[case(json!({"particle": {"w": 0.5}}))]
#[case(json!({"particle": {"p": {"beta": 1.25}}}))]
#[case(json!({}))]
fn round_trip_reproduces_minimal_object(#[case] expected: serde_json::Value) {
    let shape = ParticleDocument::shape();
    let record = decode(&parse(&expected.to_string()).unwrap(), &shape).unwrap();
    assert_eq!(encode(&record, &shape), expected);
}

#[test]
fn round_trip_drops_unknown_and_default_fields() {
    let src = r#"{"value": 2, "cake": "", "array": [], "float": 0, "extra": [1]}"#;
    let simple: Simple = decode_as(&parse(src).unwrap()).unwrap();
    assert_eq!(encode_shaped(&simple), json!({"value": 2}));
}

#[test]
fn sequence_of_records_decodes() {
    let src = r#"{"p": [{"alpha": 0.1, "beta": 10.1}, {"beta": 2}], "q": 1}"#;
    let ensemble: Ensemble = decode_as(&parse(src).unwrap()).unwrap();
    assert_eq!(
        ensemble,
        Ensemble {
            params: vec![
                Parameter {
                    alpha: 0.1,
                    beta: 10.1,
                },
                Parameter {
                    alpha: 0.0,
                    beta: 2.0,
                },
            ],
        }
    );
}

#[test]
fn sequence_of_records_mismatch_names_element() {
    let src = r#"{"p": [{"alpha": 0.1}, {"alpha": "0.2"}]}"#;
    let err = decode_as::<Ensemble>(&parse(src).unwrap()).unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }), "{err:?}");
    assert_eq!(err.path().unwrap().to_string(), "p[1].alpha");
}

#[test]
fn sequence_of_records_round_trips() {
    let expected = json!({"p": [{"alpha": 0.1, "beta": 10.1}, {"beta": 2}, {}]});
    let ensemble: Ensemble = decode_as(&parse(&expected.to_string()).unwrap()).unwrap();
    assert_eq!(ensemble.params.len(), 3);
    assert_eq!(encode_shaped(&ensemble), expected);
}

#[test]
fn configured_depth_limit_applies_while_parsing() {
    let options = DecodeOptions {
        max_depth: 4,
        ..Default::default()
    };
    let shallow = r#"{"particle": {"p": {"alpha": [1]}}}"#;
    assert!(parse_document_with(shallow, &options).is_ok());

    let deep = format!("{}{}", "[".repeat(10_000), "]".repeat(10_000));
    let err = parse_document_with(&deep, &options).unwrap_err();
    assert!(matches!(err, DecodeError::Parse { .. }), "{err:?}");
}
