//! Rendering of syntax and decode errors as source-annotated diagnostics.

use ariadne::{Color, Config as ReportConfig, Fmt, Label, Report, ReportKind, Source};

use crate::error::{DecodeError, SyntaxError};

pub type DiagnosticReport<'a> = Report<'a, (&'a String, std::ops::Range<usize>)>;
pub type Diagnostics<'a> = Vec<DiagnosticReport<'a>>;

pub fn syntax_error<'a>(path: &'a String, e: &SyntaxError, color: bool) -> DiagnosticReport<'a> {
    Report::build(ReportKind::Error, path, e.span.start)
        .with_config(ReportConfig::default().with_color(color))
        .with_message(&e.message)
        .with_label(
            Label::new((path, e.span.clone()))
                .with_message(&e.reason)
                .with_color(Color::Red),
        )
        .finish()
}

/// Reports for a decode error. `kind` is [`ReportKind::Warning`] for errors that were collected
/// during a best-effort decode. File read errors have no source to point at and produce nothing.
pub fn decode_error<'a>(
    path: &'a String,
    err: &DecodeError,
    kind: ReportKind<'a>,
    color: bool,
) -> Diagnostics<'a> {
    let (message, span) = match err {
        DecodeError::FileRead { .. } => return Vec::new(),
        DecodeError::Parse { errors } => {
            return errors.iter().map(|e| syntax_error(path, e, color)).collect();
        }
        DecodeError::TypeMismatch {
            path: field,
            expected,
            found,
            span,
        } => (
            format!(
                "unexpected value for {}: expected {} but found {}",
                field.to_string().fg(Color::Blue),
                expected.fg(Color::Blue),
                found.fg(Color::Blue)
            ),
            span.into_range(),
        ),
        DecodeError::Shape { shape, found, span } => (
            format!(
                "cannot decode {} from {}: expected object",
                shape.as_str().fg(Color::Blue),
                found.fg(Color::Blue)
            ),
            span.into_range(),
        ),
        DecodeError::DepthExceeded {
            path: field,
            limit,
            span,
        } => (
            format!(
                "value at {} is nested deeper than {} levels",
                field.to_string().fg(Color::Blue),
                limit
            ),
            span.into_range(),
        ),
    };

    let label_color = match kind {
        ReportKind::Error => Color::Red,
        _ => Color::Yellow,
    };

    vec![Report::build(kind, path, span.start)
        .with_config(ReportConfig::default().with_color(color))
        .with_message(message)
        .with_label(Label::new((path, span)).with_color(label_color))
        .finish()]
}

/// Render a report to a string, e.g. for tests or non-terminal output.
pub fn render<'a>(
    report: &DiagnosticReport<'a>,
    path: &'a String,
    src: &str,
) -> std::io::Result<String> {
    let mut buf = Vec::new();
    report.write((path, Source::from(src)), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_as;
    use crate::parser::parse;
    use crate::particle::ParticleDocument;

    #[test]
    fn renders_type_mismatch_with_path() {
        let path = "particle.json".to_string();
        let src = r#"{"particle": {"p": {"alpha": "x"}}}"#;
        let err = decode_as::<ParticleDocument>(&parse(src).unwrap()).unwrap_err();

        let reports = decode_error(&path, &err, ReportKind::Error, false);
        assert_eq!(reports.len(), 1);
        let out = render(&reports[0], &path, src).unwrap();
        assert!(out.contains("particle.p.alpha"), "{out}");
        assert!(out.contains("particle.json"), "{out}");
    }

    #[test]
    fn renders_each_syntax_error() {
        let path = "broken.json".to_string();
        let src = r#"{"a": }"#;
        let errors = parse(src).unwrap_err();
        let err = DecodeError::Parse {
            errors: errors.clone(),
        };

        let reports = decode_error(&path, &err, ReportKind::Error, false);
        assert_eq!(reports.len(), errors.len());
        let out = render(&reports[0], &path, src).unwrap();
        assert!(out.contains("Error"), "{out}");
    }

    #[test]
    fn file_read_errors_have_no_report() {
        let path = "missing.json".to_string();
        let err = DecodeError::FileRead {
            path: path.clone().into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(decode_error(&path, &err, ReportKind::Error, false).is_empty());
    }
}
