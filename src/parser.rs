//! Parser turning JSON text into a spanned, untyped [`Json`] tree.

use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::decoder::DEFAULT_MAX_DEPTH;
use crate::error::SyntaxError;
use crate::Spanned;

#[derive(Clone, Debug, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Str(String),
    Num(f64),
    Array(Vec<Spanned<Json>>),
    /// Members are kept in source order. Duplicate keys are retained here; the decoder decides
    /// which one is used.
    Object(Vec<(Spanned<String>, Spanned<Json>)>),
}

impl Json {
    pub fn kind_desc(&self) -> &'static str {
        match self {
            Json::Null => "null",
            Json::Bool(_) => "bool",
            Json::Str(_) => "string",
            Json::Num(_) => "number",
            Json::Array(_) => "array",
            Json::Object(_) => "object",
        }
    }
}

/// Adapted from: <https://github.com/zesterer/chumsky/blob/main/examples/json.rs>.
pub fn parser<'a>() -> impl Parser<'a, &'a str, Spanned<Json>, extra::Err<Rich<'a, char>>> {
    recursive(|value| {
        let digits = text::digits(10).to_slice();

        let frac = just('.').then(digits);

        let exp = just('e')
            .or(just('E'))
            .then(one_of("+-").or_not())
            .then(digits)
            .labelled("exponent");

        let number = just('-')
            .or_not()
            .then(text::int(10))
            .then(frac.or_not())
            .then(exp.or_not())
            .to_slice()
            .try_map(|s: &str, span| {
                s.parse::<f64>()
                    .map_err(|e| Rich::custom(span, format!("invalid number `{s}`: {e}")))
            })
            .boxed()
            .labelled("number");

        let escape = just('\\')
            .ignore_then(choice((
                just('\\').map(Fragment::Char),
                just('/').map(Fragment::Char),
                just('"').map(Fragment::Char),
                just('b').to(Fragment::Char('\x08')),
                just('f').to(Fragment::Char('\x0C')),
                just('n').to(Fragment::Char('\n')),
                just('r').to(Fragment::Char('\r')),
                just('t').to(Fragment::Char('\t')),
                just('u').ignore_then(
                    text::digits(16)
                        .exactly(4)
                        .to_slice()
                        .try_map(|digits: &str, span| {
                            u16::from_str_radix(digits, 16)
                                .map(|unit| Fragment::Unit(unit, span))
                                .map_err(|e| Rich::custom(span, e))
                        }),
                ),
            )))
            .boxed()
            .labelled("escape character");

        // Control characters must be escaped.
        let unescaped = any()
            .filter(|c: &char| !matches!(c, '\\' | '"' | '\0'..='\x1F'))
            .map(Fragment::Char);

        let string = unescaped
            .or(escape)
            .repeated()
            .collect::<Vec<_>>()
            .validate(|fragments, _, emitter| {
                let (s, unpaired) = join_fragments(fragments);
                for span in unpaired {
                    emitter.emit(Rich::custom(span, "unpaired surrogate in unicode escape"));
                }
                s
            })
            .delimited_by(just('"'), just('"'))
            .boxed()
            .labelled("string");

        let array = value
            .clone()
            .separated_by(just(',').padded())
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('['), just(']'))
            .boxed()
            .labelled("array");

        let member = string
            .clone()
            .map_with(|val, e| Spanned::new(val, e.span()))
            .then_ignore(just(':').padded())
            .then(value)
            .labelled("object member");
        let object = member
            .separated_by(just(',').padded())
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('{'), just('}'))
            .boxed()
            .labelled("object");

        choice((
            just("null").to(Json::Null).labelled("null"),
            just("true").to(Json::Bool(true)).labelled("true"),
            just("false").to(Json::Bool(false)).labelled("false"),
            number.map(Json::Num),
            string.map(Json::Str),
            array.map(Json::Array),
            object.map(Json::Object),
        ))
        .map_with(|val, e| Spanned::new(val, e.span()))
        .padded()
    })
    .labelled("JSON value")
}

/// A piece of a string literal: a literal or simply escaped character, or one UTF-16 code unit
/// from a `\uXXXX` escape.
#[derive(Clone, Debug)]
enum Fragment {
    Char(char),
    Unit(u16, SimpleSpan<usize>),
}

/// Join string fragments, combining surrogate pairs. Lone surrogates become U+FFFD and their
/// spans are returned.
fn join_fragments(fragments: Vec<Fragment>) -> (String, Vec<SimpleSpan<usize>>) {
    let mut s = String::with_capacity(fragments.len());
    let mut unpaired = Vec::new();
    let mut fragments = fragments.into_iter().peekable();

    while let Some(fragment) = fragments.next() {
        match fragment {
            Fragment::Char(c) => s.push(c),
            Fragment::Unit(high @ 0xD800..=0xDBFF, span) => match fragments.peek() {
                Some(&Fragment::Unit(low @ 0xDC00..=0xDFFF, _)) => {
                    fragments.next();
                    let scalar =
                        0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    s.push(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                _ => {
                    unpaired.push(span);
                    s.push(char::REPLACEMENT_CHARACTER);
                }
            },
            Fragment::Unit(unit, span) => match char::from_u32(u32::from(unit)) {
                Some(c) => s.push(c),
                None => {
                    unpaired.push(span);
                    s.push(char::REPLACEMENT_CHARACTER);
                }
            },
        }
    }

    (s, unpaired)
}

/// Reject documents whose arrays and objects nest deeper than `max_depth`, without recursing.
/// Runs before the recursive descent so that pathological input cannot exhaust the stack.
fn check_depth(src: &str, max_depth: usize) -> Result<(), SyntaxError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in src.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => {
                depth += 1;
                if depth > max_depth {
                    return Err(SyntaxError {
                        span: i..i + 1,
                        message: format!("nesting deeper than {max_depth} levels"),
                        reason: "nested too deeply".to_string(),
                    });
                }
            }
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

/// Parse a whole document, allowing at most [`DEFAULT_MAX_DEPTH`] levels of nesting. All syntax
/// errors found are returned, in source order.
pub fn parse(src: &str) -> Result<Spanned<Json>, Vec<SyntaxError>> {
    parse_bounded(src, DEFAULT_MAX_DEPTH)
}

/// Like [`parse`], with an explicit nesting limit.
pub fn parse_bounded(src: &str, max_depth: usize) -> Result<Spanned<Json>, Vec<SyntaxError>> {
    check_depth(src, max_depth).map_err(|e| vec![e])?;
    let (json, errors) = parser().parse(src).into_output_errors();
    match json {
        Some(json) if errors.is_empty() => Ok(json),
        _ => Err(errors.iter().map(SyntaxError::from_rich).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(json: &Spanned<Json>) -> &[(Spanned<String>, Spanned<Json>)] {
        match &json.val {
            Json::Object(members) => members,
            other => panic!("expected object, found {}", other.kind_desc()),
        }
    }

    #[test]
    fn parses_nested_particle() {
        let src = r#"{
            "particle" : {
                "s" : [10,20,30],
                "w" : 0.12345,
                "p" : { "alpha": 0.1, "beta": 10.1 }
            }
        }"#;
        let json = parse(src).unwrap();
        let top = members(&json);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0.val, "particle");

        let particle = members(&top[0].1);
        assert_eq!(particle[0].0.val, "s");
        assert_eq!(
            particle[0].1.val,
            Json::Array(vec![
                Spanned::new(Json::Num(10.0), SimpleSpan::new(0, 0)),
                Spanned::new(Json::Num(20.0), SimpleSpan::new(0, 0)),
                Spanned::new(Json::Num(30.0), SimpleSpan::new(0, 0)),
            ])
        );
        assert_eq!(particle[1].1.val, Json::Num(0.12345));
        assert_eq!(particle[2].1.val.kind_desc(), "object");
    }

    #[test]
    fn spans_point_at_values() {
        let src = r#"{"value": 2}"#;
        let json = parse(src).unwrap();
        assert_eq!(json.span.into_range(), 0..src.len());
        let (key, value) = &members(&json)[0];
        assert_eq!(&src[key.span.into_range()], r#""value""#);
        assert_eq!(&src[value.span.into_range()], "2");
    }

    #[test]
    fn decodes_string_escapes() {
        let json = parse(r#""a\"b\\c\/d\nA""#).unwrap();
        assert_eq!(json.val, Json::Str("a\"b\\c/d\nA".to_string()));
    }

    #[test]
    fn parses_scalars_and_empty_containers() {
        assert_eq!(parse("null").unwrap().val, Json::Null);
        assert_eq!(parse(" true ").unwrap().val, Json::Bool(true));
        assert_eq!(parse("-1.5e2").unwrap().val, Json::Num(-150.0));
        assert_eq!(parse("[ ]").unwrap().val, Json::Array(vec![]));
        assert_eq!(parse("{}").unwrap().val, Json::Object(vec![]));
    }

    #[test]
    fn keeps_duplicate_keys() {
        let json = parse(r#"{"a": 1, "a": 2}"#).unwrap();
        assert_eq!(members(&json).len(), 2);
    }

    #[test]
    fn reports_malformed_input() {
        let errors = parse(r#"{"a": }"#).unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors[0].span.start >= 5);
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(parse("{} {}").is_err());
    }

    #[test]
    fn combines_surrogate_pairs() {
        let json = parse(r#""\uD83D\uDE00 \u00e9""#).unwrap();
        assert_eq!(json.val, Json::Str("\u{1F600} \u{e9}".to_string()));
    }

    #[test]
    fn rejects_lone_surrogates() {
        let src = r#""a\uD83Db""#;
        let errors = parse(src).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unpaired surrogate"), "{errors:?}");

        let errors = parse(r#""\uDE00\uD83D""#).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejects_raw_control_characters() {
        assert!(parse("\"a\tb\"").is_err());
        assert!(parse("\"a\nb\"").is_err());
        assert_eq!(
            parse(r#""a\tb""#).unwrap().val,
            Json::Str("a\tb".to_string())
        );
    }

    #[test]
    fn rejects_pathological_nesting_without_recursing() {
        let depth = 100_000;
        let src = format!(
            r#"{{"value": {}1{}}}"#,
            "[".repeat(depth),
            "]".repeat(depth)
        );
        let errors = parse(&src).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "nesting deeper than 128 levels");
        // The opening brace is level one, so the 128th bracket is the first one too deep.
        assert_eq!(errors[0].span.start, r#"{"value": "#.len() + 127);
    }

    #[test]
    fn brackets_inside_strings_do_not_count() {
        let src = format!(r#"{{"k": "{}\"{}"}}"#, "[".repeat(10), "{".repeat(10));
        assert!(parse_bounded(&src, 1).is_ok());
        assert!(parse_bounded("[[1]]", 1).is_err());
        assert!(parse_bounded("[[1]]", 2).is_ok());
    }
}
