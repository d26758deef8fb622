use std::fmt::Debug;
use std::path::PathBuf;

use anyhow::{bail, Context};
use ariadne::{ReportKind, Source};
use clap::{Parser as ClapParser, ValueEnum};
use tracing::*;

use jshape::config::{Config, DEFAULT_CONFIG_FILE};
use jshape::particle::{ParticleDocument, Simple};
use jshape::{report, DecodeError, DecodeOptions, Decoder, Json, Shaped, Spanned};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    /// A document holding a single particle under the `particle` key.
    Particle,
    /// A flat record of a number, a string, an array and a float.
    Simple,
}

#[derive(Debug, ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to a JSON document, relative to the working directory.
    #[arg(default_value = "demos/particle.json")]
    input: PathBuf,

    /// The shape to decode the document into.
    #[arg(long, value_enum, default_value_t = ShapeArg::Particle)]
    shape: ShapeArg,

    /// Config file to load. Defaults to `jshape.toml` in the working directory, if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep going past fields that fail to decode, reporting each one as a warning.
    #[arg(long)]
    best_effort: bool,
}

fn main() -> anyhow::Result<()> {
    jshape::logging::setup_logging();

    let cli = Args::parse();

    debug!(?cli);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config `{}`", config_path.display()))?;

    debug!(?config);

    let cwd = std::env::current_dir().context("failed to resolve the working directory")?;
    let input = cwd.join(&cli.input);
    let json_string = jshape::read_document(&input)
        .with_context(|| format!("failed to read file `{}`", input.display()))?;

    debug!(%json_string);

    let path = cli.input.display().to_string();

    let options = DecodeOptions::from(&config);

    let json = match jshape::parse_document_with(&json_string, &options) {
        Ok(json) => json,
        Err(e) => {
            print_reports(&path, &json_string, &e, ReportKind::Error)?;
            bail!("failed to parse `{path}` as JSON");
        }
    };

    let decoder = Decoder::new(options);
    let best_effort = cli.best_effort || config.best_effort;

    match cli.shape {
        ShapeArg::Particle => {
            decode_and_print::<ParticleDocument>(&decoder, &json, best_effort, &path, &json_string)
        }
        ShapeArg::Simple => {
            decode_and_print::<Simple>(&decoder, &json, best_effort, &path, &json_string)
        }
    }
}

fn decode_and_print<T: Shaped + Debug>(
    decoder: &Decoder,
    json: &Spanned<Json>,
    best_effort: bool,
    path: &String,
    src: &str,
) -> anyhow::Result<()> {
    let shape = T::shape();

    if best_effort {
        let (record, errors) = decoder.decode_best_effort(json, &shape);
        for e in &errors {
            print_reports(path, src, e, ReportKind::Warning)?;
        }
        if !errors.is_empty() {
            warn!(count = errors.len(), "some fields kept their default value");
        }
        let result = T::from_record(record);
        println!("Result is: {result:#?}");
        return Ok(());
    }

    let result = match decoder.decode(json, &shape) {
        Ok(record) => T::from_record(record),
        Err(e) => {
            print_reports(path, src, &e, ReportKind::Error)?;
            return Err(e).with_context(|| format!("failed to decode `{path}` as {}", shape.name));
        }
    };

    println!("Result is: {result:#?}");

    Ok(())
}

fn print_reports(
    path: &String,
    src: &str,
    err: &DecodeError,
    kind: ReportKind<'_>,
) -> anyhow::Result<()> {
    for report in report::decode_error(path, err, kind, true) {
        report.print((path, Source::from(src)))?;
    }
    Ok(())
}
