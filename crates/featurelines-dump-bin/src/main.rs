use clap::{Parser, ValueEnum};
use featurelines_core::{FeatureUriResolver, FeatureWithLines};
use featurelines_test::{fixture_identifiers, load_fixture};
use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "featurelines-dump")]
#[command(about = "Parse URI[:LINE]* feature identifiers and dump the result")]
struct Args {
  /// Identifiers to parse, e.g. `features/login.feature:12:30`
  #[arg(value_name = "IDENTIFIER")]
  identifiers: Vec<String>,

  /// Use a bundled fixture name instead (reads from repo fixtures/)
  #[arg(short, long, value_name = "NAME")]
  fixture: Option<String>,

  /// Resolve relative paths against this directory instead of the working directory
  #[arg(long, value_name = "DIR")]
  base_dir: Option<PathBuf>,

  /// Output format
  #[arg(long, value_enum, default_value_t = Format::Text)]
  format: Format,

  /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
  #[arg(long, default_value = "warn")]
  log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
  Text,
  Json,
}

/// One line of output, parsed or not
#[derive(serde::Serialize)]
struct Dump<'a> {
  input: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  canonical: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  uri: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  lines: Vec<u32>,
  /// The error followed by each of its sources
  #[serde(skip_serializing_if = "Vec::is_empty")]
  errors: Vec<String>,
}

impl<'a> Dump<'a> {
  fn parse(resolver: &FeatureUriResolver, input: &'a str) -> Self {
    match FeatureWithLines::resolve(resolver, input) {
      Ok(feature) => Self {
        input,
        canonical: Some(feature.to_string()),
        uri: Some(feature.uri().to_string()),
        lines: feature.lines().iter().collect(),
        errors: Vec::new(),
      },
      Err(e) => {
        let mut errors = vec![e.to_string()];
        let mut source = e.source();
        while let Some(cause) = source {
          errors.push(cause.to_string());
          source = cause.source();
        }
        Self {
          input,
          canonical: None,
          uri: None,
          lines: Vec::new(),
          errors,
        }
      }
    }
  }

  fn is_ok(&self) -> bool {
    self.errors.is_empty()
  }

  fn print_text(&self) {
    if let (Some(canonical), Some(uri)) = (&self.canonical, &self.uri) {
      println!("{}", self.input);
      println!("  canonical: {canonical}");
      println!("  uri:       {uri}");
      println!("  lines:     {:?}", self.lines);
    } else {
      eprintln!("{}", self.input);
      for (depth, error) in self.errors.iter().enumerate() {
        let label = if depth == 0 { "error" } else { "caused by" };
        eprintln!("  {label}: {error}");
      }
    }
  }
}

fn init_tracing(level: &str) {
  use tracing_subscriber::EnvFilter;

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() -> ExitCode {
  let args = Args::parse();
  init_tracing(&args.log_level);

  let fixture_contents = args.fixture.as_deref().map(load_fixture);
  let inputs: Vec<&str> = match &fixture_contents {
    Some(contents) => fixture_identifiers(contents),
    None => args.identifiers.iter().map(String::as_str).collect(),
  };

  if inputs.is_empty() {
    eprintln!("Provide one or more identifiers or --fixture <name>");
    return ExitCode::from(2);
  }

  let resolver = args
    .base_dir
    .map_or_else(FeatureUriResolver::new, |dir| {
      FeatureUriResolver::new().with_base_dir(dir)
    });
  tracing::debug!(count = inputs.len(), base_dir = ?resolver.base_dir(), "parsing identifiers");

  let dumps: Vec<Dump> = inputs
    .into_iter()
    .map(|input| Dump::parse(&resolver, input))
    .collect();
  let all_ok = dumps.iter().all(Dump::is_ok);

  match args.format {
    Format::Text => dumps.iter().for_each(Dump::print_text),
    Format::Json => match serde_json::to_string_pretty(&dumps) {
      Ok(json) => println!("{json}"),
      Err(e) => {
        eprintln!("Failed to serialize output: {e}");
        return ExitCode::FAILURE;
      }
    },
  }

  if all_ok {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}
