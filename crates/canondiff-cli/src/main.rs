#![allow(clippy::print_stdout, clippy::print_stderr, clippy::exit)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use canondiff::{
    canonicalize, canonicalize_pretty, compare, format_summary, report, PolicyOverride,
    TolerancePolicy, Value,
};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "canondiff", version)]
/// Compare two JSON artifacts with numeric tolerances, or emit the
/// canonical form of one.
struct Cli {
    /// Path to the expected (golden) JSON document.
    expected: PathBuf,
    /// Path to the actual JSON document. Not required with --canonicalize.
    actual: Option<PathBuf>,
    /// Default absolute tolerance for numeric leaves.
    #[arg(long)]
    abs: Option<f64>,
    /// Default relative tolerance for numeric leaves.
    #[arg(long)]
    rel: Option<f64>,
    /// Treat NaN as equal to NaN.
    #[arg(long)]
    nan_equal: bool,
    /// Treat same-signed infinities as equal.
    #[arg(long)]
    inf_equal: bool,
    /// Per-path tolerance override, e.g. `$.metrics[0]=0.1:0.01`.
    /// May be repeated; applies only to the exact path named.
    #[arg(long = "override", value_name = "PATH=ABS:REL")]
    overrides: Vec<String>,
    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
    /// Maximum number of mismatch bullets in the text report.
    #[arg(long)]
    max_examples: Option<usize>,
    /// Print the canonical form of <EXPECTED> and exit.
    #[arg(long)]
    canonicalize: bool,
    /// With --canonicalize, use the pretty (2-space indented) form.
    #[arg(long, requires = "canonicalize")]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn load(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    text.parse::<Value>()
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))
}

fn parse_override(spec: &str) -> Result<(String, PolicyOverride), String> {
    let (path, tolerances) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid override {spec:?}: expected PATH=ABS:REL"))?;
    let (abs, rel) = tolerances
        .split_once(':')
        .ok_or_else(|| format!("invalid override {spec:?}: expected PATH=ABS:REL"))?;
    let abs: f64 = abs
        .parse()
        .map_err(|_| format!("invalid absolute tolerance in override {spec:?}"))?;
    let rel: f64 = rel
        .parse()
        .map_err(|_| format!("invalid relative tolerance in override {spec:?}"))?;
    Ok((
        path.to_string(),
        PolicyOverride {
            abs: Some(abs),
            rel: Some(rel),
            ..PolicyOverride::default()
        },
    ))
}

fn build_policy(cli: &Cli) -> Result<TolerancePolicy, String> {
    let mut builder = TolerancePolicy::builder()
        .nan_equal(cli.nan_equal)
        .inf_equal(cli.inf_equal);
    if let Some(abs) = cli.abs {
        builder = builder.abs(abs);
    }
    if let Some(rel) = cli.rel {
        builder = builder.rel(rel);
    }
    for spec in &cli.overrides {
        let (path, over) = parse_override(spec)?;
        builder = builder.override_path(path, over);
    }
    builder.build().map_err(|err| err.to_string())
}

fn run(cli: &Cli) -> Result<i32, String> {
    let expected = load(&cli.expected)?;

    if cli.canonicalize {
        let encoded = if cli.pretty {
            canonicalize_pretty(&expected)
        } else {
            canonicalize(&expected)
        }
        .map_err(|err| err.to_string())?;
        println!("{encoded}");
        return Ok(report::EXIT_OK);
    }

    let actual_path = cli
        .actual
        .as_ref()
        .ok_or_else(|| String::from("missing <ACTUAL> argument"))?;
    let actual = load(actual_path)?;
    let policy = build_policy(cli)?;
    let result = compare(&expected, &actual, &policy);

    match cli.format {
        Format::Text => println!("{}", format_summary(&result, cli.max_examples)),
        Format::Json => println!("{}", report::to_json(&result)),
    }
    Ok(report::exit_code(&result))
}

fn main() {
    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            report::EXIT_ERROR
        }
    };
    std::process::exit(code);
}
