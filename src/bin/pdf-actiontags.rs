//! CLI binary for pdf-actiontags.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `FilterConfig`, loads the JSON inputs and prints the filtered result.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_actiontags::pipeline::input::{load_metadata, load_records, write_json};
use pdf_actiontags::{
    apply_pdf_actiontags, FieldDescriptor, FilterConfig, FilterOutput, RecordData, RenderMode,
    UnmatchedEnumPolicy,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Blank-form pass (no data file ⇒ empty template)
  pdf-actiontags metadata.json

  # Form with saved data, written to a file
  pdf-actiontags metadata.json --data record.json -o filtered.json

  # Full report: decisions, value edits, issues
  pdf-actiontags metadata.json --data record.json --report

  # Treat 'checkbox' as enumerated, blank out values with no label
  pdf-actiontags metadata.json --data record.json \
      --enum-types sql,select,radio,checkbox --unmatched-enum blank

INPUT FORMAT:
  metadata.json   [ { "field_name": "...", "element_type": "...",
                      "element_enum": "...", "element_label": "...",
                      "element_note": "...", "misc": "...", ... }, ... ]
  record.json     { "<record>": { "<event>": { "<field>": "<value>" } } }

OUTPUT FORMAT:
  { "metadata": [ ...included fields... ], "data": { ...rewritten records... } }
  With --report the complete FilterOutput is written instead.

ENVIRONMENT VARIABLES:
  RUST_LOG                  Override log filter (e.g. pdf_actiontags=debug)
"#;

/// Apply PDF action tags to form metadata and record data.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-actiontags",
    version,
    about = "Apply PDF action tags to form metadata and record data",
    long_about = "Reads form field metadata (JSON) and optional record data, interprets the \
@HIDDEN-PDF / @PDF-* action tags in each field's annotation, and writes the filtered metadata \
and rewritten data ready for PDF rendering.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JSON array of field descriptors.
    metadata: PathBuf,

    /// JSON record data; omit for an empty-template pass.
    #[arg(short, long, env = "PDF_ACTIONTAGS_DATA")]
    data: Option<PathBuf>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long, env = "PDF_ACTIONTAGS_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendering mode: auto-detect from the data, or force one.
    #[arg(long, env = "PDF_ACTIONTAGS_MODE", value_enum, default_value = "auto")]
    mode: ModeArg,

    /// What to write for stored values with no enum label.
    #[arg(long, env = "PDF_ACTIONTAGS_UNMATCHED_ENUM", value_enum, default_value = "pass-through")]
    unmatched_enum: UnmatchedArg,

    /// Comma-separated enumerated element types.
    #[arg(long, env = "PDF_ACTIONTAGS_ENUM_TYPES", value_delimiter = ',',
          default_value = "sql,select,radio")]
    enum_types: Vec<String>,

    /// Element type assigned by @PDF-NOENUM / @PDF-DATANOENUM.
    #[arg(long, env = "PDF_ACTIONTAGS_TEXT_TYPE", default_value = "text")]
    text_type: String,

    /// Upper bound on @PDF-WHITESPACE lines.
    #[arg(long, env = "PDF_ACTIONTAGS_MAX_WHITESPACE", default_value_t = 200)]
    max_whitespace: u32,

    /// Write the full report (decisions, edits, issues) instead of metadata + data.
    #[arg(long, env = "PDF_ACTIONTAGS_REPORT")]
    report: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_ACTIONTAGS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_ACTIONTAGS_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Auto,
    Empty,
    Data,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum UnmatchedArg {
    PassThrough,
    Blank,
}

impl From<UnmatchedArg> for UnmatchedEnumPolicy {
    fn from(v: UnmatchedArg) -> Self {
        match v {
            UnmatchedArg::PassThrough => UnmatchedEnumPolicy::PassThrough,
            UnmatchedArg::Blank => UnmatchedEnumPolicy::Blank,
        }
    }
}

/// What the renderer consumes: filtered metadata plus rewritten data.
#[derive(Serialize)]
struct RenderPayload<'a> {
    metadata: &'a [FieldDescriptor],
    data: &'a RecordData,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Issues are already listed by the summary; library warnings only show
    // up in verbose mode or through RUST_LOG.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load inputs ──────────────────────────────────────────────────────
    let fields = load_metadata(&cli.metadata).context("Failed to load metadata")?;
    let records = match cli.data {
        Some(ref path) => load_records(path).context("Failed to load record data")?,
        None => RecordData::new(),
    };

    // ── Run the pass ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let output = apply_pdf_actiontags(&fields, records, &config);

    // ── Write result ─────────────────────────────────────────────────────
    if let Some(ref path) = cli.output {
        let written = if cli.report {
            write_json(path, &output)
        } else {
            write_json(path, &payload(&output))
        };
        written.context("Failed to write output")?;
    } else {
        let json = if cli.report {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string_pretty(&payload(&output))
        }
        .context("Failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    }

    if !cli.quiet {
        print_summary(&output);
    }

    Ok(())
}

fn payload(output: &FilterOutput) -> RenderPayload<'_> {
    RenderPayload {
        metadata: &output.fields,
        data: &output.records,
    }
}

/// Map CLI args to `FilterConfig`.
fn build_config(cli: &Cli) -> Result<FilterConfig> {
    let mut builder = FilterConfig::builder()
        .enum_types(cli.enum_types.iter().map(|t| t.trim().to_string()))
        .text_type(cli.text_type.clone())
        .max_whitespace_lines(cli.max_whitespace)
        .unmatched_enum(cli.unmatched_enum.into());

    builder = match cli.mode {
        ModeArg::Auto => builder,
        ModeArg::Empty => builder.mode(RenderMode::EmptyTemplate),
        ModeArg::Data => builder.mode(RenderMode::WithData),
    };

    builder.build().context("Invalid configuration")
}

fn print_summary(output: &FilterOutput) {
    let stats = &output.report.stats;
    let mode = match output.report.mode {
        RenderMode::EmptyTemplate => "empty template",
        RenderMode::WithData => "with data",
    };
    eprintln!(
        "{} {}/{} fields kept  {}",
        green("✔"),
        stats.included_fields,
        stats.total_fields,
        dim(&format!(
            "({mode}, {} retyped, {} values rewritten)",
            stats.retyped_fields, stats.values_rewritten
        )),
    );
    for issue in &output.report.issues {
        eprintln!("  {} {}", yellow("⚠"), issue);
    }
}
