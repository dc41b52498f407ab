//! CLI binary for anchiano-report.
//!
//! A thin shim over the library crate that maps CLI flags to an
//! `AnalysisRequest` + `AnalysisConfig`, runs the analysis (or renders a
//! stored report) and prints or writes the results.

use anchiano_report::pipeline::input::load_attachments;
use anchiano_report::{
    analyze, render_report, write_exports, AnalysisConfig, AnalysisOutput,
    AnalysisProgressCallback, AnalysisRequest, Dimension, ExportFormat, ProgressCallback,
    ReportError, DEFAULT_MODEL,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while documents load and the model
/// writes, with one log line per loaded document.
struct CliProgressCallback {
    bar: ProgressBar,
    started: Instant,
    documents: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading profiles…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Arc<Self> {
        Arc::new(Self {
            bar,
            started: Instant::now(),
            documents: AtomicUsize::new(0),
        })
    }

    /// Stop and erase the spinner unless a callback already did.
    fn clear(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl AnalysisProgressCallback for CliProgressCallback {
    fn on_attachment_loaded(&self, name: &str, bytes: usize) {
        self.documents.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {:<32}  {}",
            green("✓"),
            name,
            dim(&format!("{:>8} bytes", bytes)),
        ));
    }

    fn on_generation_start(&self, model: &str, attachments: usize) {
        self.bar.set_prefix("Analysing");
        self.bar.set_message(format!("{model}  ({attachments} documents)"));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating report with {model}…"))
        ));
    }

    fn on_generation_complete(&self, report_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Report generated  {}  {}",
            green("✔"),
            dim(&format!("{report_len} chars")),
            dim(&format!("{:.1}s", self.started.elapsed().as_secs_f64())),
        );
    }

    fn on_generation_error(&self, _error: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", red("✘"), red("Generation failed"));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Compare the values of a group and a commission (report on stdout)
  anchiano --group-values "Cooperació, rigor" --commission-values "Rapidesa, competència"

  # Profiles from documents, all exports into ./informe
  anchiano --group-competencies-file grup.pdf \
           --commission-competencies-file https://example.org/comissio.pdf \
           -o informe

  # Only LaTeX and the printable HTML
  anchiano --group-personality-file g.pdf --commission-personality-file c.pdf \
           -o informe --formats tex,html

  # Re-render a stored report without calling the model
  anchiano --render informe/diagnostic-anchiano.md --html > informe.html

  # JSON output (report, pages, stats)
  anchiano --group-values "..." --commission-values "..." --json

EXPORTS:
  md    diagnostic-anchiano.md    the report, verbatim
  tex   diagnostic-anchiano.tex   article with sections and bold (tables flattened)
  py    diagnosi_anchiano.py      script printing the report
  html  diagnostic-anchiano.html  printable document, one page per dimension

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  ANCHIANO_LLM_PROVIDER   Override provider (gemini, openai, anthropic, ollama)
  ANCHIANO_MODEL          Override model ID
"#;

/// Compare a Group's ideal profile with a Commission's actual profile.
#[derive(Parser, Debug)]
#[command(
    name = "anchiano",
    version,
    about = "Generate D'Anchiano Group-vs-Commission diagnostic reports",
    long_about = "Compare a Group's ideal profile with a Commission's actual profile across \
competencies, values and personality, using a generative model. Profiles are given as text or \
as documents (local files or URLs). The report is split into one page per dimension and \
exported to Markdown, LaTeX, a Python script or printable HTML.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    // ── Profiles ──────────────────────────────────────────────────────────
    /// Group (ideal) competencies, as text.
    #[arg(long, env = "ANCHIANO_GROUP_COMPETENCIES")]
    group_competencies: Option<String>,

    /// Group (ideal) competencies document: path or URL.
    #[arg(long, env = "ANCHIANO_GROUP_COMPETENCIES_FILE")]
    group_competencies_file: Option<String>,

    /// Commission (actual) competencies, as text.
    #[arg(long, env = "ANCHIANO_COMMISSION_COMPETENCIES")]
    commission_competencies: Option<String>,

    /// Commission (actual) competencies document: path or URL.
    #[arg(long, env = "ANCHIANO_COMMISSION_COMPETENCIES_FILE")]
    commission_competencies_file: Option<String>,

    /// Group (ideal) values, as text.
    #[arg(long, env = "ANCHIANO_GROUP_VALUES")]
    group_values: Option<String>,

    /// Group (ideal) values document: path or URL.
    #[arg(long, env = "ANCHIANO_GROUP_VALUES_FILE")]
    group_values_file: Option<String>,

    /// Commission (actual) values, as text.
    #[arg(long, env = "ANCHIANO_COMMISSION_VALUES")]
    commission_values: Option<String>,

    /// Commission (actual) values document: path or URL.
    #[arg(long, env = "ANCHIANO_COMMISSION_VALUES_FILE")]
    commission_values_file: Option<String>,

    /// Group (ideal) personality, as text.
    #[arg(long, env = "ANCHIANO_GROUP_PERSONALITY")]
    group_personality: Option<String>,

    /// Group (ideal) personality document: path or URL.
    #[arg(long, env = "ANCHIANO_GROUP_PERSONALITY_FILE")]
    group_personality_file: Option<String>,

    /// Commission (actual) personality, as text.
    #[arg(long, env = "ANCHIANO_COMMISSION_PERSONALITY")]
    commission_personality: Option<String>,

    /// Commission (actual) personality document: path or URL.
    #[arg(long, env = "ANCHIANO_COMMISSION_PERSONALITY_FILE")]
    commission_personality_file: Option<String>,

    // ── Generation ────────────────────────────────────────────────────────
    /// LLM model ID.
    #[arg(
        long,
        env = "ANCHIANO_MODEL",
        long_help = "Generative model to use. Default: gemini-3-flash-preview.\n\
          The model must accept inline PDF documents when profile files are given."
    )]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(
        long,
        env = "ANCHIANO_LLM_PROVIDER",
        long_help = "LLM provider. Gemini when GEMINI_API_KEY is set, otherwise \
          auto-detected from API key env vars."
    )]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "ANCHIANO_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "ANCHIANO_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// LLM call timeout in seconds.
    #[arg(long, env = "ANCHIANO_API_TIMEOUT", default_value_t = 180)]
    api_timeout: u64,

    /// HTTP download timeout in seconds for profile documents given as URLs.
    #[arg(long, env = "ANCHIANO_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "ANCHIANO_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    // ── Output ────────────────────────────────────────────────────────────
    /// Render an existing report file instead of calling the model.
    #[arg(long, value_name = "REPORT_MD")]
    render: Option<PathBuf>,

    /// Write exports into this directory instead of printing to stdout.
    #[arg(short, long, env = "ANCHIANO_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Export formats for --output-dir: md, tex, py, html (comma-separated).
    #[arg(long, env = "ANCHIANO_FORMATS", default_value = "md,tex,py,html")]
    formats: String,

    /// Print the printable HTML document instead of the report markdown.
    #[arg(long, conflicts_with = "json")]
    html: bool,

    /// Output structured JSON (AnalysisOutput) instead of markdown.
    #[arg(long, env = "ANCHIANO_JSON")]
    json: bool,

    /// Disable progress spinner.
    #[arg(long, env = "ANCHIANO_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ANCHIANO_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ANCHIANO_QUIET")]
    quiet: bool,
}

/// Which side of the comparison a profile belongs to.
#[derive(Clone, Copy, Debug)]
enum Side {
    Group,
    Commission,
}

impl Cli {
    /// Text and document flags, one entry per (dimension, side).
    fn profile_flags(&self) -> [(Dimension, Side, Option<&String>, Option<&String>); 6] {
        [
            (
                Dimension::Competencies,
                Side::Group,
                self.group_competencies.as_ref(),
                self.group_competencies_file.as_ref(),
            ),
            (
                Dimension::Competencies,
                Side::Commission,
                self.commission_competencies.as_ref(),
                self.commission_competencies_file.as_ref(),
            ),
            (
                Dimension::Values,
                Side::Group,
                self.group_values.as_ref(),
                self.group_values_file.as_ref(),
            ),
            (
                Dimension::Values,
                Side::Commission,
                self.commission_values.as_ref(),
                self.commission_values_file.as_ref(),
            ),
            (
                Dimension::Personality,
                Side::Group,
                self.group_personality.as_ref(),
                self.group_personality_file.as_ref(),
            ),
            (
                Dimension::Personality,
                Side::Commission,
                self.commission_personality.as_ref(),
                self.commission_personality_file.as_ref(),
            ),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.render.is_none();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let formats = ExportFormat::parse_list(&cli.formats).context("Invalid --formats")?;

    // ── Render-only mode ─────────────────────────────────────────────────
    if let Some(ref path) = cli.render {
        let report = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read report from {:?}", path))?;
        let output = render_report(&report);
        return emit(&cli, &output, &formats).await;
    }

    // ── Build config + request ───────────────────────────────────────────
    let spinner = show_progress.then(CliProgressCallback::new);
    let (config, request) = prepare(&cli, spinner.as_ref()).await?;

    // ── Run analysis ─────────────────────────────────────────────────────
    let output = match analyze(&request, &config).await {
        Ok(output) => output,
        Err(e) => {
            if let Some(ref cb) = spinner {
                cb.clear();
            }
            if cli.verbose {
                if let Some(detail) = e.detail() {
                    eprintln!("{} {}", dim("provider said:"), detail);
                }
            }
            return Err(anyhow::Error::new(e).context("Analysis failed"));
        }
    };

    emit(&cli, &output, &formats).await?;

    if !cli.quiet && !cli.json {
        let s = &output.stats;
        eprintln!(
            "   {} pages  /  {} tokens in  /  {} tokens out  —  {}ms total",
            output.pages.len(),
            dim(&s.input_tokens.to_string()),
            dim(&s.output_tokens.to_string()),
            s.duration_ms,
        );
        if s.placeholder {
            eprintln!("{} the model returned an empty report", cyan("⚠"));
        }
    }

    Ok(())
}

/// Write exports to `--output-dir`, or print to stdout.
async fn emit(cli: &Cli, output: &AnalysisOutput, formats: &[ExportFormat]) -> Result<()> {
    if let Some(ref dir) = cli.output_dir {
        let paths = write_exports(&output.report, dir, formats)
            .await
            .context("Failed to write exports")?;
        if !cli.quiet {
            for p in &paths {
                eprintln!("{}  {}", green("✔"), bold(&p.display().to_string()));
            }
        }
        return Ok(());
    }

    let text = if cli.json {
        serde_json::to_string_pretty(output).context("Failed to serialise output")?
    } else if cli.html {
        output.to_html()
    } else {
        output.report.clone()
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

/// Build config and request, clearing the spinner if either fails.
async fn prepare(
    cli: &Cli,
    spinner: Option<&Arc<CliProgressCallback>>,
) -> Result<(AnalysisConfig, AnalysisRequest)> {
    let progress = spinner.map(|cb| Arc::clone(cb) as ProgressCallback);
    let prepared = async {
        let config = build_config(cli, progress).await?;
        let request = build_request(cli, &config).await?;
        Ok::<_, anyhow::Error>((config, request))
    }
    .await;

    if prepared.is_err() {
        if let Some(cb) = spinner {
            cb.clear();
        }
    }
    prepared
}

/// Map CLI args to `AnalysisConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;
    tracing::debug!("Model: {}", config.model.as_deref().unwrap_or(DEFAULT_MODEL));
    Ok(config)
}

/// Map profile flags to an `AnalysisRequest`, loading documents concurrently.
async fn build_request(cli: &Cli, config: &AnalysisConfig) -> Result<AnalysisRequest> {
    let flags = cli.profile_flags();
    let mut request = AnalysisRequest::default();

    let mut slots = Vec::new();
    let mut inputs = Vec::new();
    for (dimension, side, text, file) in flags.iter() {
        let profiles = request.dimension_mut(*dimension);
        let profile = match side {
            Side::Group => &mut profiles.group,
            Side::Commission => &mut profiles.commission,
        };
        if let Some(text) = text {
            profile.text = text.to_string();
        }
        if let Some(file) = file {
            slots.push((*dimension, *side));
            inputs.push(file.as_str());
        }
    }

    let attachments = load_attachments(&inputs, config)
        .await
        .context("Failed to load profile documents")?;

    for ((dimension, side), attachment) in slots.into_iter().zip(attachments) {
        let profiles = request.dimension_mut(dimension);
        match side {
            Side::Group => profiles.group.attachment = Some(attachment),
            Side::Commission => profiles.commission.attachment = Some(attachment),
        }
    }

    if request.is_empty() {
        return Err(ReportError::EmptyRequest).context("No profiles given");
    }
    Ok(request)
}
