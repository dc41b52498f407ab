//! # anchiano-report
//!
//! Compare a Group's ideal profile with a Commission's actual profile using
//! the D'Anchiano methodology, and render the generated report as paginated,
//! SWOT-styled HTML.
//!
//! ## Pipeline Overview
//!
//! ```text
//! profiles (text + documents)
//!  │
//!  ├─ 1. Input    read local files or download URLs, check size / PDF magic
//!  ├─ 2. Encode   bytes → base64 inline parts
//!  ├─ 3. Generate one call to gemini / openai / … with the analyst prompt
//!  ├─ 4. Clean    strip fences, CRLF, invisible characters
//!  ├─ 5. Split    one page per dimension ([[PAGE_BREAK]] or headings)
//!  └─ 6. Render   HTML fragments, printable document, md / tex / py exports
//! ```
//!
//! Steps 5 and 6 are pure and never fail; they also run on stored reports
//! through [`render_report`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anchiano_report::{analyze, AnalysisConfig, AnalysisRequest, Dimension, Profile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY and friends
//!     let mut request = AnalysisRequest::default();
//!     let values = request.dimension_mut(Dimension::Values);
//!     values.group = Profile::from_text("Cooperació, rigor, servei públic");
//!     values.commission = Profile::from_text("Competitivitat, rapidesa");
//!
//!     let output = analyze(&request, &AnalysisConfig::default()).await?;
//!     for page in output.render_pages() {
//!         println!("{page}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `anchiano` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod progress;
pub mod prompts;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_sync, render_report};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_MODEL};
pub use error::{ReportError, GENERATION_FAILED_MESSAGE};
pub use export::{write_exports, Export, ExportFormat};
pub use output::{AnalysisOutput, AnalysisStats};
pub use pipeline::llm::NO_REPORT_PLACEHOLDER;
pub use profile::{AnalysisRequest, Attachment, Dimension, DimensionProfiles, Profile};
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{render_document, render_markdown, render_pages, split_pages, PAGE_BREAK};
