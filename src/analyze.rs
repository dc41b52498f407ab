//! Analysis entry points.
//!
//! [`analyze`] runs the whole pipeline for a request whose documents are
//! already encoded (see [`crate::pipeline::input::load_attachments`]).
//! [`render_report`] skips the provider and only splits an existing report,
//! so exports can be regenerated offline.

use crate::config::{AnalysisConfig, DEFAULT_MODEL, DEFAULT_PROVIDER};
use crate::error::ReportError;
use crate::output::{AnalysisOutput, AnalysisStats};
use crate::pipeline::llm;
use crate::profile::AnalysisRequest;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Generate the Group-vs-Commission report for `request`.
///
/// # Errors
/// - [`ReportError::EmptyRequest`] when no profile carries text or a document
/// - [`ReportError::ProviderNotConfigured`] when no provider can be built
/// - [`ReportError::GenerationFailed`] for any failure of the call itself;
///   its message is the generic text shown to users
///
/// An empty answer from the model is not an error: the report becomes
/// [`llm::NO_REPORT_PLACEHOLDER`] and `stats.placeholder` is set.
pub async fn analyze(
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, ReportError> {
    let total_start = Instant::now();

    if request.is_empty() {
        return Err(ReportError::EmptyRequest);
    }

    let dimensions = request.provided_dimensions();
    let attachments = request.attachments();
    let attachment_bytes: usize = attachments.iter().map(|a| a.decoded_len()).sum();
    info!(
        "Starting analysis: {} dimension(s), {} document(s)",
        dimensions.len(),
        attachments.len()
    );

    let provider = resolve_provider(config)?;
    let model = config.effective_model().to_string();

    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_start(&model, attachments.len());
    }

    let generated = match llm::generate(&provider, request, config).await {
        Ok(g) => g,
        Err(e) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_generation_error(e.detail().unwrap_or_default());
            }
            return Err(e);
        }
    };

    let report = generated.report;
    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_complete(report.len());
    }

    let stats = AnalysisStats {
        model: Some(model),
        attachments: attachments.len(),
        attachment_bytes,
        input_tokens: generated.input_tokens,
        output_tokens: generated.output_tokens,
        duration_ms: total_start.elapsed().as_millis() as u64,
        placeholder: generated.placeholder,
    };

    let output = AnalysisOutput::new(report, stats);
    info!(
        "Analysis complete: {} page(s), {} bytes in {}ms",
        output.pages.len(),
        output.report.len(),
        output.stats.duration_ms
    );
    Ok(output)
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, ReportError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ReportError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze(request, config))
}

/// Split an existing report without calling a provider.
///
/// The report text is kept byte for byte; only the paginated copy is cleaned.
pub fn render_report(report: &str) -> AnalysisOutput {
    debug!("Rendering stored report ({} bytes)", report.len());
    AnalysisOutput::new(report.to_string(), AnalysisStats::default())
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, ReportError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ReportError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider** (`config.provider_name`) with the effective model;
///    the factory reads the matching API key from the environment.
/// 3. **Environment pair** `ANCHIANO_LLM_PROVIDER` + `ANCHIANO_MODEL`, both
///    non-empty.
/// 4. **Gemini** when `GEMINI_API_KEY` is set, with the effective model.
/// 5. **Auto-detection** via `ProviderFactory::from_env`.
fn resolve_provider(config: &AnalysisConfig) -> Result<Arc<dyn LLMProvider>, ReportError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, config.effective_model());
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("ANCHIANO_LLM_PROVIDER"),
        std::env::var("ANCHIANO_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            return create_provider(DEFAULT_PROVIDER, config.effective_model());
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ReportError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY (default model {}) or pass --provider.\n\
                Error: {}",
                DEFAULT_MODEL, e
            ),
        })?;

    Ok(llm_provider)
}
