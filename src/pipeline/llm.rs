//! Generative call: build the multimodal request and send it once.
//!
//! Prompt wording lives in [`crate::prompts`]; this module only assembles
//! messages, applies the timeout and maps failures.
//!
//! There is no retry. A failed call surfaces as
//! [`ReportError::GenerationFailed`] with the provider's detail attached for
//! logging, and the caller keeps whatever report it already had.

use crate::config::AnalysisConfig;
use crate::error::ReportError;
use crate::pipeline::encode::to_inline_part;
use crate::profile::AnalysisRequest;
use crate::prompts::{build_user_prompt, SYSTEM_INSTRUCTION};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Stored in place of the report when the model returns no text.
pub const NO_REPORT_PLACEHOLDER: &str = "Informe no generat.";

/// Raw result of one generative call.
#[derive(Debug, Clone)]
pub struct Generated {
    pub report: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
    /// True when the model returned nothing and the placeholder was used.
    pub placeholder: bool,
}

/// Send the analysis request to the provider.
///
/// ## Message Layout
///
/// 1. **System message** — the analyst instruction (or the configured override)
/// 2. **User message** — the assembled prompt text with every attached
///    profile document as an inline part, in dimension order
pub async fn generate(
    provider: &Arc<dyn LLMProvider>,
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<Generated, ReportError> {
    let start = Instant::now();
    let messages = build_messages(request, config);
    let options = build_options(config);

    let call = provider.chat(&messages, Some(&options));
    let response = match tokio::time::timeout(Duration::from_secs(config.api_timeout_secs), call).await
    {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            let detail = e.to_string();
            warn!("Generation failed: {}", detail);
            return Err(ReportError::GenerationFailed { detail });
        }
        Err(_) => {
            let detail = format!("no response within {}s", config.api_timeout_secs);
            warn!("Generation failed: {}", detail);
            return Err(ReportError::GenerationFailed { detail });
        }
    };

    let duration = start.elapsed();
    debug!(
        "{} input tokens, {} output tokens, {:?}",
        response.prompt_tokens, response.completion_tokens, duration
    );

    let placeholder = response.content.trim().is_empty();
    let report = if placeholder {
        warn!("Model returned an empty report");
        NO_REPORT_PLACEHOLDER.to_string()
    } else {
        response.content
    };

    Ok(Generated {
        report,
        input_tokens: response.prompt_tokens,
        output_tokens: response.completion_tokens,
        duration_ms: duration.as_millis() as u64,
        placeholder,
    })
}

/// Assemble the system and user turns for a request.
pub fn build_messages(request: &AnalysisRequest, config: &AnalysisConfig) -> Vec<ChatMessage> {
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(SYSTEM_INSTRUCTION);

    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user_with_images(build_user_prompt(request), inline_parts(request)),
    ]
}

/// Every attached document of the request, as inline parts.
fn inline_parts(request: &AnalysisRequest) -> Vec<ImageData> {
    request
        .attachments()
        .into_iter()
        .map(to_inline_part)
        .collect()
}

/// Build `CompletionOptions` from the analysis config.
fn build_options(config: &AnalysisConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
