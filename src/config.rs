//! Configuration types for an analysis run.
//!
//! Every knob lives in [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Setters clamp out-of-range values; `build()`
//! rejects combinations that cannot work.

use crate::error::ReportError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Model used when neither the config nor the environment names one.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Provider used when only a Gemini key is available.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Inline-data limit of the Gemini API (20 MiB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 20 * 1024 * 1024;

/// Configuration for a single analysis request.
///
/// # Example
/// ```rust
/// use anchiano_report::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("gemini-2.5-pro")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// assert_eq!(config.temperature, 0.2);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// LLM model identifier. If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai").
    /// If None along with `provider`, the provider is resolved from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Range 0.0–2.0. Default: 0.3.
    ///
    /// Low enough that scores and classifications stay stable between runs,
    /// high enough that the action plan is not boilerplate.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// A three-dimension report with four tables per dimension regularly
    /// passes 5 000 output tokens.
    pub max_tokens: usize,

    /// Custom system instruction. If None, uses [`crate::prompts::SYSTEM_INSTRUCTION`].
    pub system_prompt: Option<String>,

    /// Timeout of the generative call in seconds. Default: 180.
    pub api_timeout_secs: u64,

    /// Download timeout for profile documents given as URLs. Default: 120.
    pub download_timeout_secs: u64,

    /// Largest document accepted as an inline part. Default: 20 MiB.
    pub max_attachment_bytes: usize,

    /// Optional progress events receiver.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.3,
            max_tokens: 8192,
            system_prompt: None,
            api_timeout_secs: 180,
            download_timeout_secs: 120,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("max_attachment_bytes", &self.max_attachment_bytes)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn AnalysisProgressCallback>"),
            )
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model that will be requested.
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn max_attachment_bytes(mut self, bytes: usize) -> Self {
        self.config.max_attachment_bytes = bytes;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, ReportError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(ReportError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.max_attachment_bytes == 0 {
            return Err(ReportError::InvalidConfig(
                "max_attachment_bytes must be ≥ 1".into(),
            ));
        }
        if let Some(model) = &c.model {
            if model.trim().is_empty() {
                return Err(ReportError::InvalidConfig("model must not be empty".into()));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = AnalysisConfig::default();
        assert_eq!(c.temperature, 0.3);
        assert_eq!(c.effective_model(), DEFAULT_MODEL);
        assert_eq!(c.max_attachment_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn temperature_is_clamped() {
        let c = AnalysisConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = AnalysisConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let err = AnalysisConfig::builder().max_tokens(0).build().unwrap_err();
        assert!(matches!(err, ReportError::InvalidConfig(_)));
    }

    #[test]
    fn blank_model_rejected() {
        assert!(AnalysisConfig::builder().model("  ").build().is_err());
        let c = AnalysisConfig::builder().model("gemini-2.5-pro").build().unwrap();
        assert_eq!(c.effective_model(), "gemini-2.5-pro");
    }

    #[test]
    fn debug_hides_provider() {
        let dbg = format!("{:?}", AnalysisConfig::default());
        assert!(dbg.contains("AnalysisConfig"));
        assert!(dbg.contains("temperature"));
    }
}
