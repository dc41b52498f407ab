//! Error types for the anchiano-report library.
//!
//! Only the glue around the rendering core can fail: loading a profile
//! document, reaching the provider, writing exports. Splitting and rendering
//! are total functions and never produce an error; malformed markdown simply
//! renders as best-effort paragraphs and tables.
//!
//! Upstream failures (network, authentication, quota, timeout) are collapsed
//! into [`ReportError::GenerationFailed`], whose message is the single
//! user-facing text shown by the application. The provider's own detail is
//! kept in the variant and logged, but never displayed.

use std::path::PathBuf;
use thiserror::Error;

/// User-facing message for any failure of the generative call.
pub const GENERATION_FAILED_MESSAGE: &str = "S'ha produït un error de connexió amb l'IA.";

/// All fatal errors returned by the anchiano-report library.
#[derive(Debug, Error)]
pub enum ReportError {
    // ── Attachment errors ─────────────────────────────────────────────────
    /// Profile document was not found at the given path.
    #[error("Profile document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the document.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a usable file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The document claims to be a PDF but does not start with `%PDF`.
    #[error("File is not a valid PDF: '{name}'\nFirst bytes: {magic:?}")]
    NotAPdf { name: String, magic: [u8; 4] },

    /// The document exceeds the inline-data limit of the provider.
    #[error("Document '{name}' is {size} bytes; the limit for inline documents is {limit} bytes")]
    AttachmentTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    // ── Request errors ────────────────────────────────────────────────────
    /// No dimension carries any profile text or document.
    #[error("Nothing to analyse: provide at least one Group or Commission profile")]
    EmptyRequest,

    // ── Provider errors ───────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The generative call failed. No retry, no partial result.
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    GenerationFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an export file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// Provider-side detail of a generation failure, for logs and `--verbose`.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ReportError::GenerationFailed { detail } => Some(detail),
            _ => None,
        }
    }
}
