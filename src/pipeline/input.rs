//! Input resolution: a profile document given as a local path or a URL →
//! raw bytes with a name and a MIME type.
//!
//! The provider receives documents inline, so the whole payload is held in
//! memory. Size and PDF magic bytes are checked here, before encoding, so
//! the caller gets a precise error rather than a rejected API request.

use crate::config::AnalysisConfig;
use crate::error::ReportError;
use crate::pipeline::encode;
use crate::profile::Attachment;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// MIME type assumed when the extension says nothing.
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// A document read into memory, not yet encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Guess a MIME type from a file name.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Load a document from a local path or HTTP(S) URL and validate it.
pub async fn load_document(
    input: &str,
    config: &AnalysisConfig,
) -> Result<LoadedDocument, ReportError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ReportError::InvalidInput {
            input: input.to_string(),
        });
    }

    let doc = if is_url(input) {
        download_url(input, config.download_timeout_secs).await?
    } else {
        read_local(input).await?
    };

    validate(&doc, config.max_attachment_bytes)?;
    Ok(doc)
}

/// Load, validate and encode a document as an inline [`Attachment`].
pub async fn load_attachment(
    input: &str,
    config: &AnalysisConfig,
) -> Result<Attachment, ReportError> {
    let doc = load_document(input, config).await?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_attachment_loaded(&doc.name, doc.bytes.len());
    }
    Ok(encode::encode_document(&doc))
}

/// Load several documents concurrently, preserving input order.
///
/// Fails on the first error; already-loaded documents are dropped.
pub async fn load_attachments<S: AsRef<str>>(
    inputs: &[S],
    config: &AnalysisConfig,
) -> Result<Vec<Attachment>, ReportError> {
    let loads = inputs
        .iter()
        .map(|input| load_attachment(input.as_ref(), config));
    let attachments = futures::future::try_join_all(loads).await?;
    info!("Loaded {} profile documents", attachments.len());
    Ok(attachments)
}

/// Reject oversized payloads and PDFs without the `%PDF` header.
pub fn validate(doc: &LoadedDocument, max_bytes: usize) -> Result<(), ReportError> {
    if doc.bytes.len() > max_bytes {
        return Err(ReportError::AttachmentTooLarge {
            name: doc.name.clone(),
            size: doc.bytes.len(),
            limit: max_bytes,
        });
    }
    if doc.mime_type == "application/pdf" && doc.bytes.len() >= 4 && &doc.bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&doc.bytes[..4]);
        return Err(ReportError::NotAPdf {
            name: doc.name.clone(),
            magic,
        });
    }
    Ok(())
}

async fn read_local(path_str: &str) -> Result<LoadedDocument, ReportError> {
    let path = PathBuf::from(path_str);

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ReportError::FileNotFound { path: path.clone() },
        std::io::ErrorKind::PermissionDenied => ReportError::PermissionDenied { path: path.clone() },
        _ => ReportError::Internal(format!("Failed to read {}: {}", path.display(), e)),
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_str.to_string());

    debug!("Read local document: {} ({} bytes)", path.display(), bytes.len());
    Ok(LoadedDocument {
        mime_type: guess_mime(&name).to_string(),
        name,
        bytes,
    })
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<LoadedDocument, ReportError> {
    info!("Downloading profile document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ReportError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ReportError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ReportError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ReportError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let header_mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty() && v != "application/octet-stream");

    let name = extract_filename(url);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ReportError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} ({} bytes)", name, bytes.len());
    Ok(LoadedDocument {
        mime_type: header_mime.unwrap_or_else(|| guess_mime(&name).to_string()),
        name,
        bytes: bytes.to_vec(),
    })
}

/// Last path segment of the URL when it looks like a file name.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "document.pdf".to_string()
}
