//! Progress-callback trait for analysis events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress_callback`] to be told when
//! documents are loaded and when the generative call starts and ends. The
//! CLI uses it to drive a spinner; a GUI host can use it to toggle its
//! loading state.
//!
//! # Example
//!
//! ```rust
//! use anchiano_report::{AnalysisConfig, AnalysisProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
//!
//! struct LoadingFlag(AtomicBool);
//!
//! impl AnalysisProgressCallback for LoadingFlag {
//!     fn on_generation_start(&self, _model: &str, _attachments: usize) {
//!         self.0.store(true, Ordering::SeqCst);
//!     }
//!     fn on_generation_complete(&self, _report_len: usize) {
//!         self.0.store(false, Ordering::SeqCst);
//!     }
//! }
//!
//! let flag = Arc::new(LoadingFlag(AtomicBool::new(false)));
//! let config = AnalysisConfig::builder()
//!     .progress_callback(flag as Arc<dyn AnalysisProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the analysis pipeline as it progresses.
///
/// Implementations must be `Send + Sync`: attachments are loaded
/// concurrently, so `on_attachment_loaded` may be called from several tasks.
/// All methods default to no-ops.
pub trait AnalysisProgressCallback: Send + Sync {
    /// A profile document was read and encoded.
    ///
    /// # Arguments
    /// * `name`  — display name of the document
    /// * `bytes` — raw (decoded) size
    fn on_attachment_loaded(&self, name: &str, bytes: usize) {
        let _ = (name, bytes);
    }

    /// The request is about to be sent.
    fn on_generation_start(&self, model: &str, attachments: usize) {
        let _ = (model, attachments);
    }

    /// The provider answered; `report_len` is the byte length of the report.
    fn on_generation_complete(&self, report_len: usize) {
        let _ = report_len;
    }

    /// The provider call failed. `error` is the provider-side detail.
    fn on_generation_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        loaded_bytes: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: Mutex<Vec<String>>,
    }

    impl AnalysisProgressCallback for TrackingCallback {
        fn on_attachment_loaded(&self, _name: &str, bytes: usize) {
            self.loaded_bytes.fetch_add(bytes, Ordering::SeqCst);
        }

        fn on_generation_start(&self, _model: &str, _attachments: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_generation_complete(&self, _report_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_generation_error(&self, error: &str) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_attachment_loaded("grup.pdf", 1024);
        cb.on_generation_start("gemini-3-flash-preview", 1);
        cb.on_generation_complete(42);
        cb.on_generation_error("timeout");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_attachment_loaded("grup.pdf", 100);
        tracker.on_attachment_loaded("comissio.pdf", 50);
        tracker.on_generation_start("gemini-3-flash-preview", 2);
        tracker.on_generation_error("401 unauthorized");

        assert_eq!(tracker.loaded_bytes.load(Ordering::SeqCst), 150);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 0);
        assert_eq!(tracker.errors.lock().unwrap().as_slice(), ["401 unauthorized"]);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_generation_start("gemini-2.5-pro", 0);
        cb.on_generation_complete(512);
    }
}
