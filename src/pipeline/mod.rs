//! Pipeline stages for one analysis request.
//!
//! Each submodule implements one step and is tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ llm ──▶ postprocess ──▶ report::split
//! (path/URL)  (base64)  (provider) (cleanup)
//! ```
//!
//! 1. [`input`]  — read or download profile documents, check size and PDF
//!    magic; several documents load concurrently
//! 2. [`encode`] — base64-wrap each document as an inline part
//! 3. [`llm`]    — one provider call with a timeout; the only stage that
//!    talks to the model
//! 4. [`postprocess`] — deterministic cleanup of transport quirks (outer
//!    fences, CRLF, invisible characters)

pub mod encode;
pub mod input;
pub mod llm;
pub mod postprocess;
