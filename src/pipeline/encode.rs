//! Attachment encoding: raw document bytes → base64 inline part.
//!
//! Generative APIs take documents as base64 inline data next to the prompt
//! text. The encoded [`Attachment`] is what the request types store; it is
//! converted to the provider's [`ImageData`] part only when the message is
//! built.

use crate::pipeline::input::LoadedDocument;
use crate::profile::Attachment;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use tracing::debug;

/// Encode a loaded document as a base64 [`Attachment`].
pub fn encode_document(doc: &LoadedDocument) -> Attachment {
    let data = STANDARD.encode(&doc.bytes);
    debug!("Encoded {} → {} bytes base64", doc.name, data.len());

    Attachment {
        data,
        mime_type: doc.mime_type.clone(),
        name: doc.name.clone(),
    }
}

/// Convert an attachment into the provider's inline-data part.
pub fn to_inline_part(attachment: &Attachment) -> ImageData {
    ImageData::new(attachment.data.clone(), attachment.mime_type.clone())
}
