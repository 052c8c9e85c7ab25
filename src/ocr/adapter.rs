//! Normalization of OCR responses

use crate::ocr::{OcrError, OcrPages};
use serde_json::Value;

/// Turns a raw OCR response into per-page text
pub trait OcrResponseAdapter: Send + Sync {
    fn pages(&self, raw: &Value) -> Result<OcrPages, OcrError>;
}

/// Adapter for Mistral's document OCR responses
///
/// Expects `{"pages": [...]}`. Each page is an object carrying `markdown`
/// (or `text` in older payloads) or a bare string. A page without either
/// counts as empty; a `null` page list as no pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct MistralAdapter;

impl OcrResponseAdapter for MistralAdapter {
    fn pages(&self, raw: &Value) -> Result<OcrPages, OcrError> {
        let pages = match raw.get("pages") {
            Some(Value::Array(pages)) => pages,
            Some(Value::Null) => return Ok(OcrPages::default()),
            Some(_) => return Err(unexpected(raw, "\"pages\" is not an array")),
            None => return Err(unexpected(raw, "no \"pages\" field")),
        };

        let pages = pages
            .iter()
            .map(|page| match page {
                Value::String(text) => text.clone(),
                Value::Object(fields) => fields
                    .get("markdown")
                    .or_else(|| fields.get("text"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            })
            .collect();

        Ok(OcrPages { pages })
    }
}

fn unexpected(raw: &Value, reason: &str) -> OcrError {
    OcrError::UnexpectedShape {
        reason: reason.to_string(),
        raw: raw.to_string(),
    }
}
