use crate::ConfigError;
use std::env;

/// Variable holding the OCR service key
pub const OCR_API_KEY_VAR: &str = "MISTRAL_API_KEY";

/// Reads the OCR API key, loading a `.env` file first if one is present
pub fn ocr_api_key() -> Result<String, ConfigError> {
    let _ = dotenvy::dotenv();
    read_non_empty(OCR_API_KEY_VAR)
}

fn read_non_empty(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingEnv(name.to_string())),
    }
}
