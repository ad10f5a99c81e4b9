//! `.srep` log encoding
//!
//! A saved log is the base64 of `secret + text`. This only hides the log
//! from casual viewing; it is not encryption.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::LogError;

pub fn encode(plain_text: &str, secret: &str) -> String {
    let mut combined = String::with_capacity(secret.len() + plain_text.len());
    combined.push_str(secret);
    combined.push_str(plain_text);
    STANDARD.encode(combined.as_bytes())
}

/// Reverses [`encode`], then removes the first occurrence of `secret`
/// wherever it appears in the decoded text.
pub fn decode(encoded: &str, secret: &str) -> Result<String, LogError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| LogError::Malformed(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| LogError::Malformed(e.to_string()))?;
    Ok(text.replacen(secret, "", 1))
}
