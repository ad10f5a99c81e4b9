use std::path::{Path, PathBuf};

use crate::error::LogError;
use crate::logbook::codec;

/// Extension every saved log carries.
pub const LOG_EXTENSION: &str = ".srep";

const DEFAULT_SECRET: &str = "shravan";

/// The text of the log view, plus the marker used when saving it.
#[derive(Debug, Clone)]
pub struct LogDocument {
    text: String,
    secret: String,
}

impl Default for LogDocument {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET)
    }
}

impl LogDocument {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            secret: secret.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Adds one line.
    pub fn append(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Encodes the current text to `path`, adding `.srep` when the name
    /// lacks it. Returns the absolute path written.
    pub async fn save(&mut self, path: &Path) -> Result<PathBuf, LogError> {
        let path = with_log_extension(path);
        let path = std::path::absolute(&path).unwrap_or(path);

        let encoded = codec::encode(&self.text, &self.secret);
        tokio::fs::write(&path, encoded)
            .await
            .map_err(LogError::Save)?;

        tracing::info!(path = %path.display(), "Saved log");
        self.append(&format!("Logs saved as: {}", path.display()));
        Ok(path)
    }

    /// Replaces the text with the decoded contents of a `.srep` file.
    /// On any error the current text is left as it was.
    pub async fn load(&mut self, path: &Path) -> Result<PathBuf, LogError> {
        if !has_log_extension(path) {
            return Err(LogError::WrongExtension(path.to_path_buf()));
        }
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(LogError::Open)?;
        // The blob may have been wrapped over several lines.
        let joined: String = raw.lines().collect();
        let decoded = codec::decode(&joined, &self.secret)?;

        tracing::info!(path = %path.display(), "Loaded log");
        self.text = decoded;
        self.append(&format!("Logs viewed from: {}", path.display()));
        Ok(path)
    }
}

fn has_log_extension(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(LOG_EXTENSION))
}

fn with_log_extension(path: &Path) -> PathBuf {
    if has_log_extension(path) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(LOG_EXTENSION);
    PathBuf::from(name)
}
