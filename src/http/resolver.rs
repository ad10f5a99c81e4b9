//! Request path resolution
//!
//! Maps a raw request path onto the served directory and classifies the
//! result before any response bytes are written. Every file handed back
//! is guaranteed to live under the canonical serve root, including after
//! symlinks are followed.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// File served for `/`.
pub const INDEX_FILE: &str = "index.html";

/// Canonical, existing directory that bounds every servable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeRoot {
    path: PathBuf,
}

impl ServeRoot {
    pub async fn new(path: &Path) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDirectory(path.to_path_buf());

        let canonical = tokio::fs::canonicalize(path).await.map_err(|_| invalid())?;
        let meta = tokio::fs::metadata(&canonical).await.map_err(|_| invalid())?;
        if !meta.is_dir() {
            return Err(invalid());
        }

        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A file directly inside the root, such as `403.html`.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// Classification of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    ServeFile(PathBuf),
    Forbidden,
    NotFound,
}

/// Resolves `request_path` against `root`.
///
/// `/` maps to `index.html`. Anything else has its leading `/` removed and
/// is joined onto the root. Directories are forbidden, missing entries are
/// not found, and any path that would leave the root is forbidden.
pub async fn resolve(request_path: &str, root: &ServeRoot) -> ResolvedTarget {
    let relative = if request_path == "/" {
        INDEX_FILE
    } else {
        request_path.strip_prefix('/').unwrap_or(request_path)
    };

    let Some(relative) = contained_relative(relative) else {
        return ResolvedTarget::Forbidden;
    };
    let candidate = root.path().join(relative);

    let canonical = match tokio::fs::canonicalize(&candidate).await {
        Ok(path) => path,
        Err(e) => return classify_error(e.kind()),
    };

    // Symlinks may still point outside the tree.
    if !canonical.starts_with(root.path()) {
        return ResolvedTarget::Forbidden;
    }

    // The requested name, not the link target's, decides the content type.
    match tokio::fs::metadata(&canonical).await {
        Ok(meta) if meta.is_dir() => ResolvedTarget::Forbidden,
        Ok(_) => ResolvedTarget::ServeFile(candidate),
        Err(e) => classify_error(e.kind()),
    }
}

/// Normalizes `.` and `..` lexically. Returns `None` when the path climbs
/// above its starting point or carries an absolute/prefix component.
fn contained_relative(relative: &str) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(normalized)
}

fn classify_error(kind: ErrorKind) -> ResolvedTarget {
    match kind {
        ErrorKind::PermissionDenied => ResolvedTarget::Forbidden,
        _ => ResolvedTarget::NotFound,
    }
}
