use std::path::Path;

/// Content types the server knows how to label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mime {
    Html,
    Css,
    JavaScript,
    Png,
    Jpeg,
    Gif,
    Binary,
}

impl Mime {
    /// Classifies a file name by its suffix, ignoring case.
    ///
    /// # Example
    ///
    /// ```
    /// # use serverium::http::mime::Mime;
    /// assert_eq!(Mime::from_file_name("INDEX.HTML"), Mime::Html);
    /// assert_eq!(Mime::from_file_name("photo.jpeg"), Mime::Jpeg);
    /// assert_eq!(Mime::from_file_name("notes.txt"), Mime::Binary);
    /// ```
    pub fn from_file_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.ends_with(".html") {
            Self::Html
        } else if name.ends_with(".css") {
            Self::Css
        } else if name.ends_with(".js") {
            Self::JavaScript
        } else if name.ends_with(".png") {
            Self::Png
        } else if name.ends_with(".jpg") || name.ends_with(".jpeg") {
            Self::Jpeg
        } else if name.ends_with(".gif") {
            Self::Gif
        } else {
            Self::Binary
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Css => "text/css",
            Self::JavaScript => "application/javascript",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Binary => "application/octet-stream",
        }
    }
}

/// Content type for a file name.
pub fn resolve(file_name: &str) -> &'static str {
    Mime::from_file_name(file_name).as_str()
}

/// Content type for the final component of `path`.
pub fn for_path(path: &Path) -> &'static str {
    path.file_name()
        .map(|name| resolve(&name.to_string_lossy()))
        .unwrap_or(Mime::Binary.as_str())
}
