use std::io;
use std::path::PathBuf;

use crate::http::mime;
use crate::http::resolver::{ResolvedTarget, ServeRoot};

/// Body of the synthetic 404 sent when a requested file does not exist.
pub const NOT_FOUND_BODY: &str = "<html><body><h1>404 Not Found</h1><p>Error: File not found.</p>\
<p>Please add an index.html file to run the server.</p></body></html>";

/// HTTP status codes the server emits.
///
/// - `Ok` (200): File served
/// - `Forbidden` (403): Directory or path outside the serve root
/// - `NotFound` (404): Nothing at the requested path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use serverium::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
        }
    }

    /// Message used as the reason phrase (and fallback body) of error pages.
    pub fn error_message(&self) -> &'static str {
        match self {
            StatusCode::Ok => self.reason_phrase(),
            StatusCode::Forbidden => "Error: Access forbidden.",
            StatusCode::NotFound => "Error: File not found.",
        }
    }

    /// Custom page looked up in the serve root for this status.
    pub fn error_page_name(&self) -> Option<&'static str> {
        match self {
            StatusCode::Ok => None,
            StatusCode::Forbidden => Some("403.html"),
            StatusCode::NotFound => Some("404.html"),
        }
    }
}

/// Where the response body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Generated in-process
    Bytes(Vec<u8>),
    /// Streamed from disk; `len` is the size announced in `Content-Length`
    File { path: PathBuf, len: u64 },
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Text after the code on the status line
    pub reason: &'static str,
    /// Headers in the order they are written
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<h1>hi</h1>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    reason: &'static str,
    headers: Vec<(String, String)>,
    body: Body,
    content_length: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: status.reason_phrase(),
            headers: Vec::new(),
            body: Body::Bytes(Vec::new()),
            content_length: true,
        }
    }

    /// Overrides the reason phrase on the status line.
    pub fn reason(mut self, reason: &'static str) -> Self {
        self.reason = reason;
        self
    }

    /// Adds or replaces a header. Names compare case-insensitively.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets an in-memory body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Body::Bytes(body);
        self
    }

    /// Streams the body from `path`, announcing `len` bytes.
    pub fn file(mut self, path: PathBuf, len: u64) -> Self {
        self.body = Body::File { path, len };
        self
    }

    /// Skips the automatic `Content-Length` header.
    pub fn without_content_length(mut self) -> Self {
        self.content_length = false;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body's byte length unless one was set
    /// explicitly or it was switched off.
    pub fn build(self) -> Response {
        let mut headers = self.headers;
        if self.content_length
            && !headers
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        {
            headers.push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            reason: self.reason,
            headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Looks up a header by name, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// 200 response streaming the file at `path`.
    pub async fn file(path: PathBuf) -> io::Result<Self> {
        let len = tokio::fs::metadata(&path).await?.len();
        Ok(ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", mime::for_path(&path))
            .file(path, len)
            .build())
    }

    /// The fixed 404 page for a request whose file does not exist.
    ///
    /// Never consults `404.html`.
    pub fn not_found_message() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("Content-Type", "text/html")
            .body(NOT_FOUND_BODY.as_bytes().to_vec())
            .build()
    }

    /// Error page for `status`: the root's own `403.html`/`404.html` when
    /// present, otherwise a bare status line followed by the message.
    ///
    /// The bare form carries no headers at all; clients rely on connection
    /// close to find the end of the body.
    pub async fn error_page(root: &ServeRoot, status: StatusCode) -> Self {
        let message = status.error_message();

        if let Some(name) = status.error_page_name() {
            let path = root.file(name);
            if let Ok(meta) = tokio::fs::metadata(&path).await {
                if meta.is_file() {
                    return ResponseBuilder::new(status)
                        .reason(message)
                        .header("Content-Type", mime::for_path(&path))
                        .file(path, meta.len())
                        .build();
                }
            }
        }

        ResponseBuilder::new(status)
            .reason(message)
            .body(message.as_bytes().to_vec())
            .without_content_length()
            .build()
    }

    /// Chooses the response for a resolved request.
    pub async fn for_target(target: ResolvedTarget, root: &ServeRoot) -> io::Result<Self> {
        match target {
            ResolvedTarget::ServeFile(path) => Self::file(path).await,
            ResolvedTarget::Forbidden => Ok(Self::error_page(root, StatusCode::Forbidden).await),
            ResolvedTarget::NotFound => Ok(Self::not_found_message()),
        }
    }
}
