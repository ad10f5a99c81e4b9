/// The parts of an HTTP request the server acts on.
///
/// Only the request line is read. Headers and any body the client sends
/// are ignored, and the method is carried for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The verb exactly as sent (e.g. `"GET"`)
    pub method: String,
    /// The raw request target (e.g. `"/index.html"`)
    pub path: String,
}

impl Request {
    /// Parses a request line such as `GET /index.html HTTP/1.1`.
    ///
    /// Tokens are separated by single spaces. At least a method and a path
    /// are required; anything after the path is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// # use serverium::http::request::Request;
    /// let req = Request::from_request_line("GET /a.css HTTP/1.1\r\n").unwrap();
    /// assert_eq!(req.method, "GET");
    /// assert_eq!(req.path, "/a.css");
    /// assert!(Request::from_request_line("GET").is_none());
    /// ```
    pub fn from_request_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);

        let mut parts: Vec<&str> = line.split(' ').collect();
        // Trailing empty tokens do not count.
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }

        if parts.len() < 2 {
            return None;
        }

        let (method, path) = (parts[0], parts[1]);
        if path.is_empty() {
            return None;
        }

        Some(Self {
            method: method.to_string(),
            path: path.to_string(),
        })
    }
}
