use std::fmt;

use crate::http::message::{Header, Message};

/// HTTP request methods.
///
/// The parser accepts any token as a method; tokens outside this list are
/// kept verbatim in [`Request::method_name`] and map to `UNDETERMINED`.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// CONNECT - Establish a tunnel
    CONNECT,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// TRACE - Loop-back test
    TRACE,
    /// Not parsed yet, or an extension method
    #[default]
    UNDETERMINED,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive, typically uppercase)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a known method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use htserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            "CONNECT" => Some(Method::CONNECT),
            "OPTIONS" => Some(Method::OPTIONS),
            "HEAD" => Some(Method::HEAD),
            "TRACE" => Some(Method::TRACE),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
            Method::TRACE => "TRACE",
            Method::UNDETERMINED => "UNDETERMINED",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Where the next URI character goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UriState {
    #[default]
    Start,
    Path,
    Query,
    Fragment,
}

/// A Request-URI, split into path, query and fragment as it is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uri {
    /// Current position in the URI grammar
    pub state: UriState,
    raw: String,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one character, advancing the path/query/fragment split.
    pub fn push(&mut self, c: char) {
        self.raw.push(c);
        match (self.state, c) {
            (UriState::Start | UriState::Path, '?') => {
                self.state = UriState::Query;
                self.query = Some(String::new());
            }
            (UriState::Start | UriState::Path | UriState::Query, '#') => {
                self.state = UriState::Fragment;
                self.fragment = Some(String::new());
            }
            (UriState::Start | UriState::Path, c) => {
                self.state = UriState::Path;
                self.path.push(c);
            }
            (UriState::Query, c) => self.query.get_or_insert_with(String::new).push(c),
            (UriState::Fragment, c) => self.fragment.get_or_insert_with(String::new).push(c),
        }
    }

    /// The URI exactly as received, e.g. `/search?q=rust`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Percent-decoded `key=value` pairs of the query string.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<&str> for Uri {
    fn from(s: &str) -> Self {
        let mut uri = Uri::new();
        s.chars().for_each(|c| uri.push(c));
        uri
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Represents an HTTP request from a client.
///
/// Created empty and filled in field by field by
/// [`RequestParser`](crate::http::parser::RequestParser); it is complete only
/// once the parser has returned `Accept`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The method token as received
    pub method_name: String,
    /// The request target (e.g., "/index.html")
    pub uri: Uri,
    /// Version, headers and body
    pub message: Message,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    uri: Option<String>,
    version: (u8, u8),
    headers: Vec<Header>,
    body: Vec<u8>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            uri: None,
            version: (1, 1),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn version(mut self, major: u8, minor: u8) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let uri = self.uri.ok_or("uri missing")?;

        let mut message = Message::new(self.version.0, self.version.1);
        self.headers
            .into_iter()
            .for_each(|h| message.push_header(h));
        message.body = self.body;

        Ok(Request {
            method,
            method_name: method.as_str().to_string(),
            uri: Uri::from(uri.as_str()),
            message,
        })
    }
}

impl Default for Request {
    /// Version 0.0 until the parser has seen the request line.
    fn default() -> Self {
        Self {
            method: Method::UNDETERMINED,
            method_name: String::new(),
            uri: Uri::new(),
            message: Message::new(0, 0),
        }
    }
}

impl Request {
    /// An empty request, ready to be populated by the parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one character to the method token and re-resolves [`Method`].
    pub fn push_method_char(&mut self, c: char) {
        self.method_name.push(c);
        self.method = Method::from_str(&self.method_name).unwrap_or(Method::UNDETERMINED);
    }

    /// Retrieves a header value by exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.message.get_header(key)
    }

    pub fn headers(&self) -> &[Header] {
        self.message.headers()
    }

    pub fn body(&self) -> &[u8] {
        &self.message.body
    }

    /// `"{major}.{minor}"` of the request line.
    pub fn version(&self) -> String {
        self.message.version()
    }

    /// Parses the Content-Length header.
    ///
    /// Returns `Ok(0)` if the header is missing and `Err` with the raw value if
    /// it is not `1*DIGIT` or does not fit a `usize`.
    pub fn content_length(&self) -> Result<usize, String> {
        match self.header("Content-Length") {
            None => Ok(0),
            Some(v) if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) => {
                Err(v.to_string())
            }
            Some(v) => v.parse().map_err(|_| v.to_string()),
        }
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// HTTP/1.1 defaults to keep-alive unless `Connection: close` is sent.
    /// HTTP/1.0 closes unless `Connection: keep-alive` is sent.
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("Connection");
        if (self.message.version_major, self.message.version_minor) >= (1, 1) {
            !connection.is_some_and(|v| v.eq_ignore_ascii_case("close"))
        } else {
            connection.is_some_and(|v| v.eq_ignore_ascii_case("keep-alive"))
        }
    }
}
