use std::fmt;

use serde::Serialize;
use tokio::io::AsyncRead;

use crate::http::message::{Header, Message};

/// HTTP status codes supported by the server.
///
/// Each variant maps to exactly one numeric code and reason phrase, so a
/// response can never carry an unmapped status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusCode {
    /// 100 Continue
    Continue,
    /// 101 Switching Protocols
    SwitchingProtocols,
    /// 200 OK
    #[default]
    Ok,
    /// 201 Created
    Created,
    /// 202 Accepted
    Accepted,
    /// 204 No Content
    NoContent,
    /// 206 Partial Content
    PartialContent,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 302 Found
    Found,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 408 Request Timeout
    RequestTimeout,
    /// 411 Length Required
    LengthRequired,
    /// 413 Payload Too Large
    PayloadTooLarge,
    /// 414 URI Too Long
    UriTooLong,
    /// 415 Unsupported Media Type
    UnsupportedMediaType,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
    /// 503 Service Unavailable
    ServiceUnavailable,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    const ALL: [StatusCode; 24] = [
        StatusCode::Continue,
        StatusCode::SwitchingProtocols,
        StatusCode::Ok,
        StatusCode::Created,
        StatusCode::Accepted,
        StatusCode::NoContent,
        StatusCode::PartialContent,
        StatusCode::MovedPermanently,
        StatusCode::Found,
        StatusCode::NotModified,
        StatusCode::BadRequest,
        StatusCode::Unauthorized,
        StatusCode::Forbidden,
        StatusCode::NotFound,
        StatusCode::MethodNotAllowed,
        StatusCode::RequestTimeout,
        StatusCode::LengthRequired,
        StatusCode::PayloadTooLarge,
        StatusCode::UriTooLong,
        StatusCode::UnsupportedMediaType,
        StatusCode::InternalServerError,
        StatusCode::NotImplemented,
        StatusCode::ServiceUnavailable,
        StatusCode::HttpVersionNotSupported,
    ];

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use htserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Continue => 100,
            StatusCode::SwitchingProtocols => 101,
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::Accepted => 202,
            StatusCode::NoContent => 204,
            StatusCode::PartialContent => 206,
            StatusCode::MovedPermanently => 301,
            StatusCode::Found => 302,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::RequestTimeout => 408,
            StatusCode::LengthRequired => 411,
            StatusCode::PayloadTooLarge => 413,
            StatusCode::UriTooLong => 414,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use htserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Continue => "Continue",
            StatusCode::SwitchingProtocols => "Switching Protocols",
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Accepted => "Accepted",
            StatusCode::NoContent => "No Content",
            StatusCode::PartialContent => "Partial Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::UriTooLong => "URI Too Long",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }

    /// Looks up the variant for a numeric code.
    pub fn from_u16(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_u16() == code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Something a handler can [`write`](Response::write) into a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Served as `text/html` when it looks like a document, else `text/plain`
    Text(String),
    /// Served as `application/octet-stream`
    Binary(Vec<u8>),
    /// Served as `application/json`
    Json(serde_json::Value),
}

impl Body {
    pub fn content_type(&self) -> &'static str {
        match self {
            Body::Text(text) if looks_like_html(text) => "text/html",
            Body::Text(_) => "text/plain",
            Body::Binary(_) => "application/octet-stream",
            Body::Json(_) => "application/json",
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Text(text) => text.into_bytes(),
            Body::Binary(bytes) => bytes,
            Body::Json(value) => value.to_string().into_bytes(),
        }
    }
}

fn looks_like_html(text: &str) -> bool {
    let head = text.trim_start().as_bytes();
    [b"<!doctype".as_slice(), b"<html".as_slice()]
        .iter()
        .any(|prefix| head.len() >= prefix.len() && head[..prefix.len()].eq_ignore_ascii_case(prefix))
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_string())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Binary(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::Binary(bytes.to_vec())
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

/// A body of unknown length, copied to the client after the head.
pub type BodyStream = Box<dyn AsyncRead + Send + Unpin>;

/// An HTTP response under construction by a handler.
///
/// Starts out as `200 OK` over HTTP/1.1 with no headers and an empty body.
pub struct Response {
    status: StatusCode,
    /// Version, headers and body
    pub message: Message,
    stream: Option<BodyStream>,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("message", &self.message)
            .field("stream", &self.stream.is_some())
            .finish()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::Ok,
            message: Message::default(),
            stream: None,
        }
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::new()
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn set_status_code(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn reason_phrase(&self) -> &'static str {
        self.status.reason_phrase()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.message.get_header(name)
    }

    pub fn headers(&self) -> &[Header] {
        self.message.headers()
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.message.set_header(name, value);
    }

    pub fn unset_header(&mut self, name: &str) {
        self.message.unset_header(name);
    }

    pub fn body(&self) -> &[u8] {
        &self.message.body
    }

    /// Sets the body along with matching `Content-Type` and `Content-Length`.
    ///
    /// Replaces any body or stream written earlier.
    pub fn write(&mut self, body: impl Into<Body>) {
        let body = body.into();
        self.message.set_header("Content-Type", body.content_type());
        let bytes = body.into_bytes();
        self.message
            .set_header("Content-Length", bytes.len().to_string());
        self.message.body = bytes;
        self.stream = None;
    }

    /// Serializes `value` as the JSON body.
    pub fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> serde_json::Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.message.set_header("Content-Type", "application/json");
        self.message
            .set_header("Content-Length", bytes.len().to_string());
        self.message.body = bytes;
        self.stream = None;
        Ok(())
    }

    /// Streams the body from `reader`.
    ///
    /// No `Content-Length` is sent, so the connection is closed once the
    /// stream is exhausted.
    pub fn write_stream<R>(&mut self, reader: R)
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        self.message
            .set_header("Content-Type", "application/octet-stream");
        self.message.unset_header("Content-Length");
        self.message.body.clear();
        self.stream = Some(Box::new(reader));
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn take_stream(&mut self) -> Option<BodyStream> {
        self.stream.take()
    }

    /// `Status-Line = HTTP-Version SP Status-Code SP Reason-Phrase CRLF`
    pub fn to_status_line(status: StatusCode, version_major: u8, version_minor: u8) -> String {
        format!(
            "HTTP/{} {} {}\r\n",
            Message::format_version(version_major, version_minor),
            status.as_u16(),
            status.reason_phrase()
        )
    }

    pub fn status_line(&self) -> String {
        Self::to_status_line(
            self.status,
            self.message.version_major,
            self.message.version_minor,
        )
    }

    /// The status line and headers, up to and including the blank line.
    pub fn head(&self) -> Vec<u8> {
        let mut buf = self.status_line().into_bytes();

        for header in self.message.headers() {
            buf.extend_from_slice(header.name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(header.value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// The complete wire form: head followed by the body bytes verbatim.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut buf = self.head();
        buf.extend_from_slice(&self.message.body);
        buf
    }

    /// Creates a simple 200 OK response with the given body.
    pub fn ok(body: impl Into<Body>) -> Self {
        let mut response = Self::new();
        response.write(body);
        response
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError)
    }

    /// A response whose plain-text body is the status itself, e.g. `404 Not Found`.
    pub fn error(status: StatusCode) -> Self {
        let mut response = Self::with_status(status);
        response.write(status.to_string());
        response
    }
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use htserve::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("2"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    message: Message,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: Message::default(),
        }
    }

    pub fn version(mut self, major: u8, minor: u8) -> Self {
        self.message.version_major = major;
        self.message.version_minor = minor;
        self
    }

    /// Adds or replaces a header, keeping first-insertion order.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message.set_header(key, value);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.message.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Appends a Content-Length header from the body size if none was set.
    pub fn build(mut self) -> Response {
        if self.message.get_header("Content-Length").is_none() {
            let length = self.message.body.len().to_string();
            self.message.set_header("Content-Length", length);
        }

        Response {
            status: self.status,
            message: self.message,
            stream: None,
        }
    }
}
