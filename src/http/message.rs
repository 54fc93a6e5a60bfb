//! Header, version and body fields shared by requests and responses.
//!
//! Headers are kept as an ordered sequence rather than a map, so insertion
//! order survives serialization and duplicate names can accumulate when
//! headers are appended directly (as the parser does). All name comparisons
//! are exact, case-sensitive string equality.

use std::fmt;

/// A single `name: value` header line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// The parts of an HTTP message common to requests and responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Major digit of the HTTP version
    pub version_major: u8,
    /// Minor digit of the HTTP version
    pub version_minor: u8,
    headers: Vec<Header>,
    /// Message body as raw bytes
    pub body: Vec<u8>,
}

impl Default for Message {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Message {
    pub fn new(version_major: u8, version_minor: u8) -> Self {
        Self {
            version_major,
            version_minor,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Renders an HTTP version as `"{major}.{minor}"`.
    ///
    /// ```
    /// # use htserve::http::message::Message;
    /// assert_eq!(Message::format_version(1, 0), "1.0");
    /// ```
    pub fn format_version(major: u8, minor: u8) -> String {
        format!("{major}.{minor}")
    }

    /// This message's version, e.g. `"1.1"`.
    pub fn version(&self) -> String {
        Self::format_version(self.version_major, self.version_minor)
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Appends a header without looking for an existing one of the same name.
    pub fn push_header(&mut self, header: Header) {
        self.headers.push(header);
    }

    /// Opens a new, empty header entry at the end of the sequence.
    ///
    /// The parser calls this before the first character of every header name.
    pub fn start_header(&mut self) {
        self.headers.push(Header::default());
    }

    /// Appends one character to the name of the most recently added header.
    ///
    /// # Panics
    ///
    /// Panics if no header entry exists yet.
    pub fn append_to_last_header_name(&mut self, c: char) {
        self.headers
            .last_mut()
            .expect("no header entry to build a name into")
            .name.push(c);
    }

    /// Appends one character to the value of the most recently added header.
    ///
    /// # Panics
    ///
    /// Panics if no header entry exists yet.
    pub fn append_to_last_header_value(&mut self, c: char) {
        self.headers
            .last_mut()
            .expect("no header entry to build a value into")
            .value.push(c);
    }

    /// Returns the value of the first header named exactly `name`.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    /// Replaces the value of the first header named `name`, or appends one.
    ///
    /// Later duplicates, if any, are left untouched.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|h| h.name == name) {
            Some(header) => header.value = value,
            None => self.headers.push(Header { name, value }),
        }
    }

    /// Removes every header named `name`, keeping the others in order.
    pub fn unset_header(&mut self, name: &str) {
        self.headers.retain(|h| h.name != name);
    }
}
