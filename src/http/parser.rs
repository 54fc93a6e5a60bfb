//! Incremental HTTP/1.x request parser.
//!
//! The parser is a finite-state machine fed one byte at a time. It keeps no
//! buffer of its own: every accepted byte is written straight into the
//! [`Request`] being built, so bytes may arrive split across any number of
//! reads without losing progress.
//!
//! ```text
//! Request-Line   = *(CRLF) Method SP Request-URI SP HTTP-Version CRLF
//! HTTP-Version   = "HTTP" "/" DIGIT "." DIGIT
//! message-header = field-name ":" [ field-value ]
//! field-value    = *( field-content | LWS )
//! LWS            = [CRLF] 1*( SP | HT )
//! ```
//!
//! Method and URI are accepted verbatim as long as every byte belongs to the
//! right character class.

use std::fmt;

use crate::http::chars::{is_cr, is_ctl, is_digit, is_ht, is_lf, is_sp, is_token, is_uri};
use crate::http::request::Request;

/// Outcome of feeding one byte to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// More input is needed
    InProgress,
    /// The request line and headers are complete
    Accept,
    /// The input violates the grammar; the parse attempt must be discarded
    Reject,
}

/// Parser states, in the order a well-formed request visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    StartLf,
    Method,
    Uri,
    HttpH,
    HttpT1,
    HttpT2,
    HttpP,
    HttpSlash,
    VersionMajor,
    VersionDot,
    VersionMinor,
    RequestLineCr,
    RequestLineLf,
    HeaderNameStart,
    HeaderName,
    HeaderValue,
    HeaderLf,
    HeaderLws,
    HeaderEnd,
    /// Terminal: the request was accepted
    Done,
    /// Terminal: the request was rejected
    Dead,
}

/// The mutation a transition applies to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Method(u8),
    Uri(u8),
    VersionMajor(u8),
    VersionMinor(u8),
    /// Open a new header entry and write the first byte of its name
    NewHeader(u8),
    HeaderName(u8),
    HeaderValue(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: State,
    pub status: ParseStatus,
    pub action: Option<Action>,
}

impl Transition {
    fn next(state: State) -> Self {
        Self {
            state,
            status: ParseStatus::InProgress,
            action: None,
        }
    }

    fn with(state: State, action: Action) -> Self {
        Self {
            state,
            status: ParseStatus::InProgress,
            action: Some(action),
        }
    }

    fn accept() -> Self {
        Self {
            state: State::Done,
            status: ParseStatus::Accept,
            action: None,
        }
    }

    fn reject() -> Self {
        Self {
            state: State::Dead,
            status: ParseStatus::Reject,
            action: None,
        }
    }
}

/// The transition table: where `byte` leads from `state`, and what it writes.
pub fn transition(state: State, b: u8) -> Transition {
    use State as S;

    let expect = |literal: u8, next: State| {
        if b == literal {
            Transition::next(next)
        } else {
            Transition::reject()
        }
    };

    match state {
        S::Start if is_cr(b) => Transition::next(S::StartLf),
        S::Start if is_token(b) => Transition::with(S::Method, Action::Method(b)),
        S::StartLf if is_lf(b) => Transition::next(S::Start),

        S::Method if is_token(b) => Transition::with(S::Method, Action::Method(b)),
        S::Method if is_sp(b) => Transition::next(S::Uri),

        S::Uri if is_uri(b) => Transition::with(S::Uri, Action::Uri(b)),
        S::Uri if is_sp(b) => Transition::next(S::HttpH),

        S::HttpH => expect(b'H', S::HttpT1),
        S::HttpT1 => expect(b'T', S::HttpT2),
        S::HttpT2 => expect(b'T', S::HttpP),
        S::HttpP => expect(b'P', S::HttpSlash),
        S::HttpSlash => expect(b'/', S::VersionMajor),

        S::VersionMajor if is_digit(b) => {
            Transition::with(S::VersionDot, Action::VersionMajor(b - b'0'))
        }
        S::VersionDot => expect(b'.', S::VersionMinor),
        S::VersionMinor if is_digit(b) => {
            Transition::with(S::RequestLineCr, Action::VersionMinor(b - b'0'))
        }

        S::RequestLineCr if is_cr(b) => Transition::next(S::RequestLineLf),
        S::RequestLineLf if is_lf(b) => Transition::next(S::HeaderNameStart),

        S::HeaderNameStart if is_cr(b) => Transition::next(S::HeaderEnd),
        S::HeaderNameStart if is_token(b) => {
            Transition::with(S::HeaderName, Action::NewHeader(b))
        }

        S::HeaderName if is_token(b) => Transition::with(S::HeaderName, Action::HeaderName(b)),
        S::HeaderName if b == b':' => Transition::next(S::HeaderValue),

        // SP and HT are dropped anywhere in a value
        S::HeaderValue if is_sp(b) || is_ht(b) => Transition::next(S::HeaderValue),
        S::HeaderValue if is_cr(b) => Transition::next(S::HeaderLf),
        S::HeaderValue if !is_ctl(b) => {
            Transition::with(S::HeaderValue, Action::HeaderValue(b))
        }

        S::HeaderLf if is_lf(b) => Transition::next(S::HeaderLws),

        // CRLF followed by SP/HT continues the previous value
        S::HeaderLws if is_sp(b) || is_ht(b) => Transition::next(S::HeaderValue),
        S::HeaderLws if is_cr(b) => Transition::next(S::HeaderEnd),
        S::HeaderLws if is_token(b) => Transition::with(S::HeaderName, Action::NewHeader(b)),

        S::HeaderEnd if is_lf(b) => Transition::accept(),

        S::Done => Transition::accept(),
        _ => Transition::reject(),
    }
}

/// Where and why a parse was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// State the parser was in when it saw the offending byte
    pub state: State,
    pub byte: u8,
    /// Zero-based position of the byte since the last reset
    pub offset: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected byte '{}' at offset {} in state {:?}",
            self.byte.escape_ascii(),
            self.offset,
            self.state
        )
    }
}

impl std::error::Error for ParseError {}

/// Drives [`transition`] over a byte stream and applies its actions.
///
/// One parser handles one request at a time; call [`reset`](Self::reset)
/// before reusing it.
#[derive(Debug, Clone)]
pub struct RequestParser {
    state: State,
    offset: usize,
    error: Option<ParseError>,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            offset: 0,
            error: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The recorded rejection, if the parser is dead.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Returns to the initial state for the next request.
    pub fn reset(&mut self) {
        self.state = State::Start;
        self.offset = 0;
        self.error = None;
    }

    /// Feeds one byte.
    ///
    /// Both terminal outcomes are sticky: once `Reject` or `Accept` has been
    /// returned, later calls return the same status and leave `request` alone.
    pub fn consume(&mut self, request: &mut Request, b: u8) -> ParseStatus {
        if self.state == State::Dead {
            return ParseStatus::Reject;
        }

        let t = transition(self.state, b);
        tracing::trace!(
            state = ?self.state,
            next = ?t.state,
            status = ?t.status,
            byte = %b.escape_ascii(),
            "parser step"
        );

        if t.status == ParseStatus::Reject {
            self.error = Some(ParseError {
                state: self.state,
                byte: b,
                offset: self.offset,
            });
        }
        if let Some(action) = t.action {
            apply(request, action);
        }

        if self.state != State::Done {
            self.offset += 1;
        }
        self.state = t.state;
        t.status
    }

    /// Feeds `buf` until the first terminal status.
    ///
    /// Returns the last status and how many bytes were consumed, including the
    /// terminal one. Anything after an accepted request (the body) is left to
    /// the caller.
    pub fn parse(&mut self, request: &mut Request, buf: &[u8]) -> (ParseStatus, usize) {
        let mut status = ParseStatus::InProgress;
        let mut consumed = 0;
        for &b in buf {
            status = self.consume(request, b);
            consumed += 1;
            if status != ParseStatus::InProgress {
                break;
            }
        }
        (status, consumed)
    }
}

fn apply(request: &mut Request, action: Action) {
    match action {
        Action::Method(b) => request.push_method_char(char::from(b)),
        Action::Uri(b) => request.uri.push(char::from(b)),
        Action::VersionMajor(d) => request.message.version_major = d,
        Action::VersionMinor(d) => request.message.version_minor = d,
        Action::NewHeader(b) => {
            request.message.start_header();
            request.message.append_to_last_header_name(char::from(b));
        }
        Action::HeaderName(b) => request.message.append_to_last_header_name(char::from(b)),
        // bytes above 0x7f are taken as ISO-8859-1
        Action::HeaderValue(b) => request.message.append_to_last_header_value(char::from(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let mut parsed = Request::new();

        let (status, consumed) = RequestParser::new().parse(&mut parsed, req);

        assert_eq!(status, ParseStatus::Accept);
        assert_eq!(parsed.uri.as_str(), "/");
        assert_eq!(parsed.header("Host"), Some("example.com"));
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn transition_is_pure() {
        let t = transition(State::HeaderLws, b'\t');
        assert_eq!(t.state, State::HeaderValue);
        assert_eq!(t.status, ParseStatus::InProgress);
        assert_eq!(t.action, None);

        let t = transition(State::HeaderNameStart, b'X');
        assert_eq!(t.action, Some(Action::NewHeader(b'X')));

        assert_eq!(transition(State::HttpH, b'h').status, ParseStatus::Reject);
        assert_eq!(transition(State::HeaderEnd, b'\n').status, ParseStatus::Accept);
    }

    #[test]
    fn header_name_start_rejects_colon() {
        let t = transition(State::HeaderNameStart, b':');
        assert_eq!(t.state, State::Dead);
        assert_eq!(t.status, ParseStatus::Reject);
    }
}
