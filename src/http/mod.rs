//! HTTP protocol implementation.
//!
//! This module implements a small HTTP/1.x server with support for keep-alive connections.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`chars`**: RFC 2616 character classes used by the parser
//! - **`message`**: Version, ordered headers and body shared by requests and responses
//! - **`parser`**: Byte-at-a-time request parser built on an explicit state machine
//! - **`request`**: HTTP request representation, methods and the Request-URI
//! - **`response`**: HTTP response representation, status codes and serialization
//! - **`writer`**: Writes serialized responses to the client
//! - **`connection`**: The main connection handler implementing the request-response state machine
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Feed bytes to the parser until Accept / Reject
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Dispatch to the router
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection, parser reset)
//!               └─ Close → Closed
//! ```
//!
//! # Example
//!
//! ```
//! use htserve::http::parser::{ParseStatus, RequestParser};
//! use htserve::http::request::{Method, Request};
//!
//! let mut parser = RequestParser::new();
//! let mut request = Request::new();
//!
//! let (status, _) = parser.parse(&mut request, b"GET /hi HTTP/1.0\r\n");
//! assert_eq!(status, ParseStatus::InProgress);
//!
//! let (status, _) = parser.parse(&mut request, b"Host: localhost\r\n\r\n");
//! assert_eq!(status, ParseStatus::Accept);
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.header("Host"), Some("localhost"));
//! ```

pub mod chars;
pub mod connection;
pub mod message;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
