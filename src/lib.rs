//! htserve - a small HTTP/1.x server
//!
//! Core library: an incremental request parser, the message model shared by
//! requests and responses, routing, and the connection loop.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
