//! TCP front end: accepts sockets and hands each one to a [`Connection`](crate::http::connection::Connection).

pub mod listener;
