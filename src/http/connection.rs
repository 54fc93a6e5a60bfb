use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::http::parser::{ParseStatus, RequestParser, State};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::router::Router;

/// How long, and how much, to keep reading after answering a request that
/// was not read in full, so the peer sees the response instead of a reset.
const LINGER_TIMEOUT: Duration = Duration::from_secs(1);
const LINGER_MAX_BYTES: usize = 1024 * 1024;

pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    parser: RequestParser,
    router: Arc<Router>,
    config: ServerConfig,
    state: ConnectionState,
    /// Unread request bytes may remain when the connection closes
    linger: bool,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

/// What came of reading one request off the socket.
pub enum ReadOutcome {
    Request(Request),
    /// The request was unusable; answer with this status and close
    Failed(StatusCode),
    /// The peer closed the connection between requests
    Eof,
}

impl Connection {
    pub fn new(stream: TcpStream, router: Arc<Router>, config: ServerConfig) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(config.read_buffer_size),
            parser: RequestParser::new(),
            router,
            config,
            state: ConnectionState::Reading,
            linger: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    ReadOutcome::Request(req) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    ReadOutcome::Failed(status) => {
                        let mut response = Response::error(status);
                        response.set_header("Connection", "close");
                        let writer = ResponseWriter::new(&mut response);
                        self.linger = true;
                        self.state = ConnectionState::Writing(writer, false);
                    }
                    ReadOutcome::Eof => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(req) => {
                    let mut response = self.router.dispatch(req);
                    let keep_alive =
                        self.config.keep_alive && req.keep_alive() && !response.has_stream();
                    if !keep_alive {
                        response.set_header("Connection", "close");
                    }

                    tracing::info!(
                        method = %req.method_name,
                        uri = %req.uri,
                        status = response.status_code().as_u16(),
                        "Request handled"
                    );

                    let writer = if req.method == Method::HEAD {
                        ResponseWriter::head_only(&mut response)
                    } else {
                        ResponseWriter::new(&mut response)
                    };
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    if self.linger {
                        self.drain().await;
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    /// Feeds the parser until a request head is accepted, then reads its body.
    pub async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        self.parser.reset();
        let mut request = Request::new();
        let mut head_bytes = 0;

        loop {
            // Parse what we have, but never past the head budget
            let window = self.buffer.len().min(self.config.max_head_size - head_bytes);
            let (status, consumed) = self.parser.parse(&mut request, &self.buffer[..window]);
            self.buffer.advance(consumed);
            head_bytes += consumed;

            if status != ParseStatus::Reject && request.uri.as_str().len() > self.config.max_uri_len {
                tracing::warn!(max = self.config.max_uri_len, "Request URI too long");
                return Ok(ReadOutcome::Failed(StatusCode::UriTooLong));
            }

            match status {
                ParseStatus::Accept => break,
                ParseStatus::Reject => {
                    if let Some(err) = self.parser.error() {
                        tracing::warn!(error = %err, "Rejected malformed request");
                    }
                    return Ok(ReadOutcome::Failed(StatusCode::BadRequest));
                }
                ParseStatus::InProgress => {}
            }

            if head_bytes >= self.config.max_head_size {
                tracing::warn!(max = self.config.max_head_size, "Request head too large");
                let status = if self.parser.state() == State::Uri {
                    StatusCode::UriTooLong
                } else {
                    StatusCode::PayloadTooLarge
                };
                return Ok(ReadOutcome::Failed(status));
            }

            let started = self.parser.state() != State::Start;
            if self.fill_buffer().await? == 0 {
                if started {
                    tracing::debug!("Connection closed mid-request");
                }
                return Ok(ReadOutcome::Eof);
            }
        }

        let length = match request.content_length() {
            Ok(length) => length,
            Err(raw) => {
                tracing::warn!(content_length = %raw, "Invalid Content-Length");
                return Ok(ReadOutcome::Failed(StatusCode::BadRequest));
            }
        };
        if length > self.config.max_body_size {
            tracing::warn!(length, max = self.config.max_body_size, "Request body too large");
            return Ok(ReadOutcome::Failed(StatusCode::PayloadTooLarge));
        }

        while self.buffer.len() < length {
            if self.fill_buffer().await? == 0 {
                tracing::debug!("Connection closed before body was complete");
                return Ok(ReadOutcome::Eof);
            }
        }
        request.message.body = self.buffer.split_to(length).to_vec();

        Ok(ReadOutcome::Request(request))
    }

    /// Half-closes the socket, then discards input until the peer closes,
    /// the timeout passes or the byte cap is hit.
    async fn drain(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown before drain failed");
            return;
        }

        let mut discarded = self.buffer.len();
        self.buffer.clear();
        let drained = tokio::time::timeout(LINGER_TIMEOUT, async {
            while discarded < LINGER_MAX_BYTES {
                match self.fill_buffer().await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        discarded += n;
                        self.buffer.clear();
                    }
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::debug!("Gave up draining unread request bytes");
        }
    }

    async fn fill_buffer(&mut self) -> anyhow::Result<usize> {
        self.buffer.reserve(self.config.read_buffer_size);
        let n = self.stream.read_buf(&mut self.buffer).await?;
        Ok(n)
    }
}
