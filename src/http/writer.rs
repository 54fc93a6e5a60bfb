use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{BodyStream, Response};

/// Serializes a response once and writes it out, resuming after partial writes.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
    stream: Option<BodyStream>,
}

impl ResponseWriter {
    /// Takes the payload of `response`, including its stream body if any.
    pub fn new(response: &mut Response) -> Self {
        Self {
            buffer: response.to_payload(),
            written: 0,
            stream: response.take_stream(),
        }
    }

    /// Like [`new`](Self::new) but without the body, for replies to HEAD.
    pub fn head_only(response: &mut Response) -> Self {
        response.take_stream();
        Self {
            buffer: response.head(),
            written: 0,
            stream: None,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        if let Some(mut body) = self.stream.take() {
            let copied = tokio::io::copy(&mut body, stream)
                .await
                .context("streaming response body")?;
            tracing::debug!(bytes = copied, "Streamed response body");
        }

        stream.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_payload_then_stream() {
        let mut response = Response::new();
        response.write_stream(&b"streamed"[..]);

        let mut writer = ResponseWriter::new(&mut response);

        let mut out = Vec::new();
        writer.write_to_stream(&mut out).await.unwrap();

        assert_eq!(
            out,
            b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\r\nstreamed".to_vec()
        );
    }
}
