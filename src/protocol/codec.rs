//! Line-delimited JSON framing.
//!
//! Every frame is one JSON value followed by `\n`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

use crate::error::CodecError;

/// Longest frame accepted, excluding the newline.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Reading half of a framed connection.
pub struct FrameReader<R> {
    inner: BufReader<R>,
    line: Vec<u8>,
    oversized: bool,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            line: Vec::new(),
            oversized: false,
        }
    }

    /// Read the next frame. `Ok(None)` means the peer closed the stream.
    ///
    /// Undecodable frames (bad UTF-8, bad JSON, too long) are reported as
    /// errors for which [`CodecError::is_decode_failure`] holds; the stream
    /// stays usable after them.
    ///
    /// Cancel safe: partial frames are kept in the reader.
    pub async fn next<T: DeserializeOwned>(&mut self) -> Result<Option<T>, CodecError> {
        loop {
            let Some(frame) = self.read_frame().await? else {
                return Ok(None);
            };
            let text = std::str::from_utf8(&frame)?.trim();
            if text.is_empty() {
                continue;
            }
            return Ok(Some(serde_json::from_str(text)?));
        }
    }

    /// Bytes up to the next `\n`, never buffering more than [`MAX_FRAME_LEN`].
    async fn read_frame(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                // An unterminated trailing frame is dropped with the stream.
                self.line.clear();
                self.oversized = false;
                return Ok(None);
            }

            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = &available[..newline.unwrap_or(available.len())];
            let used = chunk.len() + usize::from(newline.is_some());

            if !self.oversized {
                if self.line.len() + chunk.len() > MAX_FRAME_LEN {
                    self.oversized = true;
                    self.line = Vec::new();
                } else {
                    self.line.extend_from_slice(chunk);
                }
            }
            self.inner.consume(used);

            if newline.is_some() {
                if std::mem::take(&mut self.oversized) {
                    return Err(CodecError::Oversized(MAX_FRAME_LEN));
                }
                return Ok(Some(std::mem::take(&mut self.line)));
            }
        }
    }

    /// Read one frame within `timeout`.
    ///
    /// Timeouts, closed streams and undecodable frames all yield `None`.
    pub async fn receive<T: DeserializeOwned>(&mut self, timeout: Duration) -> Option<T> {
        match tokio::time::timeout(timeout, self.next()).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => {
                trace!(error = %e, "receive failed");
                None
            }
            Err(_) => None,
        }
    }
}

/// Writing half of a framed connection.
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub async fn send<T: Serialize>(&mut self, value: &T) -> Result<(), CodecError> {
        let mut line = serde_json::to_string(value)?;
        line.push('\n');
        self.inner.write_all(line.as_bytes()).await?;
        self.inner.flush().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), CodecError> {
        self.inner.shutdown().await?;
        Ok(())
    }
}
