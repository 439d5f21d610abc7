use crate::{Error, Result};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

/// Longest line accepted from the server before reads fail
pub const MAX_LINE_LENGTH: usize = 16 * 1024 * 1024;

/// Newline-delimited message channel to a server.
///
/// Every line written successfully is kept, in order, so a run can be
/// audited after the fact.
pub struct LineTransport<R, W> {
    reader: FramedRead<R, LinesCodec>,
    writer: FramedWrite<W, LinesCodec>,
    read_timeout: Option<Duration>,
    sent: Vec<String>,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
            writer: FramedWrite::new(writer, LinesCodec::new()),
            read_timeout: None,
            sent: Vec::new(),
        }
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.reader = FramedRead::new(
            self.reader.into_inner(),
            LinesCodec::new_with_max_length(max),
        );
        self
    }

    /// Writes one line and flushes it.
    pub async fn send_line(&mut self, line: String) -> Result<()> {
        self.writer.send(line.as_str()).await?;
        self.sent.push(line);
        Ok(())
    }

    /// Reads the next line, `None` once the server closes its output.
    pub async fn recv_line(&mut self) -> Result<Option<String>> {
        let next = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.reader.next())
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => self.reader.next().await,
        };
        Ok(next.transpose()?)
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn into_sent(self) -> Vec<String> {
        self.sent
    }
}
