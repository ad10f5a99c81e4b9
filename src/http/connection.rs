use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::http::request::Request;
use crate::http::resolver::{self, ServeRoot};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Longest request line accepted, including the line terminator.
pub const MAX_REQUEST_LINE: u64 = 8 * 1024;

/// One accepted client: a single request, a single response, then close.
pub struct Connection<S> {
    stream: BufReader<S>,
    root: Arc<ServeRoot>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Resolving(Request),
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, root: Arc<ServeRoot>) -> Self {
        Self {
            stream: BufReader::new(stream),
            root,
            state: ConnectionState::Reading,
        }
    }

    /// Serves the connection to completion. The stream is shut down and
    /// dropped on every exit path, including errors.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;
        let _ = self.stream.get_mut().shutdown().await;
        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Resolving(req),
                        // Absent or malformed request line: no response.
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Resolving(req) => {
                    tracing::debug!(method = %req.method, path = %req.path, "Request");
                    let target = resolver::resolve(&req.path, &self.root).await;
                    let response = Response::for_target(target, &self.root).await?;
                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    ResponseWriter::new(&response)
                        .write_to_stream(self.stream.get_mut())
                        .await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads the request line. `None` when the client sent nothing, sent an
    /// over-long line, or the line lacks a method and path.
    ///
    /// Bytes that are not UTF-8 are replaced rather than rejected, so such a
    /// path is still answered (normally with a 404).
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut raw = Vec::new();
        let n = (&mut self.stream)
            .take(MAX_REQUEST_LINE)
            .read_until(b'\n', &mut raw)
            .await?;

        if n == 0 {
            // Client closed connection
            return Ok(None);
        }

        if n as u64 == MAX_REQUEST_LINE && !raw.ends_with(b"\n") {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&raw);
        Ok(Request::from_request_line(&line))
    }
}
