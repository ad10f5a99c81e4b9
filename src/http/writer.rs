use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Chunk size for streaming file bodies.
const BUFFER_SIZE: usize = 8192;

/// Status line, headers and the blank separator line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.reason
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

pub struct ResponseWriter<'a> {
    response: &'a Response,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(response: &'a Response) -> Self {
        Self { response }
    }

    /// Writes the whole response. File bodies are streamed in chunks and
    /// exactly the announced number of bytes is sent.
    ///
    /// A file body is opened before anything is written, so a file that
    /// vanished since it was resolved produces no bytes at all.
    pub async fn write_to_stream<W>(&self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let head = serialize_head(self.response);

        match &self.response.body {
            Body::Bytes(bytes) => {
                stream.write_all(&head).await?;
                stream.write_all(bytes).await?;
            }
            Body::File { path, len } => {
                let mut file = tokio::fs::File::open(path).await?.take(*len);
                stream.write_all(&head).await?;

                let mut buf = vec![0u8; BUFFER_SIZE];
                let mut sent: u64 = 0;

                loop {
                    let n = file.read(&mut buf).await?;
                    if n == 0 {
                        break;
                    }
                    stream.write_all(&buf[..n]).await?;
                    sent += n as u64;
                }

                if sent != *len {
                    anyhow::bail!(
                        "{} shrank while sending: {} of {} bytes",
                        path.display(),
                        sent,
                        len
                    );
                }
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
