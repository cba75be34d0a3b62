use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Renders the status line and header block, terminated by the blank line.
///
/// A missing reason renders as an empty string after the code. The body is
/// never touched here.
pub fn format_head(code: u16, reason: Option<&str>, headers: &[(String, String)]) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!("{} {} {}\r\n", HTTP_VERSION, code, reason.unwrap_or(""));
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes a fully built response as two parts: head block, then body.
pub struct ResponseWriter<'a> {
    head: Vec<u8>,
    body: &'a [u8],
}

impl<'a> ResponseWriter<'a> {
    pub fn new(response: &'a Response) -> Self {
        Self {
            head: format_head(
                response.status.as_u16(),
                Some(response.status.reason_phrase()),
                &response.headers,
            ),
            body: &response.body,
        }
    }

    pub fn head(&self) -> &[u8] {
        &self.head
    }

    pub async fn write_to_stream<W>(&self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        write_fully(stream, &self.head).await?;
        if !self.body.is_empty() {
            write_fully(stream, self.body).await?;
        }
        stream.flush().await?;
        Ok(())
    }
}

async fn write_fully<W>(stream: &mut W, buf: &[u8]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;

    while written < buf.len() {
        let n = stream.write(&buf[written..]).await?;

        if n == 0 {
            return Err(anyhow::anyhow!("connection closed while writing"));
        }

        written += n;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::{ResponseBuilder, StatusCode};

    #[test]
    fn head_without_reason_keeps_trailing_space() {
        let head = format_head(200, None, &[]);
        assert_eq!(head, b"HTTP/1.1 200 \r\n\r\n");
    }

    #[tokio::test]
    async fn writes_head_then_body() {
        let response = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .body(b"abc".to_vec())
            .build();

        let mut out = Vec::new();
        ResponseWriter::new(&response)
            .write_to_stream(&mut out)
            .await
            .unwrap();

        assert_eq!(
            out,
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc".to_vec()
        );
    }
}
