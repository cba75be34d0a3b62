use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::Router;

/// How long a client gets to deliver a complete request.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

const READ_CHUNK: usize = 4096;

pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    router: Arc<Router>,
    read_timeout: Duration,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, router: Arc<Router>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            router,
            read_timeout: READ_TIMEOUT,
            state: ConnectionState::Reading,
        }
    }

    /// Overrides the deadline for receiving a complete request.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Serves exactly one request, then closes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match timeout(self.read_timeout, self.read_request()).await {
                        Ok(Ok(Some(req))) => ConnectionState::Processing(req),
                        Ok(Ok(None)) => ConnectionState::Closed,
                        Ok(Err(e)) => {
                            tracing::warn!(error = %e, "Malformed request");
                            ConnectionState::Writing(Response::bad_request())
                        }
                        Err(_) => {
                            tracing::warn!("Timed out waiting for request");
                            ConnectionState::Closed
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    tracing::info!(
                        method = ?req.method,
                        path = %req.path,
                        body_len = req.body.len(),
                        "Request received"
                    );

                    let response = self.router.dispatch(&req).await;
                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    ResponseWriter::new(&response)
                        .write_to_stream(&mut self.stream)
                        .await?;

                    tracing::info!(
                        status = response.status.as_u16(),
                        body_len = response.body.len(),
                        "Response sent"
                    );
                    // Connection is closed on drop.
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one complete request is buffered.
    ///
    /// `Ok(None)` means the peer closed before sending a full request.
    pub async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    let _ = self.buffer.split_to(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Err(e),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = match self.stream.read_buf(&mut self.buffer).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(error = %e, "Read failed");
                    return Ok(None);
                }
            };

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }
        }
    }
}
