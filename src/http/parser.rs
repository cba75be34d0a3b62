use crate::http::request::{Method, Request};
use std::collections::HashMap;

/// Upper bound on the request line plus header block.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    HeadersTooLarge,
    Incomplete,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParseError::InvalidRequest => "malformed request line",
            ParseError::InvalidMethod => "unknown method",
            ParseError::InvalidHeader => "header line without \": \" separator",
            ParseError::InvalidContentLength => "invalid Content-Length",
            ParseError::HeadersTooLarge => "header block too large",
            ParseError::Incomplete => "incomplete request",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses one request out of `buf`.
///
/// Returns the request and the number of bytes it occupied. Without a
/// `Content-Length` header every byte after the header block is taken as the body.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    // Look for header/body separator
    let headers_end = match find_headers_end(buf) {
        Some(end) if end > MAX_HEADER_BYTES => return Err(ParseError::HeadersTooLarge),
        Some(end) => end,
        None if buf.len() > MAX_HEADER_BYTES => return Err(ParseError::HeadersTooLarge),
        None => return Err(ParseError::Incomplete),
    };
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str = std::str::from_utf8(header_bytes)
        .map_err(|_| ParseError::InvalidRequest)?;

    let (request_line, header_lines) = headers_str
        .split_once("\r\n")
        .unwrap_or((headers_str, ""));

    let (method, path, version) = parse_request_line(request_line)?;
    let headers = parse_headers(header_lines)?;

    let content_length = headers
        .get("content-length")
        .map(|v| v.trim().parse::<usize>().map_err(|_| ParseError::InvalidContentLength))
        .transpose()?;

    let body_len = match content_length {
        Some(len) if body_bytes.len() < len => return Err(ParseError::Incomplete),
        Some(len) => len,
        None => body_bytes.len(),
    };

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes[..body_len].to_vec(),
    };

    Ok((request, headers_end + 4 + body_len))
}

/// Version token the path is delimited by.
const VERSION_MARKER: &str = " HTTP/1.1";

/// Splits `METHOD SP PATH SP VERSION`.
///
/// The path runs up to the last ` HTTP/1.1` marker, so it may contain spaces,
/// and anything after the marker on the same line is ignored. Lines without the
/// marker split on the last space and keep whatever version token they carry.
pub fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let (method_str, rest) = line.split_once(' ').ok_or(ParseError::InvalidRequest)?;

    let (path, version) = match rest.rfind(VERSION_MARKER) {
        Some(idx) => (&rest[..idx], &VERSION_MARKER[1..]),
        None => rest.rsplit_once(' ').ok_or(ParseError::InvalidRequest)?,
    };

    if path.is_empty() || version.is_empty() {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;
    Ok((method, path, version))
}

/// Parses CRLF-separated `Name: value` lines into a map keyed by lowercase name.
///
/// Stops at the first empty line. A repeated name keeps its last value.
pub fn parse_headers(block: &str) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();

    for line in block.split("\r\n") {
        if line.is_empty() {
            break;
        }

        let (key, value) = line
            .split_once(": ")
            .ok_or(ParseError::InvalidHeader)?;

        headers.insert(key.to_ascii_lowercase(), value.to_string());
    }

    Ok(headers)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
}
