//! Content-encoding negotiation and compression.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Encodings the server can apply to a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
    /// No compression; the body goes out as-is.
    Identity,
}

/// Encodings the server can produce, matched by token name.
const SUPPORTED: &[(&str, ContentEncoding)] = &[("gzip", ContentEncoding::Gzip)];

impl ContentEncoding {
    /// Value for the `Content-Encoding` header, `None` for identity.
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            ContentEncoding::Gzip => Some("gzip"),
            ContentEncoding::Identity => None,
        }
    }
}

/// Picks the first encoding in the client's `Accept-Encoding` list that the
/// server supports. Client order decides; parameters after `;` are ignored.
pub fn negotiate(accept_encoding: Option<&str>) -> ContentEncoding {
    let Some(value) = accept_encoding else {
        return ContentEncoding::Identity;
    };

    value
        .split(',')
        .map(|entry| entry.split(';').next().unwrap_or("").trim())
        .find_map(|name| {
            SUPPORTED
                .iter()
                .find(|(supported, _)| supported.eq_ignore_ascii_case(name))
                .map(|(_, encoding)| *encoding)
        })
        .unwrap_or(ContentEncoding::Identity)
}

/// Applies `encoding` to `body`.
pub fn encode(body: &[u8], encoding: ContentEncoding) -> std::io::Result<Vec<u8>> {
    match encoding {
        ContentEncoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(body)?;
            encoder.finish()
        }
        ContentEncoding::Identity => Ok(body.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_header_is_identity() {
        assert_eq!(negotiate(None), ContentEncoding::Identity);
    }

    #[test]
    fn gzip_found_later_in_list() {
        assert_eq!(negotiate(Some("br, deflate, gzip")), ContentEncoding::Gzip);
    }

    #[test]
    fn parameters_are_ignored() {
        assert_eq!(negotiate(Some("GZIP;q=0.8")), ContentEncoding::Gzip);
    }

    #[test]
    fn identity_passes_body_through() {
        assert_eq!(encode(b"abc", ContentEncoding::Identity).unwrap(), b"abc".to_vec());
    }
}
