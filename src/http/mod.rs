//! HTTP protocol implementation.
//!
//! This module implements the subset of HTTP/1.1 the server speaks: exactly one
//! request per connection, answered and then closed.
//!
//! # Architecture
//!
//! - **`connection`**: Drives one socket through read, dispatch, write and close
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`encoding`**: `Accept-Encoding` negotiation and gzip compression
//! - **`writer`**: Formats the response head and writes head and body to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Accumulate bytes until a full request is parsed
//!        └──────┬──────┘
//!               │ Request received (or 400 on malformed input)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route dispatch produces a response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head block, then body
//!        └──────┬───────────┘
//!               │
//!               └─ Closed
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod encoding;
