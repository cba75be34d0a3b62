//! Harbor - minimal HTTP/1.1 file server
//!
//! Core library for request parsing, routing and response writing.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
