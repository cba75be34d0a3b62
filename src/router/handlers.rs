//! Route handlers.
//!
//! File handlers treat the captured path tail as a bare file name inside the
//! served directory. Names that could escape it are rejected with 400.

use std::io::ErrorKind;
use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::http::encoding;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

pub fn root() -> Response {
    Response::ok()
}

/// Echoes `value` back, gzip-compressed when the client accepts it.
pub fn echo(req: &Request, value: &str) -> Response {
    let encoding = encoding::negotiate(req.header("Accept-Encoding"));

    let body = match encoding::encode(value.as_bytes(), encoding) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, ?encoding, "Failed to encode echo body");
            return Response::internal_error();
        }
    };

    let mut builder = ResponseBuilder::new(StatusCode::Ok).header("Content-Type", "text/plain");
    if let Some(name) = encoding.header_value() {
        builder = builder.header("Content-Encoding", name);
    }
    builder.body(body).build()
}

pub fn user_agent(req: &Request) -> Response {
    match req.header("User-Agent") {
        Some(agent) => Response::text(agent),
        None => {
            tracing::warn!("Missing User-Agent header");
            Response::bad_request()
        }
    }
}

pub async fn read_file(directory: &Path, name: &str) -> Response {
    if !is_safe_file_name(name) {
        tracing::warn!(file = name, "Rejected file name");
        return Response::bad_request();
    }

    let path = directory.join(name);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Response::not_found(),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to stat file");
            return Response::internal_error();
        }
    };

    if !metadata.is_file() {
        return Response::not_found();
    }

    match tokio::fs::read(&path).await {
        Ok(contents) => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "application/octet-stream")
            .body(contents)
            .build(),
        Err(e) if e.kind() == ErrorKind::NotFound => Response::not_found(),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read file");
            Response::internal_error()
        }
    }
}

/// Creates `name` with `body` as its contents. Never overwrites.
///
/// The create is exclusive, so of several concurrent POSTs to one name exactly
/// one gets 201 and the rest get 409.
pub async fn create_file(directory: &Path, name: &str, body: &[u8]) -> Response {
    if !is_safe_file_name(name) {
        tracing::warn!(file = name, "Rejected file name");
        return Response::bad_request();
    }

    let path = directory.join(name);

    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::info!(path = %path.display(), "File already exists");
            return Response::conflict();
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to create file");
            return Response::internal_error();
        }
    };

    let written = async {
        file.write_all(body).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        tracing::error!(path = %path.display(), error = %e, "Failed to write file");
        // Drop the partial file so the name is free again.
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::error!(path = %path.display(), error = %e, "Failed to remove partial file");
        }
        return Response::internal_error();
    }

    ResponseBuilder::new(StatusCode::Created)
        .body("File created")
        .build()
}

/// True when `name` is a single path component inside the served directory.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
