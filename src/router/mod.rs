//! Route table and dispatch.
//!
//! Routes are evaluated top to bottom and the first one whose method and path
//! pattern both match handles the request. Anything left over is a 404.

pub mod handlers;

use std::path::PathBuf;

use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// Only requests carrying this exact version token can match a route.
const ROUTABLE_VERSION: &str = "HTTP/1.1";

/// Shape of the path a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// The path must equal this string.
    Exact(&'static str),
    /// The path must start with this prefix; the non-empty remainder is captured.
    Prefix(&'static str),
}

impl PathPattern {
    /// Returns the captured tail on a match (empty for `Exact`).
    pub fn capture<'p>(&self, path: &'p str) -> Option<&'p str> {
        match self {
            PathPattern::Exact(expected) => (path == *expected).then_some(""),
            PathPattern::Prefix(prefix) => path
                .strip_prefix(prefix)
                .filter(|tail| !tail.is_empty()),
        }
    }
}

/// Handler selected by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Root,
    Echo,
    UserAgent,
    ReadFile,
    CreateFile,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: Handler,
}

impl Route {
    fn new(method: Method, pattern: PathPattern, handler: Handler) -> Self {
        Self {
            method,
            pattern,
            handler,
        }
    }
}

/// Immutable route table plus the directory exposed under `/files/`.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    directory: PathBuf,
}

impl Router {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let routes = vec![
            Route::new(Method::GET, PathPattern::Exact("/"), Handler::Root),
            Route::new(Method::GET, PathPattern::Prefix("/echo/"), Handler::Echo),
            Route::new(Method::GET, PathPattern::Exact("/user-agent"), Handler::UserAgent),
            Route::new(Method::GET, PathPattern::Prefix("/files/"), Handler::ReadFile),
            Route::new(Method::POST, PathPattern::Prefix("/files/"), Handler::CreateFile),
        ];

        Self {
            routes,
            directory: directory.into(),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }

    /// Finds the first matching route and the captured path tail.
    pub fn resolve<'r>(&self, req: &'r Request) -> Option<(Handler, &'r str)> {
        if req.version != ROUTABLE_VERSION {
            return None;
        }

        self.routes
            .iter()
            .filter(|route| route.method == req.method)
            .find_map(|route| {
                route
                    .pattern
                    .capture(&req.path)
                    .map(|tail| (route.handler, tail))
            })
    }

    pub async fn dispatch(&self, req: &Request) -> Response {
        let Some((handler, tail)) = self.resolve(req) else {
            tracing::debug!(method = ?req.method, path = %req.path, "No route matched");
            return Response::not_found();
        };

        match handler {
            Handler::Root => handlers::root(),
            Handler::Echo => handlers::echo(req, tail),
            Handler::UserAgent => handlers::user_agent(req),
            Handler::ReadFile => handlers::read_file(&self.directory, tail).await,
            Handler::CreateFile => handlers::create_file(&self.directory, tail, &req.body).await,
        }
    }
}
