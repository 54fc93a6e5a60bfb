//! Route table mapping `(method, path)` to handlers.

use std::fmt;
use std::sync::Arc;

use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};

/// What a handler gets to work with.
pub struct Context<'a> {
    pub request: &'a Request,
    pub response: &'a mut Response,
}

/// A request handler. It is done when it returns.
pub type Handler = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Exact-match routes on the request path, query string excluded.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `path`.
    ///
    /// If the pair is already registered the first handler is kept.
    pub fn route<F>(&mut self, method: Method, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        let path = path.into();
        if self.find(method, &path).is_some() {
            tracing::warn!(%method, %path, "Duplicate route ignored");
            return self;
        }

        self.routes.push(Route {
            method,
            path,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn get<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn put<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::PUT, path, handler)
    }

    pub fn delete<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::DELETE, path, handler)
    }

    pub fn patch<F>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::PATCH, path, handler)
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    fn find(&self, method: Method, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.method == method && r.path == path)
    }

    /// Runs the matching handler and returns the response it produced.
    ///
    /// HEAD falls back to the GET handler. Without a match the response is
    /// 501 for unknown methods, 405 when the path exists under another method
    /// and 404 otherwise.
    pub fn dispatch(&self, request: &Request) -> Response {
        let path = request.uri.path();

        if request.method == Method::UNDETERMINED {
            tracing::debug!(method = %request.method_name, %path, "Unsupported method");
            return Response::error(StatusCode::NotImplemented);
        }

        let route = self.find(request.method, path).or_else(|| {
            (request.method == Method::HEAD)
                .then(|| self.find(Method::GET, path))
                .flatten()
        });

        let Some(route) = route else {
            let status = if self.routes.iter().any(|r| r.path == path) {
                StatusCode::MethodNotAllowed
            } else {
                StatusCode::NotFound
            };
            tracing::debug!(method = %request.method, %path, status = status.as_u16(), "No route");
            return Response::error(status);
        };

        let mut response = Response::new();
        let mut ctx = Context {
            request,
            response: &mut response,
        };
        (route.handler)(&mut ctx);

        response
    }
}

impl fmt::Display for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for route in &self.routes {
            writeln!(f, "{:<8}{}", route.method, route.path)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| (r.method, &r.path)))
            .finish()
    }
}
