//! Request identity.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Preserve an ID supplied by a trusted upstream proxy
//! - Expose the ID to handlers via request extensions
//!
//! # Design Decisions
//! - The ID is both a header (propagated downstream) and an extension
//!   (typed access for handlers and tracing)

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Typed request ID attached to request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

/// Layer that stamps every request with an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        if req.headers().get(X_REQUEST_ID).is_none() {
            let id = Uuid::new_v4();
            // A UUID is always a valid header value.
            if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
                req.headers_mut().insert(X_REQUEST_ID, value);
            }
            req.extensions_mut().insert(RequestId(id));
        }
        self.inner.call(req)
    }
}

/// Typed access to the request ID.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<RequestId>;
}

impl RequestIdExt for Request<Body> {
    fn request_id(&self) -> Option<RequestId> {
        self.extensions().get::<RequestId>().copied()
    }
}
