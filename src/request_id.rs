use std::{
    fmt,
    task::{Context, Poll},
};

use http::{HeaderValue, Request};
use tracing::Span;
use uuid::Uuid;

/// An identifier for a request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn new() -> Self {
        RequestId(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// `Layer` storing a fresh [`RequestId`] in the request extensions.
#[derive(Clone, Copy, Debug)]
pub struct AddRequestIdLayer;

impl<S> tower::Layer<S> for AddRequestIdLayer {
    type Service = AddRequestId<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AddRequestId { inner }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AddRequestId<S> {
    inner: S,
}

impl<B, S> tower::Service<Request<B>> for AddRequestId<S>
where
    S: tower::Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        req.extensions_mut().insert(RequestId::new());
        self.inner.call(req)
    }
}

/// Fill the `x-request-id` header from the stored [`RequestId`].
#[derive(Clone, Copy, Debug)]
pub struct UseRequestId;

impl tower_http::request_id::MakeRequestId for UseRequestId {
    fn make_request_id<B>(
        &mut self,
        req: &Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let request_id = req.extensions().get::<RequestId>()?;
        HeaderValue::from_str(&request_id.to_string())
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// Request span tagged with the request identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, req: &Request<B>) -> Span {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(ToString::to_string)
            .unwrap_or_default();

        tracing::info_span!(
            "request",
            method = %req.method(),
            uri = %req.uri(),
            version = ?req.version(),
            request_id = %request_id,
        )
    }
}
