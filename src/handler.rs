use crate::response::Body;
use http::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The boxed future every handler resolves to.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<Body>> + Send>>;

/// An async request handler over request bodies of type `B`.
///
/// Any `Fn(Request<B>)` returning a sendable future of a response is a
/// handler, so plain async functions and capturing closures both qualify.
pub trait Handler<B>: Send + Sync {
    fn call(&self, req: Request<B>) -> HandlerFuture;
}

impl<B, F, Fut> Handler<B> for F
where
    F: Fn(Request<B>) -> Fut + Send + Sync,
    Fut: Future<Output = Response<Body>> + Send + 'static,
{
    fn call(&self, req: Request<B>) -> HandlerFuture {
        Box::pin(self(req))
    }
}

/// A reference-counted handler, the form routing tables store: binding one
/// handler to several methods clones the pointer, not the handler.
pub struct SharedHandler<B>(Arc<dyn Handler<B>>);

impl<B> SharedHandler<B> {
    pub fn new(handler: impl Handler<B> + 'static) -> Self {
        Self(Arc::new(handler))
    }
}

impl<B> Clone for SharedHandler<B> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<B> Debug for SharedHandler<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SharedHandler")
    }
}

impl<B> Handler<B> for SharedHandler<B> {
    fn call(&self, req: Request<B>) -> HandlerFuture {
        self.0.call(req)
    }
}

/// Wraps a handler for registration; shorthand for [`SharedHandler::new`].
pub fn shared<B>(handler: impl Handler<B> + 'static) -> SharedHandler<B> {
    SharedHandler::new(handler)
}
