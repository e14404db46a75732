use crate::handler::Handler;
use crate::response::{self, Body};
use crate::router::{Dispatch, Router};
use http::{Request, Response};

impl<T> Router<T> {
    /// Serves one request: routes it, then awaits the selected handler.
    ///
    /// Redirects preserve the query string. On a handled dispatch the
    /// captured [`Params`](crate::Params) ride in the request extensions,
    /// even when the matched pattern binds none. Empty outcomes run the
    /// configured fallback handler, or a canned 404/405 response when
    /// there is none.
    pub async fn serve<B>(&self, mut req: Request<B>) -> Response<Body>
    where
        T: Handler<B>,
    {
        match self.dispatch(req.method(), req.uri().path()) {
            Dispatch::Redirect { location, permanent } => {
                let location = match req.uri().query() {
                    Some(query) => format!("{}?{}", location, query),
                    None => location.as_str().to_owned(),
                };
                response::redirect(&location, permanent)
            }
            Dispatch::Handle { handler, params } => {
                req.extensions_mut().insert(params);
                handler.call(req).await
            }
            Dispatch::NotFound { handler } => match handler {
                Some(handler) => handler.call(req).await,
                None => response::not_found(),
            },
            Dispatch::MethodNotAllowed { handler } => match handler {
                Some(handler) => handler.call(req).await,
                None => response::method_not_allowed(),
            },
        }
    }
}
