use http::{header, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use serde::Serialize;

/// The response body type used throughout the crate.
pub type Body = Full<Bytes>;

/// A plain-text response with the given status.
pub fn text(status: StatusCode, message: impl Into<Bytes>) -> Response<Body> {
    let mut response = Response::new(Full::new(message.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// A JSON response with the given status. A value that will not serialize
/// collapses to a plain 500.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_vec(value) {
        Ok(encoded) => {
            let mut response = Response::new(Full::new(Bytes::from(encoded)));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(err) => {
            log::error!("response serialization failed: {}", err);
            text(StatusCode::INTERNAL_SERVER_ERROR, "unable to serialize response")
        }
    }
}

/// A bodyless response with the given status.
pub fn empty(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::default());
    *response.status_mut() = status;
    response
}

pub(crate) fn not_found() -> Response<Body> {
    text(StatusCode::NOT_FOUND, "404 page not found\n")
}

pub(crate) fn method_not_allowed() -> Response<Body> {
    text(StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed\n")
}

pub(crate) fn redirect(location: &str, permanent: bool) -> Response<Body> {
    let status = if permanent {
        StatusCode::PERMANENT_REDIRECT
    } else {
        StatusCode::TEMPORARY_REDIRECT
    };
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = text(status, format!("redirecting to {}\n", location));
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        // uri paths arrive percent-encoded, so only a handcrafted
        // location can land here
        Err(err) => {
            log::error!("invalid redirect location '{}': {}", location, err);
            text(StatusCode::INTERNAL_SERVER_ERROR, "invalid redirect target")
        }
    }
}
