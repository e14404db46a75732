//! Request handlers for the API surface.
//!
//! Handlers that touch storage are built by factory functions closing over
//! the store they read from, so one store can back any number of routes.

use crate::domain::Position;
use crate::handler::Handler;
use crate::params::RequestParamsExt;
use crate::response::{self, Body};
use crate::store::{InvestmentStore, PositionStore, StoreError};
use http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Body as HttpBody;
use std::fmt::Display;
use std::sync::Arc;

/// Liveness probe; answers `pong`.
pub async fn healthcheck<B>(_req: Request<B>) -> Response<Body> {
    log::debug!("pong");
    response::text(StatusCode::OK, "pong")
}

/// Lists every stored position.
pub fn list_positions<B: 'static>(store: Arc<dyn PositionStore>) -> impl Handler<B> + 'static {
    move |_req: Request<B>| {
        let store = store.clone();
        async move {
            match store.all().await {
                Ok(positions) => response::json(StatusCode::OK, &positions),
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Stores a new position decoded from the JSON request body.
pub fn create_position<B>(store: Arc<dyn PositionStore>) -> impl Handler<B> + 'static
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Display,
{
    move |req: Request<B>| {
        let store = store.clone();
        async move {
            let position: Position = match read_json(req).await {
                Ok(position) => position,
                Err(response) => return response,
            };
            match store.add(position).await {
                Ok(created) => response::json(StatusCode::CREATED, &created),
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Fetches the position at the `:id` path parameter.
pub fn show_position<B: Send + 'static>(store: Arc<dyn PositionStore>) -> impl Handler<B> + 'static {
    move |req: Request<B>| {
        let store = store.clone();
        async move {
            let id = match path_id(&req) {
                Ok(id) => id,
                Err(response) => return response,
            };
            match store.get(id).await {
                Ok(position) => response::json(StatusCode::OK, &position),
                Err(StoreError::NotFound(_)) => {
                    response::text(StatusCode::NOT_FOUND, "position not found")
                }
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Replaces the position at `:id` with the decoded body.
pub fn update_position<B>(store: Arc<dyn PositionStore>) -> impl Handler<B> + 'static
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Display,
{
    move |req: Request<B>| {
        let store = store.clone();
        async move {
            let id = match path_id(&req) {
                Ok(id) => id,
                Err(response) => return response,
            };
            let mut position: Position = match read_json(req).await {
                Ok(position) => position,
                Err(response) => return response,
            };
            // the path, not the body, names the record
            position.id = id;
            match store.update(position.clone()).await {
                Ok(()) => response::json(StatusCode::OK, &position),
                Err(StoreError::NotFound(_)) => {
                    response::text(StatusCode::NOT_FOUND, "position not found")
                }
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Deletes the position at `:id`.
pub fn delete_position<B: Send + 'static>(
    store: Arc<dyn PositionStore>,
) -> impl Handler<B> + 'static {
    move |req: Request<B>| {
        let store = store.clone();
        async move {
            let id = match path_id(&req) {
                Ok(id) => id,
                Err(response) => return response,
            };
            match store.delete(id).await {
                Ok(()) => response::empty(StatusCode::NO_CONTENT),
                Err(StoreError::NotFound(_)) => {
                    response::text(StatusCode::NOT_FOUND, "position not found")
                }
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Lists every stored investment.
pub fn list_investments<B: 'static>(store: Arc<dyn InvestmentStore>) -> impl Handler<B> + 'static {
    move |_req: Request<B>| {
        let store = store.clone();
        async move {
            match store.all().await {
                Ok(investments) => response::json(StatusCode::OK, &investments),
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Fetches the investment at `:id`.
pub fn show_investment<B: Send + 'static>(
    store: Arc<dyn InvestmentStore>,
) -> impl Handler<B> + 'static {
    move |req: Request<B>| {
        let store = store.clone();
        async move {
            let id = match path_id(&req) {
                Ok(id) => id,
                Err(response) => return response,
            };
            match store.get(id).await {
                Ok(investment) => response::json(StatusCode::OK, &investment),
                Err(StoreError::NotFound(_)) => {
                    response::text(StatusCode::NOT_FOUND, "investment not found")
                }
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Lists the positions opened under the investment at `:id`.
pub fn list_investment_positions<B: Send + 'static>(
    investments: Arc<dyn InvestmentStore>,
    positions: Arc<dyn PositionStore>,
) -> impl Handler<B> + 'static {
    move |req: Request<B>| {
        let investments = investments.clone();
        let positions = positions.clone();
        async move {
            let id = match path_id(&req) {
                Ok(id) => id,
                Err(response) => return response,
            };
            match investments.get(id).await {
                Ok(_) => {}
                Err(StoreError::NotFound(_)) => {
                    return response::text(StatusCode::NOT_FOUND, "investment not found");
                }
                Err(err) => return storage_failure(err),
            }
            match positions.by_investment(id).await {
                Ok(list) => response::json(StatusCode::OK, &list),
                Err(err) => storage_failure(err),
            }
        }
    }
}

/// Parses the `:id` path parameter as a record id.
fn path_id<B>(req: &Request<B>) -> Result<i64, Response<Body>> {
    let raw = req.param("id").unwrap_or_default();
    raw.parse()
        .map_err(|_| response::text(StatusCode::BAD_REQUEST, "invalid id"))
}

/// Buffers the request body and decodes it as JSON.
async fn read_json<B, T>(req: Request<B>) -> Result<T, Response<Body>>
where
    B: HttpBody,
    B::Error: Display,
    T: serde::de::DeserializeOwned,
{
    let bytes = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            log::debug!("failed to read request body: {}", err);
            return Err(response::text(StatusCode::BAD_REQUEST, "unable to read body"));
        }
    };
    serde_json::from_slice(&bytes).map_err(|err| {
        log::debug!("failed to decode request body: {}", err);
        response::text(StatusCode::BAD_REQUEST, "unable to parse position")
    })
}

fn storage_failure(err: StoreError) -> Response<Body> {
    log::error!("store operation failed: {}", err);
    response::text(StatusCode::INTERNAL_SERVER_ERROR, "storage failure")
}
