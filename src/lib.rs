//! petrel is a portfolio tracking API built around a hand-rolled HTTP
//! router: normalized [`Path`]s with `:name` parameter segments,
//! [`Route`]s binding one handler per method, and [`Router`]s that nest
//! under shared prefixes, redirect non-canonical paths, and fall back
//! through inherited error handlers.
//!
//! Routing is independent of any handler type:
//!
//! ```rust
//! use http::Method;
//! use petrel::{Dispatch, Router};
//!
//! let mut router = Router::new("/");
//! router.get("/positions/:id", 1);
//!
//! match router.dispatch(&Method::GET, "/positions/42") {
//!     Dispatch::Handle { handler, params } => {
//!         assert_eq!(*handler, 1);
//!         assert_eq!(params.get("id"), Some("42"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! For serving, [`Router::serve`] runs any [`Handler`] against a request
//! and turns the empty outcomes into plain 404 and 405 responses.

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod handlers;
pub mod server;
pub mod store;

mod handler;
mod params;
mod path;
mod response;
mod route;
mod router;
mod segment;
mod service;

pub use config::{ConfigError, Settings};
pub use handler::{shared, Handler, HandlerFuture, SharedHandler};
pub use params::{params, Params, ParamsPos, RequestParamsExt};
pub use path::Path;
pub use response::{empty, json, text, Body};
pub use route::Route;
pub use router::{Dispatch, Router};
pub use segment::Segment;
