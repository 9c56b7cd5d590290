//! # crossroad
//!
//! A small HTTP demo service. It keeps two pieces of process-local state,
//! a string map of samples and an ordered list of integers, delegates one
//! visit counter to Redis, redirects `/random` to one of five views, and
//! validates form and JSON bodies.
//!
//! ## Layout
//!
//! - [`DemoService`] owns the state and the [`CounterStore`] handle.
//! - [`routes::app`] wires it into a [`Router`].
//! - [`Server`] runs the router on hyper with graceful shutdown.
//!
//! ## Running in-process
//!
//! ```rust
//! use std::sync::Arc;
//! use crossroad::{DemoService, MemoryCounter, Method, Request, Status, routes};
//!
//! # #[tokio::main] async fn main() {
//! let service = Arc::new(DemoService::new(Arc::new(MemoryCounter::new())));
//! let app = routes::app(service);
//!
//! let res = app.handle(Request::new(Method::Get, "/sample/add/colour/blue")).await;
//! assert_eq!(res.code(), Status::Ok);
//! assert_eq!(res.body(), br#"{"colour":"blue"}"#);
//! # }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod counter;
pub mod health;
pub mod redirect;
pub mod routes;
pub mod service;
pub mod store;
pub mod validate;

pub use config::Config;
pub use counter::{CounterStore, MemoryCounter, RedisCounter};
pub use error::{Error, ServiceError};
pub use handler::{Handler, with_state};
pub use method::Method;
pub use redirect::RouteName;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, serve_listener, shutdown_signal};
pub use service::DemoService;
pub use status::Status;
pub use store::{IntegerSequence, KeyValueStore};
