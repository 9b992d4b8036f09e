//! Concrete [`GameService`](crate::api::GameService) implementations.

mod http;

pub use http::HttpGameService;
