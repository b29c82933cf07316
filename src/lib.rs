//! REST API over a single "players" collection.
//!
//! [`routes::router`] builds the route table from an [`AppState`] holding the
//! injected [`db::PlayerStore`], the request deadline and the response shape.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;
