//! API server module exposing the retrieval pipeline over REST

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use server::serve_api;
