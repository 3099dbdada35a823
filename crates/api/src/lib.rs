//! Barangay portal gateway library.
//!
//! Exposes the building blocks (config, state, error handling, backend
//! client, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod backend;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
