//! Squadline API server library.
//!
//! Exposes config, state, error handling, routes and the alert listener so
//! integration tests and the binary entrypoint can both access them.

pub mod alerts;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
