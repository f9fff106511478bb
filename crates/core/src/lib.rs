//! Squadline domain logic.
//!
//! Everything in this crate is pure: no database access, no network. The
//! db, events and api crates feed it data and act on its results.

pub mod aggregation;
pub mod alerting;
pub mod error;
pub mod metric_names;
pub mod objective;
pub mod observation;
pub mod pagination;
pub mod types;
pub mod validation;
