//! Background alerting for submitted observations.

pub mod listener;

pub use listener::AlertListener;
