//! Outbound delivery channels for alerts.

pub mod webhook;
