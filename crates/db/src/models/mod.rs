//! Row models and DTOs, one module per table group.

pub mod alert;
pub mod message;
pub mod objective;
pub mod observation;
pub mod player;
