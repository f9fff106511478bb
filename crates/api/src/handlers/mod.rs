pub mod alerts;
pub mod analytics;
pub mod messages;
pub mod objectives;
pub mod observations;
pub mod players;
