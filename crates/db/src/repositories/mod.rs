//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alert_record_repo;
pub mod alert_settings_repo;
pub mod message_repo;
pub mod objective_repo;
pub mod observation_repo;
pub mod player_repo;

pub use alert_record_repo::AlertRecordRepo;
pub use alert_settings_repo::AlertSettingsRepo;
pub use message_repo::MessageRepo;
pub use objective_repo::ObjectiveRepo;
pub use observation_repo::ObservationRepo;
pub use player_repo::PlayerRepo;
