//! Core types shared by every subsystem.

mod config;
mod entity;
mod error;
mod pool;

pub use config::{
    ConfigError, ExtensionConfig, DEFAULT_RESERVED_TARGET_MODE_MAX, DEFAULT_RESERVED_TRIGGER_MAX,
};
pub use entity::{CardId, EntityId, RoomIndex, StatusId, SubtypeId, Team, TeamFilter};
pub use error::{contain, RegistrationError};
pub use pool::{ListPool, Pooled};
