//! System orchestration, startup, and shutdown logic.

pub mod board_system;
pub mod config;
pub mod tracing;

pub use board_system::*;
pub use config::*;
pub use self::tracing::*;
