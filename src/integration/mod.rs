//! Wiring of configuration, routing and input handling into a session

pub mod config;
pub mod coordinator;

pub use config::{AssistantConfig, ChatConfig, ConfigWarning, SearchConfig};
pub use coordinator::SessionCoordinator;
