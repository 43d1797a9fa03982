//! Core types shared by every layer
//!
//! - `AppConfig` - Configuration resolved once at startup
//! - `AgentError` - Error types

pub mod config;
pub mod error;

pub use config::{load_dotenv, AppConfig, BrokerConfig, LlmConfig, LogConfig, LogFormat};
pub use error::{AgentError, AgentResult};
