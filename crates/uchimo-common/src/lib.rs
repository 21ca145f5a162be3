//! # uchimo-common
//!
//! Shared utilities including configuration, error handling, the explicit
//! auth session, and telemetry.

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, FeedConfig, GuardPolicy,
    PostingConfig, ToggleConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use session::{AuthState, Session};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
