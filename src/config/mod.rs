//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → PlannerConfig (validated, immutable)
//!     → shared via Arc with the HTTP layer and providers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Secrets may come from the environment instead of the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::PlannerConfig;
pub use schema::{
    GraphHopperConfig, ListenerConfig, LodgingConfig, MapConfig, MapboxConfig, ObservabilityConfig,
    ProviderKind, RetryConfig, TimeoutConfig,
};
