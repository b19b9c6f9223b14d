pub mod config;
pub mod error;
pub mod execution;
pub mod types;

pub use config::{Config, StrategyKind};
pub use error::{Error, Result};
pub use execution::ExecutionClient;
pub use types::*;
