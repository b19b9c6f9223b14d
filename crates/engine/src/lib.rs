pub mod config;
pub mod data;
pub mod executor;
pub mod replay;
pub mod schedule;

pub use config::StrategyFileConfig;
pub use executor::{ExecutionReport, IntentExecutor};
pub use replay::{MomentumReplay, ReplaySummary, StraddleReplay};
pub use schedule::DailySchedule;
