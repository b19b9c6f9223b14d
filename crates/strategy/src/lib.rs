pub mod config;
pub mod engine;
pub mod indicators;
pub mod signals;

pub use config::{AssetClass, MomentumConfig, UniverseGroup};
pub use engine::{MomentumEngine, POSITION_FRACTION};
pub use indicators::{IndicatorBank, IndicatorSettings};
