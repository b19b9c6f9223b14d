pub mod black_scholes;
pub mod chain;
pub mod config;
pub mod contract;
pub mod iv;
pub mod solver;
pub mod straddle;

pub use black_scholes::BlackScholes;
pub use chain::{atm_options, ChainFilter};
pub use config::StraddleConfig;
pub use contract::{ChainSnapshot, OptionContract, OptionRight};
pub use iv::ImpliedVolSolver;
pub use straddle::{StraddleDecision, StraddleEngine};
