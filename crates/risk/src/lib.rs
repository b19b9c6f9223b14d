pub mod exits;
pub mod position;

pub use exits::ExitRules;
pub use position::{PositionBook, TrackedPosition, TRAILING_ATR_MULTIPLIER};
