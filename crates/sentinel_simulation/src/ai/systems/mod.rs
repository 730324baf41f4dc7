//! AI systems (strategic layer logic)

pub mod fsm;
pub mod setup;

pub use fsm::*;
pub use setup::*;
