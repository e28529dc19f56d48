//! Command handlers for the normqa CLI.

mod ask;
mod stats;

pub use ask::AskCommand;
pub use stats::StatsCommand;
