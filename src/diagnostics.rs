//! Serializable run records for the command-line tools.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};
