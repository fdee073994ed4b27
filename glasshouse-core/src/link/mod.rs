//! Link health monitoring

pub mod stats;

pub use stats::LinkStatistics;
