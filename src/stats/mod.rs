//! Statistics module - descriptive stats, correlations, grouped aggregates

pub mod calculator;
pub mod correlation;
pub mod groups;

pub use calculator::{FieldSummary, GapTest, Histogram};
pub use correlation::CorrelationRanking;
