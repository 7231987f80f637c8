//! Riskboard - Credit Application Analytics & KPI Dashboard Engine
//!
//! One explicit load step reads the application CSV into a DataFrame;
//! the feature engine derives secondary columns (ages, employment years,
//! affordability ratios, income brackets); the metric engine computes
//! KPIs, correlation rankings, and grouped aggregates; page builders
//! assemble them into display-ready payloads.

pub mod data;
pub mod pages;
pub mod report;
pub mod stats;
