//! Report Module
//! Typed KPI and chart payloads handed to the display layer.
//!
//! Values are full precision; rounding, currency formatting, and layout
//! are presentation concerns and stay out of the engine.

use crate::stats::calculator::{FieldSummary, Histogram};
use serde::Serialize;

/// One rendered dashboard page: KPI tiles plus chart payloads.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub title: String,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<ChartSpec>,
}

/// A single KPI tile.
#[derive(Debug, Clone, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: KpiValue,
}

/// KPI value; `Missing` marks a locally unavailable metric and renders
/// as "N/A" downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum KpiValue {
    Count(u64),
    Number(f64),
    /// A percentage in [0, 100].
    Percent(f64),
    Text(String),
    Flag(bool),
    Missing,
}

impl Kpi {
    pub fn count(label: &str, value: Option<u64>) -> Self {
        Self {
            label: label.to_string(),
            value: value.map_or(KpiValue::Missing, KpiValue::Count),
        }
    }

    pub fn number(label: &str, value: Option<f64>) -> Self {
        Self {
            label: label.to_string(),
            value: value.map_or(KpiValue::Missing, KpiValue::Number),
        }
    }

    pub fn percent(label: &str, value: Option<f64>) -> Self {
        Self {
            label: label.to_string(),
            value: value.map_or(KpiValue::Missing, KpiValue::Percent),
        }
    }

    pub fn text(label: &str, value: Option<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.map_or(KpiValue::Missing, KpiValue::Text),
        }
    }

    pub fn flag(label: &str, value: Option<bool>) -> Self {
        Self {
            label: label.to_string(),
            value: value.map_or(KpiValue::Missing, KpiValue::Flag),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value == KpiValue::Missing
    }
}

/// Data payload for one chart; the display layer owns the pixels.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum ChartSpec {
    /// Frequency per category label.
    CategoryCounts {
        title: String,
        counts: Vec<(String, u64)>,
    },
    /// Percentage in [0, 100] per category label.
    CategoryRates {
        title: String,
        rates: Vec<(String, f64)>,
    },
    /// Ordered (feature, coefficient) pairs.
    CorrelationPairs {
        title: String,
        pairs: Vec<(String, f64)>,
    },
    /// Pairwise correlation matrix; `None` marks an undefined cell.
    CorrelationMatrix {
        title: String,
        labels: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    },
    /// Binned distribution of a numeric field.
    Distribution { title: String, histogram: Histogram },
    /// Per-category stacked repaid/defaulted counts.
    StackedOutcomeCounts {
        title: String,
        rows: Vec<OutcomeCounts>,
    },
    /// Descriptive summary per group (box-style payload).
    GroupedSummary {
        title: String,
        groups: Vec<(String, FieldSummary)>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeCounts {
    pub category: String,
    pub repaid: u64,
    pub defaulted: u64,
}
