//! Feature Engineering Module
//! Derives secondary columns from the raw application table.

use crate::data::{columns, loader};
use crate::stats::calculator;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Employment-days placeholder used upstream for "not employed"; it must
/// be translated to a true missing value before any conversion.
pub const EMPLOYED_SENTINEL: f64 = 365_243.0;

/// Days per year for age and employment conversion.
///
/// `abs(days) / 365.25` is the canonical form. The integer-truncated
/// `abs(days) / 365` also seen in the wild is an interchangeable
/// approximation of the same quantity, not a distinct feature.
pub const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column missing: {0}")]
    MissingColumn(String),
}

/// Augment the loaded table with the derived columns.
///
/// The outcome label must be present; every other input is optional and
/// its derived column is simply skipped when the source column is absent,
/// so one missing field costs one KPI rather than the page. Derived
/// values are recomputed on every load and never persisted.
pub fn derive_features(df: &DataFrame) -> Result<DataFrame, FeatureError> {
    if df.column(columns::TARGET).is_err() {
        return Err(FeatureError::MissingColumn(columns::TARGET.to_string()));
    }

    let mut out = df.clone();

    if let Some(birth_days) = loader::column_values(df, columns::DAYS_BIRTH) {
        let ages: Vec<Option<f64>> = birth_days
            .iter()
            .map(|days| days.map(|d| d.abs() / DAYS_PER_YEAR))
            .collect();
        out.with_column(Column::new(columns::AGE_YEARS.into(), ages))?;
    }

    if let Some(employed_days) = loader::column_values(df, columns::DAYS_EMPLOYED) {
        let years: Vec<Option<f64>> = employed_days
            .iter()
            .map(|days| match days {
                Some(d) if *d == EMPLOYED_SENTINEL => None,
                Some(d) => Some(d.abs() / DAYS_PER_YEAR),
                None => None,
            })
            .collect();
        out.with_column(Column::new(columns::EMPLOYMENT_YEARS.into(), years))?;
    }

    if let Some(incomes) = loader::column_values(df, columns::INCOME) {
        if let Some(annuities) = loader::column_values(df, columns::ANNUITY) {
            out.with_column(Column::new(columns::DTI.into(), ratio_of(&annuities, &incomes)))?;
        }
        if let Some(credits) = loader::column_values(df, columns::CREDIT) {
            out.with_column(Column::new(columns::LTI.into(), ratio_of(&credits, &incomes)))?;
        }
        if let Some(brackets) = IncomeBrackets::fit(&incomes) {
            let labels: Vec<Option<String>> = incomes
                .iter()
                .map(|income| income.map(|v| brackets.label_for(v)))
                .collect();
            out.with_column(Column::new(columns::INCOME_BRACKET.into(), labels))?;
        }
    }

    if let Some(children) = loader::column_values(df, columns::CHILDREN) {
        // Null or negative child counts count as childless.
        let cleaned: Vec<f64> = children
            .iter()
            .map(|count| match count {
                Some(c) if *c > 0.0 => c.floor(),
                _ => 0.0,
            })
            .collect();
        out.with_column(Column::new(columns::CHILDREN.into(), cleaned))?;
    }

    debug!(columns = out.width(), "derived feature columns");
    Ok(out)
}

/// Element-wise numerator / denominator.
///
/// A zero or absent denominator yields an absent ratio, never a division
/// error or an infinity.
fn ratio_of(numer: &[Option<f64>], denom: &[Option<f64>]) -> Vec<Option<f64>> {
    numer
        .iter()
        .zip(denom.iter())
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) if *d != 0.0 => Some(n / d),
            _ => None,
        })
        .collect()
}

/// Equal-frequency decile partition of a numeric column.
///
/// Cut-points are the quantiles of the current dataset. Duplicate
/// cut-points collapse adjacent buckets, so heavily tied data (e.g. many
/// zero incomes) produces fewer than ten groups.
#[derive(Debug, Clone)]
pub struct IncomeBrackets {
    edges: Vec<f64>,
}

impl IncomeBrackets {
    pub const BUCKETS: usize = 10;

    /// Fit decile edges on the present values; `None` when every value is
    /// absent.
    pub fn fit(values: &[Option<f64>]) -> Option<Self> {
        let mut present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return None;
        }
        present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut edges: Vec<f64> = (0..=Self::BUCKETS)
            .map(|k| calculator::percentile(&present, k as f64 * 100.0 / Self::BUCKETS as f64))
            .collect();
        edges.dedup();
        if edges.len() == 1 {
            // Every value ties; keep one degenerate bucket covering them.
            edges.push(edges[0]);
        }
        Some(Self { edges })
    }

    /// Bucket index for a value. Fitted values always land in a bucket;
    /// out-of-range values clamp into the end buckets.
    pub fn bucket_of(&self, value: f64) -> usize {
        let last = self.edges.len() - 2;
        self.edges
            .windows(2)
            .position(|w| value <= w[1])
            .map_or(last, |i| i.min(last))
    }

    /// Interval label for a bucket, lower edge exclusive except for the
    /// first bucket.
    pub fn label(&self, bucket: usize) -> String {
        let lo = self.edges[bucket];
        let hi = self.edges[bucket + 1];
        format!("({lo}, {hi}]")
    }

    pub fn label_for(&self, value: f64) -> String {
        self.label(self.bucket_of(value))
    }

    pub fn bucket_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }
}
