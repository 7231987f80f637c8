//! Correlation Analysis Module
//! Ranks numeric columns by correlation with the outcome label and
//! computes cross-column correlation KPIs.

use crate::data::loader;
use crate::stats::calculator;
use polars::prelude::*;
use rayon::prelude::*;
use std::cmp::Ordering;

/// One ranked column with its coefficient against the outcome.
#[derive(Debug, Clone)]
pub struct CorrEntry {
    pub name: String,
    pub coefficient: f64,
}

/// Pearson correlations of the numeric columns against one target
/// column, sorted descending by coefficient.
#[derive(Debug, Clone)]
pub struct CorrelationRanking {
    entries: Vec<CorrEntry>,
}

impl CorrelationRanking {
    /// Correlate every numeric column (original column order, target
    /// excluded) against `target`, in parallel.
    ///
    /// Zero-variance columns have no defined coefficient and are left
    /// out of the ranking rather than failing it. The sort is stable,
    /// so tied coefficients keep original column order.
    pub fn against(df: &DataFrame, target: &str) -> Self {
        let Some(target_values) = loader::column_values(df, target) else {
            return Self {
                entries: Vec::new(),
            };
        };

        let names: Vec<String> = loader::numeric_columns(df)
            .into_iter()
            .filter(|name| name != target)
            .collect();

        let mut entries: Vec<CorrEntry> = names
            .par_iter()
            .filter_map(|name| {
                let values = loader::column_values(df, name)?;
                let coefficient = calculator::pearson(&values, &target_values)?;
                Some(CorrEntry {
                    name: name.clone(),
                    coefficient,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.coefficient
                .partial_cmp(&a.coefficient)
                .unwrap_or(Ordering::Equal)
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[CorrEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top positive coefficients, descending.
    pub fn top_positive(&self, n: usize) -> Vec<CorrEntry> {
        self.entries
            .iter()
            .filter(|e| e.coefficient > 0.0)
            .take(n)
            .cloned()
            .collect()
    }

    /// Most negative coefficients, ascending. Sign-filtered so the list
    /// is always disjoint from `top_positive`.
    pub fn top_negative(&self, n: usize) -> Vec<CorrEntry> {
        let mut negatives: Vec<CorrEntry> = self
            .entries
            .iter()
            .filter(|e| e.coefficient < 0.0)
            .cloned()
            .collect();
        negatives.sort_by(|a, b| {
            a.coefficient
                .partial_cmp(&b.coefficient)
                .unwrap_or(Ordering::Equal)
        });
        negatives.truncate(n);
        negatives
    }

    /// Coefficient of one ranked column, if it made the ranking.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.coefficient)
    }

    /// Sum of squared coefficients of the top-5 absolute correlations.
    /// A heuristic R-squared surrogate, not a validated statistic.
    pub fn variance_explained_proxy(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let mut coefficients: Vec<f64> = self.entries.iter().map(|e| e.coefficient).collect();
        coefficients.sort_by(|a, b| b.abs().partial_cmp(&a.abs()).unwrap_or(Ordering::Equal));
        Some(coefficients.iter().take(5).map(|c| c * c).sum())
    }

    /// Number of columns with an absolute coefficient above `threshold`.
    pub fn strong_count(&self, threshold: f64) -> usize {
        self.entries
            .iter()
            .filter(|e| e.coefficient.abs() > threshold)
            .count()
    }
}

/// Pairwise-complete correlation between two named columns.
pub fn column_correlation(df: &DataFrame, a: &str, b: &str) -> Option<f64> {
    let xs = loader::column_values(df, a)?;
    let ys = loader::column_values(df, b)?;
    calculator::pearson(&xs, &ys)
}

/// Column (other than `name`) with the largest absolute correlation to
/// it; ties broken by first occurrence in column order.
pub fn most_correlated_with(df: &DataFrame, name: &str) -> Option<(String, f64)> {
    let base = loader::column_values(df, name)?;
    let candidates: Vec<String> = loader::numeric_columns(df)
        .into_iter()
        .filter(|other| other != name)
        .collect();

    let coefficients: Vec<(String, f64)> = candidates
        .par_iter()
        .filter_map(|other| {
            let values = loader::column_values(df, other)?;
            calculator::pearson(&values, &base).map(|c| (other.clone(), c))
        })
        .collect();

    // Strictly-greater comparison keeps the earliest column on ties.
    let mut best: Option<(String, f64)> = None;
    for (other, coefficient) in coefficients {
        let better = match &best {
            Some((_, current)) => coefficient.abs() > current.abs(),
            None => true,
        };
        if better {
            best = Some((other, coefficient));
        }
    }
    best
}

/// Pairwise-complete correlation matrix over the named columns.
///
/// Absent columns are skipped; the returned labels list the columns
/// actually present. `None` cells mark undefined coefficients.
pub fn matrix(df: &DataFrame, names: &[&str]) -> (Vec<String>, Vec<Vec<Option<f64>>>) {
    let series: Vec<(String, Vec<Option<f64>>)> = names
        .iter()
        .filter_map(|name| loader::column_values(df, name).map(|v| (name.to_string(), v)))
        .collect();

    let labels: Vec<String> = series.iter().map(|(name, _)| name.clone()).collect();
    let values = series
        .iter()
        .map(|(_, xs)| {
            series
                .iter()
                .map(|(_, ys)| calculator::pearson(xs, ys))
                .collect()
        })
        .collect();
    (labels, values)
}
