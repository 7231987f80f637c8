//! Grouped Aggregates Module
//! Outcome rates, counts, and summaries grouped by categorical fields.

use crate::data::{columns, loader};
use crate::stats::calculator::{self, FieldSummary};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Display categories for the binary outcome label.
pub const REPAID_LABEL: &str = "Repaid";
pub const DEFAULT_LABEL: &str = "Default";

/// Outcome counts as (repaid, defaulted). Null outcome rows are skipped.
pub fn target_counts(df: &DataFrame) -> Option<(u64, u64)> {
    let targets = loader::column_values(df, columns::TARGET)?;
    let mut repaid = 0;
    let mut defaulted = 0;
    for t in targets.into_iter().flatten() {
        if t >= 0.5 {
            defaulted += 1;
        } else {
            repaid += 1;
        }
    }
    Some((repaid, defaulted))
}

/// Mean of the outcome label per category, as a percentage, sorted
/// descending by rate.
///
/// Categories with no present outcome values are dropped entirely, never
/// reported as 0% or NaN. `None` when the column is absent.
pub fn default_rate_by(df: &DataFrame, category_col: &str) -> Option<Vec<(String, f64)>> {
    let labels = loader::category_labels(df, category_col)?;
    let targets = loader::column_values(df, columns::TARGET)?;

    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for (label, target) in labels.iter().zip(targets.iter()) {
        if let (Some(label), Some(target)) = (label, target) {
            let entry = sums.entry(label.clone()).or_insert((0.0, 0));
            entry.0 += target;
            entry.1 += 1;
        }
    }

    let mut rates: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(label, (sum, n))| (label, sum / n as f64 * 100.0))
        .collect();
    rates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    Some(rates)
}

/// Category frequencies, sorted descending by count.
pub fn counts_by(df: &DataFrame, category_col: &str) -> Option<Vec<(String, u64)>> {
    let labels = loader::category_labels(df, category_col)?;

    let mut counts: HashMap<String, u64> = HashMap::new();
    for label in labels.into_iter().flatten() {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, u64)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Some(counts)
}

/// Per-category (repaid, defaulted) counts, sorted descending by total.
pub fn counts_by_and_target(df: &DataFrame, category_col: &str) -> Option<Vec<(String, u64, u64)>> {
    let labels = loader::category_labels(df, category_col)?;
    let targets = loader::column_values(df, columns::TARGET)?;

    let mut counts: HashMap<String, (u64, u64)> = HashMap::new();
    for (label, target) in labels.iter().zip(targets.iter()) {
        if let (Some(label), Some(target)) = (label, target) {
            let entry = counts.entry(label.clone()).or_insert((0, 0));
            if *target >= 0.5 {
                entry.1 += 1;
            } else {
                entry.0 += 1;
            }
        }
    }

    let mut rows: Vec<(String, u64, u64)> = counts
        .into_iter()
        .map(|(label, (repaid, defaulted))| (label, repaid, defaulted))
        .collect();
    rows.sort_by(|a, b| {
        (b.1 + b.2)
            .cmp(&(a.1 + a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    Some(rows)
}

/// (repaid, defaulted) counts of a numeric column per value bin, using
/// ascending `edges`; the first bin includes its lower edge, values
/// outside the edges are dropped.
pub fn binned_counts_by_target(
    df: &DataFrame,
    value_col: &str,
    edges: &[f64],
) -> Option<Vec<(String, u64, u64)>> {
    if edges.len() < 2 {
        return None;
    }
    let values = loader::column_values(df, value_col)?;
    let targets = loader::column_values(df, columns::TARGET)?;

    let bins = edges.len() - 1;
    let mut counts = vec![(0u64, 0u64); bins];
    for (value, target) in values.iter().zip(targets.iter()) {
        let (Some(v), Some(target)) = (value, target) else {
            continue;
        };
        let bin = edges.windows(2).position(|w| {
            let include_lower = w[0] == edges[0];
            (*v > w[0] || (include_lower && *v >= w[0])) && *v <= w[1]
        });
        if let Some(bin) = bin {
            if *target >= 0.5 {
                counts[bin].1 += 1;
            } else {
                counts[bin].0 += 1;
            }
        }
    }

    Some(
        counts
            .into_iter()
            .enumerate()
            .map(|(i, (repaid, defaulted))| {
                let label = format!("({}, {}]", edges[i], edges[i + 1]);
                (label, repaid, defaulted)
            })
            .collect(),
    )
}

/// Present values of a column split into (repaid, defaulted) samples.
/// Rows with an absent outcome or value are dropped.
pub fn split_by_target(df: &DataFrame, value_col: &str) -> Option<(Vec<f64>, Vec<f64>)> {
    let values = loader::column_values(df, value_col)?;
    let targets = loader::column_values(df, columns::TARGET)?;

    let mut repaid = Vec::new();
    let mut defaulted = Vec::new();
    for (value, target) in values.iter().zip(targets.iter()) {
        let (Some(v), Some(target)) = (value, target) else {
            continue;
        };
        if *target >= 0.5 {
            defaulted.push(*v);
        } else {
            repaid.push(*v);
        }
    }
    Some((repaid, defaulted))
}

/// Field summaries for the repaid and defaulted groups; empty groups are
/// left out instead of reported as degenerate statistics.
pub fn summary_by_target(df: &DataFrame, value_col: &str) -> Option<Vec<(String, FieldSummary)>> {
    let (repaid, defaulted) = split_by_target(df, value_col)?;

    let wrap = |values: Vec<f64>| -> Vec<Option<f64>> { values.into_iter().map(Some).collect() };
    let mut out = Vec::new();
    if let Some(summary) = calculator::summarize(&wrap(repaid)) {
        out.push((REPAID_LABEL.to_string(), summary));
    }
    if let Some(summary) = calculator::summarize(&wrap(defaulted)) {
        out.push((DEFAULT_LABEL.to_string(), summary));
    }
    Some(out)
}

/// Default rate per income bracket, ordered by ascending bracket range.
///
/// Brackets are grouped by their derived label; ordering comes from the
/// smallest observed income in each bracket, so collapsed buckets still
/// sort correctly.
pub fn default_rate_by_bracket(df: &DataFrame) -> Option<Vec<(String, f64)>> {
    let labels = loader::category_labels(df, columns::INCOME_BRACKET)?;
    let targets = loader::column_values(df, columns::TARGET)?;
    let incomes = loader::column_values(df, columns::INCOME)?;

    struct Acc {
        sum: f64,
        n: usize,
        min_income: f64,
    }

    let mut groups: HashMap<String, Acc> = HashMap::new();
    for ((label, target), income) in labels.iter().zip(targets.iter()).zip(incomes.iter()) {
        let (Some(label), Some(target), Some(income)) = (label, target, income) else {
            continue;
        };
        let acc = groups.entry(label.clone()).or_insert(Acc {
            sum: 0.0,
            n: 0,
            min_income: f64::MAX,
        });
        acc.sum += target;
        acc.n += 1;
        acc.min_income = acc.min_income.min(*income);
    }

    let mut rates: Vec<(f64, String, f64)> = groups
        .into_iter()
        .map(|(label, acc)| (acc.min_income, label, acc.sum / acc.n as f64 * 100.0))
        .collect();
    rates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    Some(rates.into_iter().map(|(_, label, rate)| (label, rate)).collect())
}
