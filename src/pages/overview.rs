//! Overview & Data Quality Page

use crate::data::{columns, loader};
use crate::report::{ChartSpec, Kpi, PageReport};
use crate::stats::{calculator, groups};
use polars::prelude::*;
use std::cmp::Ordering;

pub const TITLE: &str = "Overview & Data Quality";

pub fn build(df: &DataFrame) -> PageReport {
    let ages = loader::column_values(df, columns::AGE_YEARS);
    let incomes = loader::column_values(df, columns::INCOME);
    let credits = loader::column_values(df, columns::CREDIT);
    let targets = loader::column_values(df, columns::TARGET);

    let default_rate = targets
        .as_deref()
        .and_then(calculator::mean)
        .map(|m| m * 100.0);
    let repaid_rate = default_rate.map(|rate| 100.0 - rate);

    let missing = loader::null_fractions(df);
    let avg_missing = if missing.is_empty() {
        None
    } else {
        Some(missing.iter().map(|(_, frac)| frac).sum::<f64>() / missing.len() as f64 * 100.0)
    };

    let kpis = vec![
        Kpi::count(
            "Total Applicants",
            loader::distinct_count(df, columns::ID).map(|n| n as u64),
        ),
        Kpi::percent("Default Rate (%)", default_rate),
        Kpi::percent("Repaid Rate (%)", repaid_rate),
        Kpi::count("Total Features", Some(df.width() as u64)),
        Kpi::percent("Avg Missing per Feature (%)", avg_missing),
        Kpi::count(
            "Numerical Features",
            Some(loader::numeric_columns(df).len() as u64),
        ),
        Kpi::count(
            "Categorical Features",
            Some(loader::categorical_columns(df).len() as u64),
        ),
        Kpi::number("Median Age (Years)", ages.as_deref().and_then(calculator::median)),
        Kpi::number(
            "Median Annual Income",
            incomes.as_deref().and_then(calculator::median),
        ),
        Kpi::number(
            "Average Credit Amount",
            credits.as_deref().and_then(calculator::mean),
        ),
    ];

    let mut charts = Vec::new();

    if let Some((repaid, defaulted)) = groups::target_counts(df) {
        charts.push(ChartSpec::CategoryCounts {
            title: "Target Distribution".to_string(),
            counts: vec![
                (groups::REPAID_LABEL.to_string(), repaid),
                (groups::DEFAULT_LABEL.to_string(), defaulted),
            ],
        });
    }

    let mut top_missing: Vec<(String, f64)> = missing
        .into_iter()
        .map(|(name, frac)| (name, frac * 100.0))
        .collect();
    top_missing.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    top_missing.truncate(20);
    charts.push(ChartSpec::CategoryRates {
        title: "Top 20 Features by Missing %".to_string(),
        rates: top_missing,
    });

    for (title, category_col) in [
        ("Applicants by Gender", columns::GENDER),
        ("Applicants by Family Status", columns::FAMILY_STATUS),
        ("Applicants by Education Level", columns::EDUCATION),
    ] {
        if let Some(counts) = groups::counts_by(df, category_col) {
            charts.push(ChartSpec::CategoryCounts {
                title: title.to_string(),
                counts,
            });
        }
    }

    let distributions: [(&str, &Option<Vec<Option<f64>>>, usize, Option<(f64, f64)>); 3] = [
        ("Age Distribution", &ages, 30, None),
        ("Income Distribution", &incomes, 50, Some((0.0, 500_000.0))),
        (
            "Credit Amount Distribution",
            &credits,
            50,
            Some((0.0, 2_000_000.0)),
        ),
    ];
    for (title, values, bins, range) in distributions {
        let Some(values) = values else { continue };
        if let Some(histogram) = calculator::histogram(values, bins, range) {
            charts.push(ChartSpec::Distribution {
                title: title.to_string(),
                histogram,
            });
        }
    }

    PageReport {
        title: TITLE.to_string(),
        kpis,
        charts,
    }
}
