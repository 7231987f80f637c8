//! Target & Risk Segmentation Page

use crate::data::{columns, loader};
use crate::report::{ChartSpec, Kpi, OutcomeCounts, PageReport};
use crate::stats::{calculator, groups};
use polars::prelude::*;

pub const TITLE: &str = "Target & Risk Segmentation";

/// Employment-years bin edges for the stacked outcome chart.
const EMPLOYMENT_BINS: [f64; 8] = [0.0, 1.0, 3.0, 5.0, 10.0, 20.0, 40.0, 100.0];

pub fn build(df: &DataFrame) -> PageReport {
    let counts = groups::target_counts(df);
    let total_defaults = counts.map(|(_, defaulted)| defaulted);
    let default_rate = counts.and_then(|(repaid, defaulted)| {
        let total = repaid + defaulted;
        if total == 0 {
            None
        } else {
            Some(defaulted as f64 / total as f64 * 100.0)
        }
    });

    let defaulter_mean = |value_col: &str| -> Option<f64> {
        let (_, defaulted) = groups::split_by_target(df, value_col)?;
        calculator::sample_mean(&defaulted)
    };

    let kpis = vec![
        Kpi::count("Total Defaults", total_defaults),
        Kpi::percent("Default Rate (%)", default_rate),
        Kpi::number("Avg Income (Defaulters)", defaulter_mean(columns::INCOME)),
        Kpi::number("Avg Credit (Defaulters)", defaulter_mean(columns::CREDIT)),
        Kpi::number("Avg Annuity (Defaulters)", defaulter_mean(columns::ANNUITY)),
        Kpi::number(
            "Avg Employment Years (Defaulters)",
            defaulter_mean(columns::EMPLOYMENT_YEARS),
        ),
    ];

    let mut charts = Vec::new();

    if let Some((repaid, defaulted)) = counts {
        charts.push(ChartSpec::CategoryCounts {
            title: "Counts: Repaid vs Default".to_string(),
            counts: vec![
                (groups::REPAID_LABEL.to_string(), repaid),
                (groups::DEFAULT_LABEL.to_string(), defaulted),
            ],
        });
    }

    for (title, category_col) in [
        ("Default Rate (%) by Gender", columns::GENDER),
        ("Default Rate (%) by Education", columns::EDUCATION),
        ("Default Rate (%) by Family Status", columns::FAMILY_STATUS),
        ("Default Rate (%) by Housing Type", columns::HOUSING_TYPE),
    ] {
        if let Some(rates) = groups::default_rate_by(df, category_col) {
            charts.push(ChartSpec::CategoryRates {
                title: title.to_string(),
                rates,
            });
        }
    }

    for (title, value_col) in [
        ("Income Distribution by Target", columns::INCOME),
        ("Credit Amount by Target", columns::CREDIT),
        ("Age Distribution by Target", columns::AGE_YEARS),
    ] {
        if let Some(summaries) = groups::summary_by_target(df, value_col) {
            if !summaries.is_empty() {
                charts.push(ChartSpec::GroupedSummary {
                    title: title.to_string(),
                    groups: summaries,
                });
            }
        }
    }

    if let Some(rows) =
        groups::binned_counts_by_target(df, columns::EMPLOYMENT_YEARS, &EMPLOYMENT_BINS)
    {
        charts.push(ChartSpec::StackedOutcomeCounts {
            title: "Employment Years (binned) by Target".to_string(),
            rows: to_outcome_rows(rows),
        });
    }

    if let Some(rows) = groups::counts_by_and_target(df, columns::CONTRACT_TYPE) {
        charts.push(ChartSpec::StackedOutcomeCounts {
            title: "Contract Type vs Target".to_string(),
            rows: to_outcome_rows(rows),
        });
    }

    PageReport {
        title: TITLE.to_string(),
        kpis,
        charts,
    }
}

fn to_outcome_rows(rows: Vec<(String, u64, u64)>) -> Vec<OutcomeCounts> {
    rows.into_iter()
        .map(|(category, repaid, defaulted)| OutcomeCounts {
            category,
            repaid,
            defaulted,
        })
        .collect()
}
