//! Financial Health & Affordability Page

use crate::data::{columns, loader};
use crate::report::{ChartSpec, Kpi, PageReport};
use crate::stats::{calculator, correlation, groups};
use polars::prelude::*;

pub const TITLE: &str = "Financial Health & Affordability";

/// Credit amounts above this threshold count as high-exposure loans.
pub const HIGH_CREDIT_THRESHOLD: f64 = 1_000_000.0;

/// Columns of the financial correlation heatmap.
const HEATMAP_COLUMNS: [&str; 6] = [
    columns::INCOME,
    columns::CREDIT,
    columns::ANNUITY,
    columns::DTI,
    columns::LTI,
    columns::TARGET,
];

pub fn build(df: &DataFrame) -> PageReport {
    let incomes = loader::column_values(df, columns::INCOME);
    let credits = loader::column_values(df, columns::CREDIT);

    let column_mean = |name: &str| -> Option<f64> {
        loader::column_values(df, name)
            .as_deref()
            .and_then(calculator::mean)
    };

    // Mean gap between the repaid and defaulted groups, with a Welch
    // t-test so the display layer can mark significant gaps.
    let gap_test = |value_col: &str| -> Option<calculator::GapTest> {
        let (repaid, defaulted) = groups::split_by_target(df, value_col)?;
        calculator::welch_gap(&repaid, &defaulted)
    };
    let income_gap = gap_test(columns::INCOME);
    let credit_gap = gap_test(columns::CREDIT);

    let pct_high_credit = credits
        .as_deref()
        .and_then(|values| calculator::share_where(values, |v| v > HIGH_CREDIT_THRESHOLD))
        .map(|share| share * 100.0);

    let kpis = vec![
        Kpi::number("Avg Annual Income", incomes.as_deref().and_then(calculator::mean)),
        Kpi::number(
            "Median Annual Income",
            incomes.as_deref().and_then(calculator::median),
        ),
        Kpi::number("Avg Credit Amount", credits.as_deref().and_then(calculator::mean)),
        Kpi::number("Avg Annuity", column_mean(columns::ANNUITY)),
        Kpi::number("Avg Goods Price", column_mean(columns::GOODS_PRICE)),
        Kpi::number("Avg DTI", column_mean(columns::DTI)),
        Kpi::number("Avg LTI", column_mean(columns::LTI)),
        Kpi::number(
            "Income Gap (Repaid - Default)",
            income_gap.as_ref().map(|t| t.gap),
        ),
        Kpi::number(
            "Income Gap p-value",
            income_gap.as_ref().and_then(|t| t.p_value),
        ),
        Kpi::flag(
            "Income Gap Significant",
            income_gap.as_ref().map(|t| t.significant),
        ),
        Kpi::number(
            "Credit Gap (Repaid - Default)",
            credit_gap.as_ref().map(|t| t.gap),
        ),
        Kpi::number(
            "Credit Gap p-value",
            credit_gap.as_ref().and_then(|t| t.p_value),
        ),
        Kpi::flag(
            "Credit Gap Significant",
            credit_gap.as_ref().map(|t| t.significant),
        ),
        Kpi::percent("% High Credit (>1M)", pct_high_credit),
    ];

    let mut charts = Vec::new();

    for (title, values) in [
        ("Income Distribution", &incomes),
        ("Credit Distribution", &credits),
        (
            "Annuity Distribution",
            &loader::column_values(df, columns::ANNUITY),
        ),
    ] {
        let Some(values) = values else { continue };
        if let Some(histogram) = calculator::histogram(values, 50, None) {
            charts.push(ChartSpec::Distribution {
                title: title.to_string(),
                histogram,
            });
        }
    }

    if let Some(rates) = groups::default_rate_by_bracket(df) {
        charts.push(ChartSpec::CategoryRates {
            title: "Income Brackets vs Default Rate".to_string(),
            rates,
        });
    }

    let (labels, values) = correlation::matrix(df, &HEATMAP_COLUMNS);
    if labels.len() > 1 {
        charts.push(ChartSpec::CorrelationMatrix {
            title: "Correlation Heatmap (Financial Variables)".to_string(),
            labels,
            values,
        });
    }

    PageReport {
        title: TITLE.to_string(),
        kpis,
        charts,
    }
}
