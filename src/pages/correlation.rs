//! Correlation Insights Page

use crate::data::columns;
use crate::report::{ChartSpec, Kpi, PageReport};
use crate::stats::correlation::{self, CorrelationRanking};
use crate::stats::calculator;
use polars::prelude::*;

pub const TITLE: &str = "Correlation Insights & KPIs";

/// Columns of the key-correlation heatmap.
const HEATMAP_COLUMNS: [&str; 5] = [
    columns::TARGET,
    columns::AGE_YEARS,
    columns::EMPLOYMENT_YEARS,
    columns::INCOME,
    columns::CREDIT,
];

/// Absolute-coefficient threshold for the strong-correlation KPI.
pub const STRONG_CORRELATION: f64 = 0.5;

pub fn build(df: &DataFrame) -> PageReport {
    let ranking = CorrelationRanking::against(df, columns::TARGET);

    let kpis = vec![
        Kpi::text(
            "Most correlated with Income",
            correlation::most_correlated_with(df, columns::INCOME).map(|(name, _)| name),
        ),
        Kpi::text(
            "Most correlated with Credit",
            correlation::most_correlated_with(df, columns::CREDIT).map(|(name, _)| name),
        ),
        Kpi::number(
            "Corr(Income, Credit)",
            correlation::column_correlation(df, columns::INCOME, columns::CREDIT),
        ),
        Kpi::number(
            "Corr(Age, TARGET)",
            correlation::column_correlation(df, columns::AGE_YEARS, columns::TARGET),
        ),
        Kpi::number(
            "Corr(Employment Years, TARGET)",
            correlation::column_correlation(df, columns::EMPLOYMENT_YEARS, columns::TARGET),
        ),
        Kpi::number(
            "Corr(Family Size, TARGET)",
            correlation::column_correlation(df, columns::FAMILY_MEMBERS, columns::TARGET),
        ),
        Kpi::number(
            "Variance explained (Top 5 R\u{b2} proxy)",
            ranking.variance_explained_proxy(),
        ),
        Kpi::count(
            "# Features with |corr| > 0.5",
            Some(ranking.strong_count(STRONG_CORRELATION) as u64),
        ),
    ];

    let mut charts = Vec::new();

    let positive = ranking.top_positive(5);
    if !positive.is_empty() {
        charts.push(ChartSpec::CorrelationPairs {
            title: "Top 5 Positive Correlations with TARGET".to_string(),
            pairs: positive
                .into_iter()
                .map(|e| (e.name, e.coefficient))
                .collect(),
        });
    }

    let negative = ranking.top_negative(5);
    if !negative.is_empty() {
        charts.push(ChartSpec::CorrelationPairs {
            title: "Top 5 Negative Correlations with TARGET".to_string(),
            pairs: negative
                .into_iter()
                .map(|e| (e.name, e.coefficient))
                .collect(),
        });
    }

    let (labels, values) = correlation::matrix(df, &HEATMAP_COLUMNS);
    if labels.len() > 1 {
        charts.push(ChartSpec::CorrelationMatrix {
            title: "Heatmap of Key Correlations".to_string(),
            labels,
            values,
        });
    }

    let coefficients: Vec<Option<f64>> = ranking
        .entries()
        .iter()
        .map(|e| Some(e.coefficient))
        .collect();
    if let Some(histogram) = calculator::histogram(&coefficients, 30, None) {
        charts.push(ChartSpec::Distribution {
            title: "Distribution of Feature Correlations with TARGET".to_string(),
            histogram,
        });
    }

    PageReport {
        title: TITLE.to_string(),
        kpis,
        charts,
    }
}
