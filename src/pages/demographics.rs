//! Demographics & Employment Page

use crate::data::{columns, loader};
use crate::report::{Kpi, PageReport};
use crate::stats::{calculator, groups};
use polars::prelude::*;

pub const TITLE: &str = "Demographics & Employment";

/// Education levels counted as higher education.
const HIGHER_EDUCATION: [&str; 2] = ["Higher education", "Academic degree"];

pub fn build(df: &DataFrame) -> PageReport {
    let age_by_target = groups::split_by_target(df, columns::AGE_YEARS);
    let avg_age_defaulters = age_by_target
        .as_ref()
        .and_then(|(_, defaulted)| calculator::sample_mean(defaulted));
    let avg_age_repaid = age_by_target
        .as_ref()
        .and_then(|(repaid, _)| calculator::sample_mean(repaid));

    let children = loader::column_values(df, columns::CHILDREN);
    let pct_with_children = children
        .as_deref()
        .and_then(|values| calculator::share_where(values, |v| v > 0.0))
        .map(|share| share * 100.0);

    let family_size = loader::column_values(df, columns::FAMILY_MEMBERS);
    let avg_family_size = family_size.as_deref().and_then(calculator::mean);

    let employment = loader::column_values(df, columns::EMPLOYMENT_YEARS);
    let pct_working = employment
        .as_deref()
        .and_then(|values| calculator::share_where(values, |v| v > 0.0))
        .map(|share| share * 100.0);
    let avg_employment_years = employment.as_deref().and_then(calculator::mean);

    let kpis = vec![
        Kpi::number("Avg Age - Defaulters", avg_age_defaulters),
        Kpi::number("Avg Age - Non-Defaulters", avg_age_repaid),
        Kpi::percent("% With Children", pct_with_children),
        Kpi::number("Avg Family Size", avg_family_size),
        Kpi::percent(
            "% Higher Education",
            category_share(df, columns::EDUCATION, &HIGHER_EDUCATION),
        ),
        Kpi::percent(
            "% Living With Parents",
            category_share(df, columns::HOUSING_TYPE, &["With parents"]),
        ),
        Kpi::percent("% Currently Working", pct_working),
        Kpi::number("Avg Employment Years", avg_employment_years),
    ];

    PageReport {
        title: TITLE.to_string(),
        kpis,
        charts: Vec::new(),
    }
}

/// Share of all rows whose category is one of `wanted`, as a percentage.
/// Absent labels count against the denominator.
fn category_share(df: &DataFrame, category_col: &str, wanted: &[&str]) -> Option<f64> {
    let labels = loader::category_labels(df, category_col)?;
    if labels.is_empty() {
        return None;
    }
    let matching = labels
        .iter()
        .filter(|label| {
            label
                .as_deref()
                .is_some_and(|l| wanted.contains(&l))
        })
        .count();
    Some(matching as f64 / labels.len() as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_share_counts_absent_as_non_matching() {
        let df = df!(
            "NAME_EDUCATION_TYPE" => [Some("Higher education"), Some("Secondary"), None, Some("Academic degree")],
        )
        .unwrap();
        let share = category_share(&df, columns::EDUCATION, &HIGHER_EDUCATION).unwrap();
        assert!((share - 50.0).abs() < 1e-9);
    }

    #[test]
    fn absent_column_yields_missing_kpi() {
        let df = df!("TARGET" => [0i64, 1]).unwrap();
        let report = build(&df);
        let family = report
            .kpis
            .iter()
            .find(|kpi| kpi.label == "Avg Family Size")
            .unwrap();
        assert!(family.is_missing());
    }
}
