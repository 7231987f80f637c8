//! End-to-end dashboard tests: write a scratch CSV, load it, derive
//! features, and build every page.

use riskboard::data::{self, columns, loader};
use riskboard::pages::{self, Page};
use riskboard::report::{ChartSpec, KpiValue, PageReport};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "SK_ID_CURR,TARGET,NAME_CONTRACT_TYPE,CODE_GENDER,CNT_CHILDREN,AMT_INCOME_TOTAL,AMT_CREDIT,AMT_ANNUITY,AMT_GOODS_PRICE,NAME_EDUCATION_TYPE,NAME_FAMILY_STATUS,NAME_HOUSING_TYPE,DAYS_BIRTH,DAYS_EMPLOYED,CNT_FAM_MEMBERS";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp csv");
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn sample_rows() -> Vec<&'static str> {
    vec![
        "1001,0,Cash loans,M,0,50000,250000,12500,240000,Higher education,Married,House / apartment,-14610,-1461,2",
        "1002,1,Cash loans,F,2,100000,400000,20000,380000,Secondary / secondary special,Single / not married,With parents,-10957,365243,4",
        "1003,0,Revolving loans,F,1,,300000,15000,290000,Higher education,Married,House / apartment,-18262,-3652,3",
        "1004,1,Cash loans,M,0,200000,1200000,60000,1150000,Academic degree,Civil marriage,Rented apartment,-12045,-730,2",
        "1005,0,Cash loans,F,3,80000,160000,8000,150000,Secondary / secondary special,Married,House / apartment,-16071,-2922,5",
        "1006,1,Revolving loans,M,0,120000,900000,45000,870000,Lower secondary,Single / not married,With parents,-9132,-365,1",
        "1007,0,Cash loans,F,0,60000,180000,9000,170000,Higher education,Widow,House / apartment,-20454,365243,1",
        "1008,0,Cash loans,M,1,150000,500000,25000,480000,Secondary / secondary special,Married,House / apartment,-13514,-5479,3",
    ]
}

fn load_and_derive(rows: &[&str]) -> polars::prelude::DataFrame {
    let file = write_csv(rows);
    let raw = loader::load_csv(file.path()).expect("load csv");
    data::derive_features(&raw).expect("derive features")
}

fn find_kpi<'a>(report: &'a PageReport, label: &str) -> &'a KpiValue {
    &report
        .kpis
        .iter()
        .find(|kpi| kpi.label == label)
        .unwrap_or_else(|| panic!("missing KPI '{label}' on {}", report.title))
        .value
}

#[test]
fn all_pages_build_with_expected_titles() {
    let df = load_and_derive(&sample_rows());
    let reports = pages::build_all(&df);
    let titles: Vec<&str> = reports.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Overview & Data Quality",
            "Target & Risk Segmentation",
            "Demographics & Employment",
            "Financial Health & Affordability",
            "Correlation Insights & KPIs",
        ]
    );
}

#[test]
fn overview_counts_and_rates() {
    let df = load_and_derive(&sample_rows());
    let report = Page::Overview.build(&df);

    assert_eq!(find_kpi(&report, "Total Applicants"), &KpiValue::Count(8));
    match find_kpi(&report, "Default Rate (%)") {
        KpiValue::Percent(rate) => assert!((rate - 37.5).abs() < 1e-9),
        other => panic!("unexpected value {other:?}"),
    }
    match find_kpi(&report, "Repaid Rate (%)") {
        KpiValue::Percent(rate) => assert!((rate - 62.5).abs() < 1e-9),
        other => panic!("unexpected value {other:?}"),
    }

    // The target distribution payload matches the label counts.
    let target_chart = report
        .charts
        .iter()
        .find_map(|chart| match chart {
            ChartSpec::CategoryCounts { title, counts } if title == "Target Distribution" => {
                Some(counts)
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(
        target_chart,
        &vec![("Repaid".to_string(), 5), ("Default".to_string(), 3)]
    );
}

#[test]
fn mean_income_and_default_rate_scenario() {
    // Four records, incomes [50000, 100000, absent, 200000], targets
    // [0, 1, 0, 1]: mean income over present values and a 50% default
    // rate.
    let rows = vec![
        "1,0,Cash loans,M,0,50000,250000,12500,240000,Higher education,Married,House / apartment,-14610,-1461,2",
        "2,1,Cash loans,F,0,100000,400000,20000,380000,Higher education,Married,House / apartment,-10957,-730,2",
        "3,0,Cash loans,F,0,,300000,15000,290000,Higher education,Married,House / apartment,-18262,-3652,2",
        "4,1,Cash loans,M,0,200000,900000,45000,870000,Higher education,Married,House / apartment,-12045,-365,2",
    ];
    let df = load_and_derive(&rows);

    let financial = Page::Financial.build(&df);
    match find_kpi(&financial, "Avg Annual Income") {
        KpiValue::Number(mean) => assert!((mean - 116_666.6666666667).abs() < 1e-2),
        other => panic!("unexpected value {other:?}"),
    }

    let overview = Page::Overview.build(&df);
    match find_kpi(&overview, "Default Rate (%)") {
        KpiValue::Percent(rate) => assert!((rate - 50.0).abs() < 1e-9),
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn sentinel_employment_days_are_absent_after_derive() {
    let df = load_and_derive(&sample_rows());
    let years = loader::column_values(&df, columns::EMPLOYMENT_YEARS).unwrap();

    // Rows 2 and 7 carry the 365243 sentinel.
    assert_eq!(years[1], None);
    assert_eq!(years[6], None);
    assert!((years[0].unwrap() - 1461.0 / 365.25).abs() < 1e-9);
    assert!(years.iter().flatten().all(|y| *y < 1000.0));
}

#[test]
fn missing_family_column_degrades_to_missing_kpis() {
    // Same table without CNT_FAM_MEMBERS.
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "SK_ID_CURR,TARGET,CODE_GENDER,AMT_INCOME_TOTAL,AMT_CREDIT,DAYS_BIRTH,DAYS_EMPLOYED"
    )
    .unwrap();
    writeln!(file, "1,0,M,50000,250000,-14610,-1461").unwrap();
    writeln!(file, "2,1,F,100000,400000,-10957,-730").unwrap();
    writeln!(file, "3,0,F,80000,300000,-18262,-3652").unwrap();
    file.flush().unwrap();

    let raw = loader::load_csv(file.path()).unwrap();
    let df = data::derive_features(&raw).unwrap();

    let demographics = Page::Demographics.build(&df);
    assert_eq!(find_kpi(&demographics, "Avg Family Size"), &KpiValue::Missing);

    let correlation = Page::Correlation.build(&df);
    assert_eq!(
        find_kpi(&correlation, "Corr(Family Size, TARGET)"),
        &KpiValue::Missing
    );

    // Unrelated KPIs on the same pages still compute.
    assert_ne!(
        find_kpi(&demographics, "Avg Age - Defaulters"),
        &KpiValue::Missing
    );
}

#[test]
fn correlation_top_lists_are_disjoint_and_bracket_rates_bounded() {
    let df = load_and_derive(&sample_rows());

    let correlation = Page::Correlation.build(&df);
    let pairs_of = |wanted: &str| -> Vec<(String, f64)> {
        correlation
            .charts
            .iter()
            .find_map(|chart| match chart {
                ChartSpec::CorrelationPairs { title, pairs } if title == wanted => {
                    Some(pairs.clone())
                }
                _ => None,
            })
            .unwrap_or_default()
    };
    let positive = pairs_of("Top 5 Positive Correlations with TARGET");
    let negative = pairs_of("Top 5 Negative Correlations with TARGET");
    for (name, coefficient) in &positive {
        assert!(*coefficient > 0.0);
        assert!(negative.iter().all(|(n, _)| n != name));
    }
    for (_, coefficient) in &negative {
        assert!(*coefficient < 0.0);
    }

    let financial = Page::Financial.build(&df);
    let brackets = financial.charts.iter().find_map(|chart| match chart {
        ChartSpec::CategoryRates { title, rates }
            if title == "Income Brackets vs Default Rate" =>
        {
            Some(rates.clone())
        }
        _ => None,
    });
    for (_, rate) in brackets.unwrap() {
        assert!((0.0..=100.0).contains(&rate));
    }
}

#[test]
fn single_page_selection_matches_full_build() {
    let df = load_and_derive(&sample_rows());
    let page = Page::from_slug("financial").unwrap();
    let report = page.build(&df);
    assert_eq!(report.title, "Financial Health & Affordability");

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"Avg DTI\""));
}
