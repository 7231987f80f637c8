//! CSV Data Loader Module
//! Handles application CSV loading and column extraction using Polars.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Loaded table has no rows")]
    EmptyTable,
}

/// Load the application CSV into a DataFrame.
///
/// The load is an explicit step invoked once per session; the resulting
/// frame is passed by reference into every page computation.
pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(file_path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    if df.height() == 0 {
        return Err(LoaderError::EmptyTable);
    }

    info!(
        rows = df.height(),
        columns = df.width(),
        path = %file_path.display(),
        "loaded application table"
    );
    Ok(df)
}

/// List of numeric column names, in original column order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// List of non-numeric (categorical) column names, in original column order.
pub fn categorical_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| !is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Extract a column as absent-aware f64 values.
///
/// Returns `None` when the column does not exist or cannot be read as
/// numeric, so a missing optional column degrades to one unavailable KPI
/// rather than a failed page.
pub fn column_values(df: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    let col = df.column(name).ok()?;
    let col_f64 = col.cast(&DataType::Float64).ok()?;
    let ca = col_f64.f64().ok()?;
    Some(ca.into_iter().collect())
}

/// Extract a column's present (non-null) f64 values.
pub fn present_values(df: &DataFrame, name: &str) -> Option<Vec<f64>> {
    column_values(df, name).map(|vals| vals.into_iter().flatten().collect())
}

/// Extract a categorical column as per-row labels; null rows yield `None`.
pub fn category_labels(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let col = df.column(name).ok()?;
    Some(
        (0..df.height())
            .map(|i| {
                let val = col.get(i).ok()?;
                if val.is_null() {
                    None
                } else {
                    Some(val.to_string().trim_matches('"').to_string())
                }
            })
            .collect(),
    )
}

/// Count of distinct non-null values in a column.
pub fn distinct_count(df: &DataFrame, name: &str) -> Option<usize> {
    let series = df.column(name).ok()?.as_materialized_series();
    let uniques = series.n_unique().ok()?;
    // n_unique counts null as its own value; distinct applicants should not.
    if series.null_count() > 0 {
        Some(uniques.saturating_sub(1))
    } else {
        Some(uniques)
    }
}

/// Fraction of null values per column, in original column order.
pub fn null_fractions(df: &DataFrame) -> Vec<(String, f64)> {
    let height = df.height();
    if height == 0 {
        return Vec::new();
    }
    df.get_columns()
        .iter()
        .map(|col| {
            let frac = col.as_materialized_series().null_count() as f64 / height as f64;
            (col.name().to_string(), frac)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "SK_ID_CURR" => [1i64, 2, 3, 3],
            "TARGET" => [0i64, 1, 0, 1],
            "CODE_GENDER" => ["M", "F", "F", "M"],
            "AMT_INCOME_TOTAL" => [Some(50_000.0), Some(100_000.0), None, Some(200_000.0)],
        )
        .unwrap()
    }

    #[test]
    fn numeric_and_categorical_split() {
        let df = sample_df();
        assert_eq!(
            numeric_columns(&df),
            vec!["SK_ID_CURR", "TARGET", "AMT_INCOME_TOTAL"]
        );
        assert_eq!(categorical_columns(&df), vec!["CODE_GENDER"]);
    }

    #[test]
    fn column_values_keeps_nulls() {
        let df = sample_df();
        let incomes = column_values(&df, "AMT_INCOME_TOTAL").unwrap();
        assert_eq!(
            incomes,
            vec![Some(50_000.0), Some(100_000.0), None, Some(200_000.0)]
        );
        assert_eq!(
            present_values(&df, "AMT_INCOME_TOTAL").unwrap(),
            vec![50_000.0, 100_000.0, 200_000.0]
        );
    }

    #[test]
    fn missing_column_is_none() {
        let df = sample_df();
        assert!(column_values(&df, "CNT_FAM_MEMBERS").is_none());
        assert!(distinct_count(&df, "CNT_FAM_MEMBERS").is_none());
    }

    #[test]
    fn distinct_count_ignores_duplicates() {
        let df = sample_df();
        assert_eq!(distinct_count(&df, "SK_ID_CURR"), Some(3));
    }

    #[test]
    fn null_fraction_per_column() {
        let df = sample_df();
        let fractions = null_fractions(&df);
        let income = fractions
            .iter()
            .find(|(name, _)| name == "AMT_INCOME_TOTAL")
            .unwrap();
        assert!((income.1 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn category_labels_trim_quotes() {
        let df = sample_df();
        let labels = category_labels(&df, "CODE_GENDER").unwrap();
        assert_eq!(labels[0].as_deref(), Some("M"));
        assert_eq!(labels.len(), 4);
    }
}
