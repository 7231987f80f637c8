//! Statistics Calculator Module
//! Absent-aware descriptive statistics, Pearson correlation, and Welch's
//! t-test for group mean gaps.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for the gap t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Descriptive statistics for one numeric field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub p05: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Binned distribution of a numeric field.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Bin edges, length `counts.len() + 1`.
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

/// Result of a Welch's t-test on the mean gap between two samples.
#[derive(Debug, Clone)]
pub struct GapTest {
    /// `mean(a) - mean(b)`, full precision.
    pub gap: f64,
    /// Two-tailed p-value; absent when either sample is too small.
    pub p_value: Option<f64>,
    pub significant: bool,
}

/// Mean over present values; absent when nothing is present.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    sample_mean(&present)
}

/// Mean of a pre-filtered sample; absent when empty.
pub fn sample_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median over present values; absent when nothing is present.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(percentile(&present, 50.0))
}

/// Calculate percentile using linear interpolation (NumPy compatible).
/// Input must be sorted ascending and non-empty.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

/// Compute descriptive statistics over the present values.
pub fn summarize(values: &[Option<f64>]) -> Option<FieldSummary> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let n = present.len();
    if n == 0 {
        return None;
    }

    let mut sorted = present.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = present.iter().sum::<f64>() / n as f64;
    let variance = if n > 1 {
        present.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };

    Some(FieldSummary {
        count: n,
        mean,
        median: percentile(&sorted, 50.0),
        std: variance.sqrt(),
        variance,
        p05: percentile(&sorted, 5.0),
        p25: percentile(&sorted, 25.0),
        p75: percentile(&sorted, 75.0),
        p95: percentile(&sorted, 95.0),
    })
}

/// Fraction of all rows whose value is present and matches the predicate.
/// Absent rows count against the denominator, like a false flag.
pub fn share_where<F: Fn(f64) -> bool>(values: &[Option<f64>], pred: F) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let matching = values
        .iter()
        .filter(|v| matches!(v, Some(x) if pred(*x)))
        .count();
    Some(matching as f64 / values.len() as f64)
}

/// Fixed-width histogram over the present values.
///
/// With an explicit range, values outside it are excluded; otherwise the
/// observed min/max span the bins. Absent when nothing is present.
pub fn histogram(
    values: &[Option<f64>],
    bins: usize,
    range: Option<(f64, f64)>,
) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }

    let (lo, hi) = match range {
        Some(r) => r,
        None => present.iter().fold((f64::MAX, f64::MIN), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        }),
    };
    if hi < lo {
        return None;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0u64; bins];
    for v in &present {
        if *v < lo || *v > hi {
            continue;
        }
        let idx = if width > 0.0 {
            (((v - lo) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    let edges = (0..=bins).map(|i| lo + i as f64 * width).collect();
    Some(Histogram { edges, counts })
}

/// Pairwise-complete Pearson correlation.
///
/// A pair contributes only when both sides are present. Absent when
/// fewer than two complete pairs exist or either side has zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

/// Welch's t-test (independent samples, unequal variance) on the mean
/// gap `mean(a) - mean(b)`.
pub fn welch_gap(a: &[f64], b: &[f64]) -> Option<GapTest> {
    let gap = sample_mean(a)? - sample_mean(b)?;

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    if n1 < 2.0 || n2 < 2.0 {
        return Some(GapTest {
            gap,
            p_value: None,
            significant: false,
        });
    }

    let mean1 = a.iter().sum::<f64>() / n1;
    let mean2 = b.iter().sum::<f64>() / n2;
    let var1 = a.iter().map(|x| (x - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
    let var2 = b.iter().map(|x| (x - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);

    let se = (var1 / n1 + var2 / n2).sqrt();
    if se == 0.0 {
        // No variance on either side; the gap is exact but untestable.
        return Some(GapTest {
            gap,
            p_value: Some(1.0),
            significant: false,
        });
    }

    let t = (mean1 - mean2) / se;

    // Welch-Satterthwaite degrees of freedom
    let df_num = (var1 / n1 + var2 / n2).powi(2);
    let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
    let df = df_num / df_denom;

    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => {
            let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));
            Some(GapTest {
                gap,
                p_value: Some(p_value),
                significant: p_value <= SIGNIFICANCE_THRESHOLD,
            })
        }
        Err(_) => Some(GapTest {
            gap,
            p_value: None,
            significant: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mean_skips_absent_values() {
        let values = vec![Some(50_000.0), Some(100_000.0), None, Some(200_000.0)];
        let m = mean(&values).unwrap();
        assert!((m - 116_666.6666666667).abs() < 1e-4);
    }

    #[test]
    fn mean_of_all_absent_is_absent() {
        assert_eq!(mean(&[None, None]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[Some(1.0), Some(3.0), Some(2.0)]), Some(2.0));
        assert_eq!(
            median(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Some(2.5)
        );
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&sorted, 100.0) - 4.0).abs() < 1e-12);
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn summarize_counts_present_only() {
        let summary = summarize(&[Some(2.0), None, Some(4.0)]).unwrap();
        assert_eq!(summary.count, 2);
        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert!((summary.median - 3.0).abs() < 1e-12);
        assert!(summarize(&[None]).is_none());
    }

    #[test]
    fn share_counts_absent_in_denominator() {
        let values = vec![Some(2.0), Some(0.0), None, Some(3.0)];
        let share = share_where(&values, |v| v > 0.0).unwrap();
        assert!((share - 0.5).abs() < 1e-12);
    }

    #[test]
    fn histogram_counts_and_range_clip() {
        let values: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let h = histogram(&values, 3, None).unwrap();
        assert_eq!(h.counts.iter().sum::<u64>(), 10);
        assert_eq!(h.edges.len(), 4);

        let clipped = histogram(&values, 2, Some((0.0, 4.0))).unwrap();
        assert_eq!(clipped.counts.iter().sum::<u64>(), 5);
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let xs = vec![Some(1.0), Some(2.0), Some(3.0)];
        let ys = vec![Some(2.0), Some(4.0), Some(6.0)];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let inv = vec![Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&xs, &inv).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_is_pairwise_complete() {
        // Absent rows drop out pairwise: the complete pairs here are a
        // perfect positive line.
        let xs = vec![Some(1.0), None, Some(2.0), Some(3.0), Some(99.0)];
        let ys = vec![Some(10.0), Some(5.0), Some(20.0), Some(30.0), None];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_zero_variance_is_absent() {
        let constant = vec![Some(7.0), Some(7.0), Some(7.0)];
        let varying = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pearson(&constant, &varying), None);
        assert_eq!(pearson(&constant, &constant), None);
    }

    #[test]
    fn pearson_needs_two_pairs() {
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
        assert_eq!(pearson(&[Some(1.0), None], &[None, Some(2.0)]), None);
    }

    #[test]
    fn welch_gap_detects_separated_means() {
        let a = [10.0, 11.0, 9.0, 10.5, 10.2, 9.8];
        let b = [1.0, 1.2, 0.8, 1.1, 0.9, 1.0];
        let test = welch_gap(&a, &b).unwrap();
        assert!((test.gap - 9.0833333333).abs() < 1e-6);
        assert!(test.p_value.unwrap() < SIGNIFICANCE_THRESHOLD);
        assert!(test.significant);
    }

    #[test]
    fn welch_gap_same_distribution_not_significant() {
        let a = [5.0, 6.0, 5.5, 4.5, 5.2];
        let b = [5.1, 5.9, 5.4, 4.6, 5.3];
        let test = welch_gap(&a, &b).unwrap();
        assert!(!test.significant);
    }

    #[test]
    fn welch_gap_small_samples_have_no_p_value() {
        let test = welch_gap(&[1.0], &[2.0, 3.0]).unwrap();
        assert!((test.gap + 1.5).abs() < 1e-12);
        assert_eq!(test.p_value, None);
        assert!(!test.significant);
    }

    #[test]
    fn welch_gap_empty_sample_is_absent() {
        assert!(welch_gap(&[], &[1.0]).is_none());
    }

    proptest! {
        #[test]
        fn pearson_symmetric_and_bounded(
            pairs in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 2..40)
        ) {
            let xs: Vec<Option<f64>> = pairs.iter().map(|(x, _)| Some(*x)).collect();
            let ys: Vec<Option<f64>> = pairs.iter().map(|(_, y)| Some(*y)).collect();
            let ab = pearson(&xs, &ys);
            let ba = pearson(&ys, &xs);
            match (ab, ba) {
                (Some(a), Some(b)) => {
                    prop_assert!((a - b).abs() < 1e-9);
                    prop_assert!(a.abs() <= 1.0 + 1e-9);
                }
                (None, None) => {}
                _ => prop_assert!(false, "symmetry broken by absence"),
            }
        }

        #[test]
        fn percentile_stays_within_observed_range(
            mut values in prop::collection::vec(-1e6f64..1e6, 1..60),
            p in 0.0f64..100.0
        ) {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let v = percentile(&values, p);
            prop_assert!(v >= values[0] - 1e-9);
            prop_assert!(v <= values[values.len() - 1] + 1e-9);
        }
    }
}
