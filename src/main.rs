//! Riskboard command line front end.
//! Loads the application CSV once, derives features, and prints each
//! dashboard page as text or JSON.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use riskboard::pages::{self, Page};
use riskboard::data;
use riskboard::report::{ChartSpec, KpiValue, PageReport};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "riskboard",
    about = "Credit application analytics & KPI dashboard engine"
)]
struct Cli {
    /// Path to the application CSV
    #[arg(default_value = "application_train.csv")]
    data: PathBuf,

    /// Render a single page (overview, segmentation, demographics,
    /// financial, correlation) instead of the full dashboard
    #[arg(long)]
    page: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let raw = data::loader::load_csv(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;
    let df = data::derive_features(&raw).context("deriving feature columns")?;

    let reports = match &cli.page {
        Some(slug) => {
            let page = Page::from_slug(slug).with_context(|| format!("unknown page: {slug}"))?;
            vec![page.build(&df)]
        }
        None => pages::build_all(&df),
    };

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        Format::Text => {
            for report in &reports {
                render_text(report);
            }
        }
    }
    Ok(())
}

/// Text rendering of one page. Rounding happens only here; the engine
/// payloads stay full precision.
fn render_text(report: &PageReport) {
    println!("== {} ==", report.title);
    for kpi in &report.kpis {
        println!("  {:<36} {}", kpi.label, format_value(&kpi.value));
    }
    for chart in &report.charts {
        render_chart(chart);
    }
    println!();
}

fn format_value(value: &KpiValue) -> String {
    match value {
        KpiValue::Count(n) => n.to_string(),
        KpiValue::Number(x) => format!("{x:.2}"),
        KpiValue::Percent(x) => format!("{x:.2}%"),
        KpiValue::Text(s) => s.clone(),
        KpiValue::Flag(true) => "yes".to_string(),
        KpiValue::Flag(false) => "no".to_string(),
        KpiValue::Missing => "N/A".to_string(),
    }
}

fn render_chart(chart: &ChartSpec) {
    match chart {
        ChartSpec::CategoryCounts { title, counts } => {
            println!("  [{title}]");
            for (label, count) in counts {
                println!("    {label:<32} {count}");
            }
        }
        ChartSpec::CategoryRates { title, rates } => {
            println!("  [{title}]");
            for (label, rate) in rates {
                println!("    {label:<32} {rate:.2}%");
            }
        }
        ChartSpec::CorrelationPairs { title, pairs } => {
            println!("  [{title}]");
            for (name, coefficient) in pairs {
                println!("    {name:<32} {coefficient:+.4}");
            }
        }
        ChartSpec::CorrelationMatrix { title, labels, values } => {
            println!("  [{title}]");
            for (label, row) in labels.iter().zip(values.iter()) {
                let cells: Vec<String> = row
                    .iter()
                    .map(|cell| match cell {
                        Some(c) => format!("{c:+.2}"),
                        None => "  N/A".to_string(),
                    })
                    .collect();
                println!("    {label:<24} {}", cells.join(" "));
            }
        }
        ChartSpec::Distribution { title, histogram } => {
            let total: u64 = histogram.counts.iter().sum();
            println!("  [{title}] {} bins, {} values", histogram.counts.len(), total);
        }
        ChartSpec::StackedOutcomeCounts { title, rows } => {
            println!("  [{title}]");
            for row in rows {
                println!(
                    "    {:<32} repaid {:>6}  default {:>6}",
                    row.category, row.repaid, row.defaulted
                );
            }
        }
        ChartSpec::GroupedSummary { title, groups } => {
            println!("  [{title}]");
            for (label, summary) in groups {
                println!(
                    "    {:<12} n={:<6} mean={:.2} median={:.2}",
                    label, summary.count, summary.mean, summary.median
                );
            }
        }
    }
}
