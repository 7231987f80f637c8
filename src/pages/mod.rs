//! Pages module - declarative dashboard pages built over the engine
//!
//! Each page recomputes its aggregates from the shared frame; nothing is
//! cached across pages, and one unavailable KPI never blocks the rest of
//! its page.

mod correlation;
mod demographics;
mod financial;
mod overview;
mod segmentation;

use crate::report::PageReport;
use polars::prelude::*;
use tracing::debug;

/// Dashboard pages, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Segmentation,
    Demographics,
    Financial,
    Correlation,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Segmentation,
        Page::Demographics,
        Page::Financial,
        Page::Correlation,
    ];

    /// Stable identifier used for page selection on the CLI.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Segmentation => "segmentation",
            Page::Demographics => "demographics",
            Page::Financial => "financial",
            Page::Correlation => "correlation",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::ALL.iter().copied().find(|page| page.slug() == slug)
    }

    pub fn build(&self, df: &DataFrame) -> PageReport {
        match self {
            Page::Overview => overview::build(df),
            Page::Segmentation => segmentation::build(df),
            Page::Demographics => demographics::build(df),
            Page::Financial => financial::build(df),
            Page::Correlation => correlation::build(df),
        }
    }
}

/// Build every page from the shared frame.
pub fn build_all(df: &DataFrame) -> Vec<PageReport> {
    Page::ALL
        .iter()
        .map(|page| {
            debug!(page = page.slug(), "building page");
            page.build(df)
        })
        .collect()
}
