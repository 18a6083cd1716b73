//! JSON reporter for machine-readable output

use crate::analyzer::AggregateStats;
use crate::marketplace::{MarketplaceProfile, ProfileRegistry};
use crate::{AuditedListing, Grade};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single audit as JSON
    pub fn report(&self, audited: &AuditedListing) -> String {
        self.render(audited, "{}")
    }

    /// Report with summary
    pub fn report_with_summary(&self, audited: &[AuditedListing], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: audited,
            summary: JsonSummary {
                listings_audited: stats.listings_audited,
                average_score: stats.average_score,
                average_grade: Grade::from_score(stats.average_score).to_string(),
                total_errors: stats.total_errors,
                total_warnings: stats.total_warnings,
                unsellable: stats.unsellable,
            },
        };
        self.render(&output, "{}")
    }

    /// Registered marketplaces with their shapes and weights
    pub fn report_marketplaces(&self, registry: &ProfileRegistry, include_disabled: bool) -> String {
        let entries: Vec<MarketplaceEntry<'_>> = registry
            .profiles()
            .filter(|(_, enabled)| include_disabled || *enabled)
            .map(|(profile, enabled)| MarketplaceEntry { profile, enabled })
            .collect();
        self.render(&entries, "[]")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [AuditedListing],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    listings_audited: usize,
    average_score: u8,
    average_grade: String,
    total_errors: usize,
    total_warnings: usize,
    unsellable: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceEntry<'a> {
    #[serde(flatten)]
    profile: &'a MarketplaceProfile,
    enabled: bool,
}
