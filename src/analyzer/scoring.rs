//! Score aggregation for listing audits

use crate::marketplace::MarketplaceProfile;
use crate::{AuditResult, Criterion, Grade, Severity};

/// Criterion values below this earn a recommendation
const RECOMMENDATION_THRESHOLD: f64 = 0.6;

/// Calculator for listing quality scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Weighted sum of `(weight, value)` pairs on the 0-100 scale.
    ///
    /// Weights are used as declared; a profile whose weights do not sum to 1.0
    /// never gets this far.
    pub fn aggregate(weighted: &[(f64, f64)]) -> u8 {
        let raw: f64 = weighted.iter().map(|(weight, value)| weight * value).sum();
        (raw * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Points a criterion adds to the final score
    pub fn contribution(weight: f64, value: f64) -> f64 {
        weight * value * 100.0
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::A => "Excellent - Listing is complete, compliant and well optimized",
            Grade::B => "Good - Listing is solid but has room for improvement",
            Grade::C => "Fair - Listing covers the basics but needs strengthening",
            Grade::D => "Poor - Listing has significant quality issues",
            Grade::F => "Failing - Listing needs major work before publishing",
        }
    }

    /// Get recommendations for the weakest criteria of a result
    pub fn recommendations(result: &AuditResult, profile: &MarketplaceProfile) -> Vec<String> {
        let mut recs = Vec::new();

        let errors = result.count(Severity::Error);
        if errors > 0 {
            recs.push(format!(
                "Fix {} blocking error(s) before publishing to {}",
                errors, profile.display_name
            ));
        }

        for weighted in &profile.scoring_weights {
            let Some(score) = result.breakdown.get(&weighted.criterion) else {
                continue;
            };
            if score.value >= RECOMMENDATION_THRESHOLD {
                continue;
            }
            let rec = match Criterion::from_name(&weighted.criterion) {
                Some(Criterion::TitleLength) => {
                    "Use more of the title limit: brand, product type, key attributes"
                }
                Some(Criterion::DescriptionLength) => {
                    "Expand the description with use cases, dimensions and what is included"
                }
                Some(Criterion::Completeness) => "Fill in the empty fields the marketplace supports",
                Some(Criterion::KeywordPresence) => {
                    "Add search terms and work key attributes into the visible copy"
                }
                Some(Criterion::Compliance) => {
                    "Remove restricted claims before the marketplace suppresses the listing"
                }
                Some(Criterion::Structure) => "Add distinct entries to bullet and attribute lists",
                Some(Criterion::TitleFormatting) => {
                    "Clean up the title: no all caps, repeated punctuation or stray spaces"
                }
                None => continue,
            };
            recs.push(rec.to_string());
        }

        if recs.is_empty() {
            recs.push("Listing is in good shape! Review info notes for polish.".to_string());
        }

        recs
    }
}
