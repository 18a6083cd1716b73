//! Completeness: how much of the declared listing shape is filled in.
//! Required fields weigh more than optional ones. Missing required fields are
//! already reported as errors by structural validation, so only optional gaps
//! produce notes here.

use super::ScoringCriterion;
use crate::marketplace::MarketplaceProfile;
use crate::{CriterionScore, Diagnostic, DiagnosticCode, ListingContent};

const REQUIRED_WEIGHT: f64 = 3.0;
const OPTIONAL_WEIGHT: f64 = 1.0;

/// Rule scoring filled-in fields against the marketplace shape
pub struct CompletenessRule;

impl CompletenessRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CompletenessRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringCriterion for CompletenessRule {
    fn name(&self) -> &'static str {
        "completeness"
    }

    fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore {
        let mut total = 0.0;
        let mut present = 0.0;
        let mut messages = Vec::new();

        for spec in &profile.listing_shape {
            let weight = if spec.required {
                REQUIRED_WEIGHT
            } else {
                OPTIONAL_WEIGHT
            };
            total += weight;

            if !spec.name.value(content).is_blank() {
                present += weight;
            } else if !spec.required {
                messages.push(
                    Diagnostic::info(
                        DiagnosticCode::EmptyOptionalField,
                        spec.name,
                        format!("Optional field `{}` is empty", spec.name),
                    )
                    .with_suggestion(spec.description.clone()),
                );
            }
        }

        if total == 0.0 {
            return CriterionScore::perfect();
        }
        CriterionScore::new(present / total, messages)
    }
}
