//! Length fitness for titles and descriptions.
//!
//! Zero for empty text, rising linearly to an ideal minimum, flat at 1.0 from
//! there up to and including the marketplace limit, then decaying. Overruns are
//! reported by structural validation, so this rule only reports shortfalls.

use super::ScoringCriterion;
use crate::marketplace::{FieldKey, MarketplaceProfile};
use crate::{CriterionScore, Diagnostic, DiagnosticCode, ListingContent};

/// Share of the overrun (relative to the limit) that costs the full score
const OVERRUN_ZERO_AT: f64 = 0.5;

/// Rule scoring how well a text field's length fits the marketplace
pub struct LengthFitnessRule {
    field: FieldKey,
    /// Ideal minimum as a share of `maxLength`
    ideal_fraction: f64,
    /// Ideal minimum when the field has no limit
    unlimited_target: usize,
}

impl LengthFitnessRule {
    pub fn title() -> Self {
        Self {
            field: FieldKey::Title,
            ideal_fraction: 0.5,
            unlimited_target: 60,
        }
    }

    pub fn description() -> Self {
        Self {
            field: FieldKey::Description,
            ideal_fraction: 0.2,
            unlimited_target: 400,
        }
    }

    pub fn ideal_minimum(&self, max_length: Option<usize>) -> usize {
        match max_length {
            Some(max) => ((max as f64 * self.ideal_fraction).ceil() as usize).clamp(1, max.max(1)),
            None => self.unlimited_target,
        }
    }

    /// Fitness of a length against an optional limit
    pub fn fitness(&self, length: usize, max_length: Option<usize>) -> f64 {
        if length == 0 {
            return 0.0;
        }
        if let Some(max) = max_length {
            if length > max {
                let overrun = (length - max) as f64 / max.max(1) as f64;
                return (1.0 - overrun / OVERRUN_ZERO_AT).max(0.0);
            }
        }
        let ideal = self.ideal_minimum(max_length);
        if length < ideal {
            length as f64 / ideal as f64
        } else {
            1.0
        }
    }

    fn field_label(&self) -> &'static str {
        match self.field {
            FieldKey::Title => "Title",
            FieldKey::Description => "Description",
            _ => "Field",
        }
    }

    fn suggestion(&self) -> &'static str {
        match self.field {
            FieldKey::Title => {
                "Lead with brand and product type, then the attributes shoppers filter on (size, color, material, count)"
            }
            _ => "Cover what it is, who it is for, what is included, dimensions and care",
        }
    }
}

impl ScoringCriterion for LengthFitnessRule {
    fn name(&self) -> &'static str {
        match self.field {
            FieldKey::Title => "title_length",
            _ => "description_length",
        }
    }

    fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore {
        let Some(spec) = profile.field_spec(self.field) else {
            // Nothing to judge when the marketplace has no such field
            return CriterionScore::perfect();
        };

        // Padding is neither content nor a shortfall
        let length = self.field.value(content).trimmed_char_count();
        let value = self.fitness(length, spec.max_length);
        let ideal = self.ideal_minimum(spec.max_length);

        let mut messages = Vec::new();
        if length > 0 && length < ideal {
            let limit = spec
                .max_length
                .map(|max| format!(" of the {} allowed", max))
                .unwrap_or_default();
            let message = format!(
                "{} is {} characters; aim for at least {}{}",
                self.field_label(),
                length,
                ideal,
                limit
            );
            let diagnostic = if length * 2 < ideal {
                Diagnostic::warning(DiagnosticCode::TooShort, self.field, message)
            } else {
                Diagnostic::info(DiagnosticCode::TooShort, self.field, message)
            };
            messages.push(diagnostic.with_suggestion(self.suggestion()));
        }

        CriterionScore::new(value, messages)
    }
}
