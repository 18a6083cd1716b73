//! Structure: collection fields carry enough distinct, non-blank entries.

use super::text::{normalize_entry, preview};
use super::ScoringCriterion;
use crate::marketplace::{FieldSpec, FieldValue, MarketplaceProfile};
use crate::{CriterionScore, Diagnostic, DiagnosticCode, ListingContent};
use std::collections::BTreeSet;

/// One collection entry prepared for comparison
struct Entry<'c> {
    shown: &'c str,
    key: String,
    blank: bool,
}

fn collect_entries<'c>(value: &FieldValue<'c>) -> Vec<Entry<'c>> {
    match *value {
        FieldValue::Map(map) => map
            .iter()
            .map(|(name, v)| Entry {
                shown: name.as_str(),
                key: name.trim().to_lowercase(),
                blank: name.trim().is_empty() || v.trim().is_empty(),
            })
            .collect(),
        _ => value
            .entries()
            .into_iter()
            .map(|text| Entry {
                shown: text,
                key: normalize_entry(text),
                blank: text.trim().is_empty(),
            })
            .collect(),
    }
}

/// Rule scoring entry counts and duplicates in collection fields
pub struct StructureRule;

impl StructureRule {
    pub fn new() -> Self {
        Self
    }

    /// Sub-score for one field with an expected entry count
    fn check_field(spec: &FieldSpec, ideal: usize, value: &FieldValue<'_>, messages: &mut Vec<Diagnostic>) -> f64 {
        let entries = collect_entries(value);
        let mut distinct = BTreeSet::new();
        let mut blanks = 0;

        for entry in &entries {
            if entry.blank {
                blanks += 1;
            } else if !distinct.insert(entry.key.clone()) {
                messages.push(
                    Diagnostic::warning(
                        DiagnosticCode::DuplicateEntry,
                        spec.name,
                        format!("`{}` repeats \"{}\"", spec.name, preview(entry.shown, 40)),
                    )
                    .with_suggestion("Use each entry for a different selling point"),
                );
            }
        }

        if blanks > 0 {
            messages.push(Diagnostic::info(
                DiagnosticCode::BlankEntry,
                spec.name,
                format!("`{}` has {} blank entr{}", spec.name, blanks, if blanks == 1 { "y" } else { "ies" }),
            ));
        }

        let count = distinct.len();
        // Required and empty is already a validation error
        let reported_elsewhere = spec.required && count == 0;
        if count < ideal && !reported_elsewhere {
            let message = format!(
                "`{}` has {} distinct entr{}; {} expected",
                spec.name,
                count,
                if count == 1 { "y" } else { "ies" },
                ideal
            );
            let diagnostic = if count * 2 >= ideal {
                Diagnostic::info(DiagnosticCode::TooFewEntries, spec.name, message)
            } else {
                Diagnostic::warning(DiagnosticCode::TooFewEntries, spec.name, message)
            };
            messages.push(diagnostic);
        }

        (count as f64 / ideal as f64).min(1.0)
    }
}

impl Default for StructureRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringCriterion for StructureRule {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore {
        let mut messages = Vec::new();
        let mut scores = Vec::new();

        for spec in &profile.listing_shape {
            let Some(ideal) = spec.ideal_entries.filter(|n| *n > 0) else {
                continue;
            };
            let value = spec.name.value(content);
            scores.push(Self::check_field(spec, ideal, &value, &mut messages));
        }

        if scores.is_empty() {
            return CriterionScore::perfect();
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        CriterionScore::new(mean, messages)
    }
}
