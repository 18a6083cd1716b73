//! Keyword presence: search-term coverage without keyword stuffing.
//!
//! Search terms come from whichever keyword-bearing fields the marketplace
//! declares (backend keywords, item specifics, tags). More distinct terms score
//! higher with diminishing returns; attribute terms (specifics, tags) should
//! also show up in the visible copy. Any single term whose share of the visible
//! text passes the stuffing threshold costs points.

use super::text::{is_term, strip_markup, terms, words};
use super::ScoringCriterion;
use crate::marketplace::{FieldKey, MarketplaceProfile};
use crate::{CriterionScore, Diagnostic, DiagnosticCode, ListingContent};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Distinct terms at which presence stops improving
const TARGET_TERMS: usize = 8;
/// Share of visible words one term may take before it reads as stuffing
const STUFFING_DENSITY: f64 = 0.05;
const STUFFING_MIN_OCCURRENCES: usize = 4;
const MAX_STUFFING_PENALTY: f64 = 0.5;
/// A title may repeat a term this many times
const TITLE_REPEAT_LIMIT: usize = 2;
const TITLE_REPEAT_PENALTY: f64 = 0.2;

const KEYWORD_SOURCES: [FieldKey; 3] = [
    FieldKey::BackendKeywords,
    FieldKey::ItemSpecifics,
    FieldKey::Tags,
];
const VISIBLE_COPY: [FieldKey; 5] = [
    FieldKey::Title,
    FieldKey::Subtitle,
    FieldKey::Bullets,
    FieldKey::Description,
    FieldKey::APlusModules,
];

/// Rule scoring search-term coverage and stuffing
pub struct KeywordPresenceRule;

impl KeywordPresenceRule {
    pub fn new() -> Self {
        Self
    }

    /// Distinct terms from every declared keyword source, in field order,
    /// plus the subset that describes the item's attributes
    fn search_terms(content: &ListingContent, profile: &MarketplaceProfile) -> (Vec<String>, Vec<String>) {
        let mut seen = BTreeSet::new();
        let mut all = Vec::new();
        let mut attributes = Vec::new();
        for key in KEYWORD_SOURCES {
            for entry in profile.field(key, content).entries() {
                for term in terms(entry) {
                    if seen.insert(term.clone()) {
                        if key != FieldKey::BackendKeywords {
                            attributes.push(term.clone());
                        }
                        all.push(term);
                    }
                }
            }
        }
        (all, attributes)
    }

    fn visible_words(content: &ListingContent, profile: &MarketplaceProfile) -> Vec<String> {
        VISIBLE_COPY
            .iter()
            .flat_map(|key| profile.field(*key, content).all_text())
            .flat_map(|text| words(&strip_markup(text)))
            .collect()
    }
}

impl Default for KeywordPresenceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringCriterion for KeywordPresenceRule {
    fn name(&self) -> &'static str {
        "keyword_presence"
    }

    fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore {
        let Some(source) = KEYWORD_SOURCES.into_iter().find(|k| profile.declares(*k)) else {
            return CriterionScore::perfect();
        };

        let (search_terms, attribute_terms) = Self::search_terms(content, profile);
        if search_terms.is_empty() {
            return CriterionScore::new(
                0.0,
                vec![Diagnostic::warning(
                    DiagnosticCode::NoSearchTerms,
                    source,
                    format!("No search terms found in `{}`", source),
                )
                .with_suggestion(
                    "Add synonyms, alternate spellings and use cases shoppers type into search",
                )],
            );
        }

        let mut messages = Vec::new();
        let visible = Self::visible_words(content, profile);
        let visible_set: HashSet<&str> = visible.iter().map(String::as_str).collect();

        let presence = (search_terms.len() as f64 / TARGET_TERMS as f64)
            .min(1.0)
            .sqrt();
        if search_terms.len() * 2 < TARGET_TERMS {
            messages.push(Diagnostic::info(
                DiagnosticCode::FewSearchTerms,
                source,
                format!(
                    "Only {} distinct search term(s); around {} gives shoppers more ways to find the listing",
                    search_terms.len(),
                    TARGET_TERMS
                ),
            ));
        }

        let mut value = if attribute_terms.is_empty() {
            presence
        } else {
            let missing: Vec<&str> = attribute_terms
                .iter()
                .map(String::as_str)
                .filter(|t| !visible_set.contains(t))
                .collect();
            let coverage = 1.0 - missing.len() as f64 / attribute_terms.len() as f64;
            if coverage < 0.5 {
                let sample: Vec<&str> = missing.iter().take(5).copied().collect();
                messages.push(
                    Diagnostic::info(
                        DiagnosticCode::LowKeywordCoverage,
                        FieldKey::Title,
                        format!(
                            "{} of {} attribute terms never appear in the visible copy (e.g. {})",
                            missing.len(),
                            attribute_terms.len(),
                            sample.join(", ")
                        ),
                    )
                    .with_suggestion("Work the most important attributes into the title or description"),
                );
            }
            0.5 * presence + 0.5 * coverage
        };

        // Stuffing across the visible copy
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for word in visible.iter().filter(|w| is_term(w)) {
            *counts.entry(word.as_str()).or_insert(0) += 1;
        }
        let total_words = visible.len().max(1) as f64;
        let mut stuffing_penalty: f64 = 0.0;
        for (term, occurrences) in &counts {
            let density = *occurrences as f64 / total_words;
            if *occurrences >= STUFFING_MIN_OCCURRENCES && density > STUFFING_DENSITY {
                stuffing_penalty = stuffing_penalty
                    .max(((density - STUFFING_DENSITY) * 4.0).min(MAX_STUFFING_PENALTY));
                messages.push(
                    Diagnostic::warning(
                        DiagnosticCode::KeywordStuffing,
                        FieldKey::Description,
                        format!(
                            "`{}` makes up {:.0}% of the visible copy ({} times)",
                            term,
                            density * 100.0,
                            occurrences
                        ),
                    )
                    .with_suggestion("Use synonyms or move extra terms to search-term fields"),
                );
            }
        }
        value -= stuffing_penalty;

        let mut title_counts: BTreeMap<String, usize> = BTreeMap::new();
        for term in terms(profile.field(FieldKey::Title, content).as_text().unwrap_or("")) {
            *title_counts.entry(term).or_insert(0) += 1;
        }
        let repeated: Vec<&str> = title_counts
            .iter()
            .filter(|(_, n)| **n > TITLE_REPEAT_LIMIT)
            .map(|(t, _)| t.as_str())
            .collect();
        if !repeated.is_empty() {
            value -= TITLE_REPEAT_PENALTY;
            messages.push(Diagnostic::warning(
                DiagnosticCode::KeywordStuffing,
                FieldKey::Title,
                format!("Title repeats {} more than {} times", repeated.join(", "), TITLE_REPEAT_LIMIT),
            ));
        }

        CriterionScore::new(value, messages)
    }
}
