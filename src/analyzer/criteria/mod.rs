//! Scoring criteria for listing quality
//!
//! Each criterion judges one quality dimension and is a pure function of the
//! listing content and the marketplace profile: no I/O, no clock, no shared
//! state. Values are clamped to [0, 1].

pub mod completeness;
pub mod compliance;
pub mod formatting;
pub mod keywords;
pub mod length;
pub mod structure;
mod text;

pub use completeness::CompletenessRule;
pub use compliance::ComplianceRule;
pub use formatting::TitleFormattingRule;
pub use keywords::KeywordPresenceRule;
pub use length::LengthFitnessRule;
pub use structure::StructureRule;

use crate::marketplace::MarketplaceProfile;
use crate::{CriterionScore, ListingContent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trait for scoring criteria
pub trait ScoringCriterion {
    /// Stable name referenced by marketplace profiles
    fn name(&self) -> &'static str;

    /// Judge the content under the given profile
    fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore;
}

/// The closed catalog of criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    TitleLength,
    DescriptionLength,
    Completeness,
    KeywordPresence,
    Compliance,
    Structure,
    TitleFormatting,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::TitleLength,
        Criterion::DescriptionLength,
        Criterion::Completeness,
        Criterion::KeywordPresence,
        Criterion::Compliance,
        Criterion::Structure,
        Criterion::TitleFormatting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::TitleLength => "title_length",
            Criterion::DescriptionLength => "description_length",
            Criterion::Completeness => "completeness",
            Criterion::KeywordPresence => "keyword_presence",
            Criterion::Compliance => "compliance",
            Criterion::Structure => "structure",
            Criterion::TitleFormatting => "title_formatting",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::TitleLength => "Title Length",
            Criterion::DescriptionLength => "Description Length",
            Criterion::Completeness => "Completeness",
            Criterion::KeywordPresence => "Keyword Presence",
            Criterion::Compliance => "Compliance",
            Criterion::Structure => "Structure",
            Criterion::TitleFormatting => "Title Formatting",
        }
    }

    pub fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore {
        match self {
            Criterion::TitleLength => LengthFitnessRule::title().evaluate(content, profile),
            Criterion::DescriptionLength => {
                LengthFitnessRule::description().evaluate(content, profile)
            }
            Criterion::Completeness => CompletenessRule::new().evaluate(content, profile),
            Criterion::KeywordPresence => KeywordPresenceRule::new().evaluate(content, profile),
            Criterion::Compliance => ComplianceRule::new().evaluate(content, profile),
            Criterion::Structure => StructureRule::new().evaluate(content, profile),
            Criterion::TitleFormatting => TitleFormattingRule::new().evaluate(content, profile),
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Name → criterion lookup that marketplace profiles are checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionRegistry {
    entries: BTreeMap<&'static str, Criterion>,
}

impl CriterionRegistry {
    /// Every built-in criterion
    pub fn builtin() -> Self {
        Self::from_criteria(Criterion::ALL)
    }

    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_criteria(criteria: impl IntoIterator<Item = Criterion>) -> Self {
        criteria.into_iter().fold(Self::empty(), Self::with)
    }

    pub fn with(mut self, criterion: Criterion) -> Self {
        self.entries.insert(criterion.name(), criterion);
        self
    }

    pub fn get(&self, name: &str) -> Option<Criterion> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CriterionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::profiles;

    #[test]
    fn test_names_round_trip() {
        for criterion in Criterion::ALL {
            assert_eq!(Criterion::from_name(criterion.name()), Some(criterion));
            assert_eq!(
                serde_json::to_value(criterion).unwrap(),
                criterion.name(),
                "serde name must match registry name"
            );
        }
        assert_eq!(Criterion::from_name("readability"), None);
    }

    #[test]
    fn test_builtin_registry_has_every_criterion() {
        let registry = CriterionRegistry::builtin();
        assert_eq!(registry.len(), Criterion::ALL.len());
        assert_eq!(registry.get("compliance"), Some(Criterion::Compliance));
    }

    #[test]
    fn test_isolated_registry() {
        let registry = CriterionRegistry::empty().with(Criterion::Structure);
        assert!(registry.contains("structure"));
        assert!(!registry.contains("title_length"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["structure"]);
    }

    #[test]
    fn test_every_criterion_is_deterministic_and_in_range() {
        let profile = profiles::amazon();
        let content = ListingContent::new(
            "Acme Steel Water Bottle 750ml - Insulated, Leak Proof",
            "Keeps drinks cold for 24 hours. <b>BPA free</b>.",
        )
        .with_bullets(["Double wall insulation", "Leak proof lid"])
        .with_backend_keywords("flask thermos canteen gym hiking");

        for criterion in Criterion::ALL {
            let first = criterion.evaluate(&content, &profile);
            let second = criterion.evaluate(&content, &profile);
            assert_eq!(first, second, "{} is not deterministic", criterion);
            assert!(
                (0.0..=1.0).contains(&first.value),
                "{} out of range: {}",
                criterion,
                first.value
            );
        }
    }
}
