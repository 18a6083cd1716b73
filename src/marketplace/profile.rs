//! Marketplace profile: a field shape bound to weighted scoring criteria

use super::schema::{FieldKey, FieldSpec, FieldValue};
use crate::ListingContent;
use serde::{Deserialize, Serialize};

/// Families of claim language a marketplace may prohibit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCategory {
    /// Cure/treat/prevent disease, regulatory approval claims
    Medical,
    /// "#1", "best seller", "world's best"
    Superlative,
    /// Unqualified guarantees
    Guarantee,
    /// Links, e-mail addresses, "call me"
    OffPlatformContact,
    /// Price and shipping promotions in listing copy
    Promotional,
}

impl ClaimCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ClaimCategory::Medical => "medical claim",
            ClaimCategory::Superlative => "superlative claim",
            ClaimCategory::Guarantee => "guarantee claim",
            ClaimCategory::OffPlatformContact => "off-platform contact",
            ClaimCategory::Promotional => "promotional language",
        }
    }
}

/// A criterion name paired with its weight in the aggregate score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedCriterion {
    pub criterion: String,
    pub weight: f64,
}

/// Declared shape and weighting rules for one sales channel.
///
/// Profiles are built once at startup and registered with a
/// [`super::ProfileRegistry`], which checks their consistency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceProfile {
    pub id: String,
    pub display_name: String,
    /// Display/export order
    pub listing_shape: Vec<FieldSpec>,
    pub scoring_weights: Vec<WeightedCriterion>,
    #[serde(default)]
    pub restricted_claims: Vec<ClaimCategory>,
}

impl MarketplaceProfile {
    /// Ids are stored lowercase and trimmed
    pub fn new(id: &str, display_name: impl Into<String>) -> Self {
        Self {
            id: normalize_id(id),
            display_name: display_name.into(),
            listing_shape: Vec::new(),
            scoring_weights: Vec::new(),
            restricted_claims: Vec::new(),
        }
    }

    pub fn with_field(mut self, spec: FieldSpec) -> Self {
        self.listing_shape.push(spec);
        self
    }

    pub fn with_weight(mut self, criterion: impl Into<String>, weight: f64) -> Self {
        self.scoring_weights.push(WeightedCriterion {
            criterion: criterion.into(),
            weight,
        });
        self
    }

    pub fn restricting(mut self, claims: &[ClaimCategory]) -> Self {
        self.restricted_claims.extend_from_slice(claims);
        self
    }

    pub fn field_spec(&self, key: FieldKey) -> Option<&FieldSpec> {
        self.listing_shape.iter().find(|s| s.name == key)
    }

    pub fn declares(&self, key: FieldKey) -> bool {
        self.field_spec(key).is_some()
    }

    /// Read a field through this profile's shape: undeclared fields are
    /// always `Absent`, whatever the content carries.
    pub fn field<'c>(&self, key: FieldKey, content: &'c ListingContent) -> FieldValue<'c> {
        if self.declares(key) {
            key.value(content)
        } else {
            FieldValue::Absent
        }
    }

    pub fn weight_sum(&self) -> f64 {
        self.scoring_weights.iter().map(|w| w.weight).sum()
    }

    pub fn weight_of(&self, criterion: &str) -> Option<f64> {
        self.scoring_weights
            .iter()
            .find(|w| w.criterion == criterion)
            .map(|w| w.weight)
    }

    pub fn restricts(&self, category: ClaimCategory) -> bool {
        self.restricted_claims.contains(&category)
    }
}

pub(crate) fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EtsyExtensions, ListingExtensions};

    fn sample() -> MarketplaceProfile {
        MarketplaceProfile::new("  Etsy ", "Etsy")
            .with_field(FieldSpec::required(FieldKey::Title, "Listing title").with_max_length(140))
            .with_field(FieldSpec::optional(FieldKey::Tags, "Search tags").with_ideal_entries(13))
            .with_weight("title_length", 0.4)
            .with_weight("structure", 0.6)
    }

    #[test]
    fn test_id_is_normalized() {
        assert_eq!(sample().id, "etsy");
    }

    #[test]
    fn test_undeclared_field_reads_absent() {
        let profile = sample();
        let content = ListingContent::new("Ring", "Silver ring")
            .with_bullets(["Sterling silver"])
            .with_extensions(ListingExtensions::Etsy(EtsyExtensions {
                tags: vec!["ring".to_string()],
                materials: vec![],
            }));

        assert_eq!(profile.field(FieldKey::Bullets, &content), FieldValue::Absent);
        assert_eq!(profile.field(FieldKey::Description, &content), FieldValue::Absent);
        assert!(matches!(
            profile.field(FieldKey::Tags, &content),
            FieldValue::List(_)
        ));
    }

    #[test]
    fn test_weight_lookup() {
        let profile = sample();
        assert!((profile.weight_sum() - 1.0).abs() < 1e-9);
        assert_eq!(profile.weight_of("structure"), Some(0.6));
        assert_eq!(profile.weight_of("compliance"), None);
    }
}
