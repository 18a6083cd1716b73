//! Built-in marketplace profiles

use super::profile::{ClaimCategory, MarketplaceProfile};
use super::schema::{FieldKey, FieldSpec};
use crate::analyzer::Criterion;

/// Built-in profiles paired with whether they take traffic by default
pub fn builtin_profiles() -> Vec<(MarketplaceProfile, bool)> {
    vec![
        (amazon(), true),
        (ebay(), true),
        (etsy(), false),
        (walmart(), false),
    ]
}

/// Catalog-style listing: bullets, backend search terms, A+ content
pub fn amazon() -> MarketplaceProfile {
    MarketplaceProfile::new("amazon", "Amazon")
        .with_field(
            FieldSpec::required(
                FieldKey::Title,
                "Brand, product type and the key attributes buyers search for",
            )
            .with_max_length(200),
        )
        .with_field(
            FieldSpec::required(FieldKey::Bullets, "Key product features, one benefit per bullet")
                .with_max_length(500)
                .with_ideal_entries(5),
        )
        .with_field(
            FieldSpec::required(FieldKey::Description, "Long-form product description")
                .with_max_length(2000),
        )
        .with_field(
            FieldSpec::optional(
                FieldKey::BackendKeywords,
                "Hidden search terms: synonyms, spellings, use cases",
            )
            .with_max_length(249),
        )
        .with_field(FieldSpec::optional(
            FieldKey::APlusModules,
            "Enhanced brand content modules",
        ))
        .with_weight(Criterion::TitleLength.name(), 0.20)
        .with_weight(Criterion::DescriptionLength.name(), 0.10)
        .with_weight(Criterion::Completeness.name(), 0.15)
        .with_weight(Criterion::KeywordPresence.name(), 0.20)
        .with_weight(Criterion::Compliance.name(), 0.15)
        .with_weight(Criterion::Structure.name(), 0.15)
        .with_weight(Criterion::TitleFormatting.name(), 0.05)
        .restricting(&[
            ClaimCategory::Medical,
            ClaimCategory::Superlative,
            ClaimCategory::Guarantee,
            ClaimCategory::OffPlatformContact,
            ClaimCategory::Promotional,
        ])
}

/// Auction-style listing: item specifics and policy notes instead of bullets
pub fn ebay() -> MarketplaceProfile {
    MarketplaceProfile::new("ebay", "eBay")
        .with_field(
            FieldSpec::required(FieldKey::Title, "Search-optimized title, most important words first")
                .with_max_length(80),
        )
        .with_field(
            FieldSpec::optional(FieldKey::Subtitle, "Short secondary line shown in search results")
                .with_max_length(55),
        )
        .with_field(FieldSpec::required(
            FieldKey::Description,
            "Item description; HTML is allowed",
        ))
        .with_field(
            FieldSpec::required(
                FieldKey::ItemSpecifics,
                "Name/value attributes such as Brand, Model, Size, Color",
            )
            .with_max_length(65)
            .with_ideal_entries(8),
        )
        .with_field(
            FieldSpec::optional(FieldKey::ConditionNotes, "Wear, defects and what is included")
                .with_max_length(1000),
        )
        .with_field(
            FieldSpec::optional(FieldKey::ShippingNotes, "Handling time and carrier details")
                .with_max_length(500),
        )
        .with_field(
            FieldSpec::optional(FieldKey::ReturnsNotes, "Return window and conditions")
                .with_max_length(500),
        )
        .with_field(
            FieldSpec::optional(FieldKey::CategoryHint, "Suggested leaf category")
                .with_max_length(100),
        )
        .with_field(FieldSpec::optional(
            FieldKey::ComplianceNotes,
            "Seller-facing notes on restricted content",
        ))
        .with_field(FieldSpec::optional(
            FieldKey::Assumptions,
            "Facts assumed while drafting that the seller should confirm",
        ))
        .with_weight(Criterion::TitleLength.name(), 0.25)
        .with_weight(Criterion::DescriptionLength.name(), 0.10)
        .with_weight(Criterion::Completeness.name(), 0.20)
        .with_weight(Criterion::KeywordPresence.name(), 0.10)
        .with_weight(Criterion::Compliance.name(), 0.15)
        .with_weight(Criterion::Structure.name(), 0.15)
        .with_weight(Criterion::TitleFormatting.name(), 0.05)
        .restricting(&[
            ClaimCategory::Medical,
            ClaimCategory::Guarantee,
            ClaimCategory::OffPlatformContact,
        ])
}

pub fn etsy() -> MarketplaceProfile {
    MarketplaceProfile::new("etsy", "Etsy")
        .with_field(
            FieldSpec::required(FieldKey::Title, "What the item is, then style and occasion")
                .with_max_length(140),
        )
        .with_field(FieldSpec::required(
            FieldKey::Description,
            "Story, materials, dimensions and care",
        ))
        .with_field(
            FieldSpec::optional(FieldKey::Tags, "Search tags, multi-word phrases allowed")
                .with_max_length(20)
                .with_ideal_entries(13),
        )
        .with_field(
            FieldSpec::optional(FieldKey::Materials, "Materials used").with_max_length(45),
        )
        .with_weight(Criterion::TitleLength.name(), 0.20)
        .with_weight(Criterion::DescriptionLength.name(), 0.15)
        .with_weight(Criterion::Completeness.name(), 0.20)
        .with_weight(Criterion::KeywordPresence.name(), 0.20)
        .with_weight(Criterion::Compliance.name(), 0.10)
        .with_weight(Criterion::Structure.name(), 0.15)
        .restricting(&[ClaimCategory::Medical, ClaimCategory::OffPlatformContact])
}

pub fn walmart() -> MarketplaceProfile {
    MarketplaceProfile::new("walmart", "Walmart")
        .with_field(
            FieldSpec::required(FieldKey::Title, "Brand, product name, size and count")
                .with_max_length(150),
        )
        .with_field(
            FieldSpec::required(FieldKey::Bullets, "Key features")
                .with_max_length(250)
                .with_ideal_entries(3),
        )
        .with_field(
            FieldSpec::required(FieldKey::Description, "Shelf description").with_max_length(4000),
        )
        .with_field(
            FieldSpec::optional(FieldKey::BackendKeywords, "Search keywords")
                .with_max_length(250),
        )
        .with_weight(Criterion::TitleLength.name(), 0.20)
        .with_weight(Criterion::DescriptionLength.name(), 0.15)
        .with_weight(Criterion::Completeness.name(), 0.20)
        .with_weight(Criterion::KeywordPresence.name(), 0.10)
        .with_weight(Criterion::Compliance.name(), 0.20)
        .with_weight(Criterion::Structure.name(), 0.15)
        .restricting(&[
            ClaimCategory::Medical,
            ClaimCategory::Superlative,
            ClaimCategory::Guarantee,
            ClaimCategory::OffPlatformContact,
            ClaimCategory::Promotional,
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ebay_shape_order() {
        let names: Vec<FieldKey> = ebay().listing_shape.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                FieldKey::Title,
                FieldKey::Subtitle,
                FieldKey::Description,
                FieldKey::ItemSpecifics,
                FieldKey::ConditionNotes,
                FieldKey::ShippingNotes,
                FieldKey::ReturnsNotes,
                FieldKey::CategoryHint,
                FieldKey::ComplianceNotes,
                FieldKey::Assumptions,
            ]
        );
    }

    #[test]
    fn test_builtin_weights_sum_to_one() {
        for (profile, _) in builtin_profiles() {
            assert!(
                (profile.weight_sum() - 1.0).abs() <= 0.001,
                "{} weights sum to {}",
                profile.id,
                profile.weight_sum()
            );
        }
    }

    #[test]
    fn test_only_amazon_and_ebay_enabled_by_default() {
        let enabled: Vec<String> = builtin_profiles()
            .into_iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(p, _)| p.id)
            .collect();
        assert_eq!(enabled, vec!["amazon", "ebay"]);
    }
}
