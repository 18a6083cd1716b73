//! Compliance: restricted claim language in customer-visible copy.
//!
//! Only the claim categories a marketplace restricts are checked, and only in
//! fields it declares as customer-visible. Medical claims and off-platform
//! contact details are errors; the rest are warnings.

use super::ScoringCriterion;
use crate::marketplace::{ClaimCategory, FieldKey, MarketplaceProfile};
use crate::{CriterionScore, Diagnostic, DiagnosticCode, ListingContent, Severity};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

const ERROR_PENALTY: f64 = 0.4;
const WARNING_PENALTY: f64 = 0.15;

fn claim_patterns() -> &'static Vec<(ClaimCategory, Regex)> {
    static PATTERNS: OnceLock<Vec<(ClaimCategory, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                ClaimCategory::Medical,
                Regex::new(
                    r"(?i)\b(cures?|heals?|fda[- ]approved|clinically proven|antibacterial|antiviral|antifungal|prevents? (disease|illness|infection|cancer)|treats? (disease|illness|infection|cancer|anxiety|depression|arthritis|pain)|kills? (germs|bacteria|viruses))\b",
                )
                .unwrap(),
            ),
            (
                ClaimCategory::Superlative,
                Regex::new(
                    r"(?i)(#\s?1\b|\bnumber one\b|\bbest[- ]sell(er|ing)\b|\bworld'?s best\b|\bbest in the world\b|\btop[- ]rated\b)",
                )
                .unwrap(),
            ),
            (
                ClaimCategory::Guarantee,
                Regex::new(
                    r"(?i)\b(satisfaction guaranteed|money[- ]back|guaranteed results|100% guaranteed|lifetime guarantee|risk[- ]free)\b",
                )
                .unwrap(),
            ),
            (
                ClaimCategory::OffPlatformContact,
                Regex::new(
                    r"(?i)(https?://\S+|\bwww\.\S+|[\w.+-]+@[\w-]+\.[\w.]+|\b(call|text|whatsapp|email|e-mail) (me|us)\b)",
                )
                .unwrap(),
            ),
            (
                ClaimCategory::Promotional,
                Regex::new(
                    r"(?i)\b(free shipping|on sale|\d+% off|lowest price|limited[- ]time offer|buy one get one|bogo|cheapest)\b",
                )
                .unwrap(),
            ),
        ]
    })
}

/// Rule flagging restricted claims
pub struct ComplianceRule;

impl ComplianceRule {
    pub fn new() -> Self {
        Self
    }

    fn severity(category: ClaimCategory) -> Severity {
        match category {
            ClaimCategory::Medical | ClaimCategory::OffPlatformContact => Severity::Error,
            _ => Severity::Warning,
        }
    }

    fn suggestion(category: ClaimCategory) -> &'static str {
        match category {
            ClaimCategory::Medical => {
                "Describe what the product does, not conditions it cures or treats"
            }
            ClaimCategory::Superlative => "Replace rankings with verifiable specifics",
            ClaimCategory::Guarantee => "State the actual warranty or return terms instead",
            ClaimCategory::OffPlatformContact => {
                "Remove links and contact details; buyers must use marketplace messaging"
            }
            ClaimCategory::Promotional => "Keep pricing and shipping offers out of listing copy",
        }
    }
}

impl Default for ComplianceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringCriterion for ComplianceRule {
    fn name(&self) -> &'static str {
        "compliance"
    }

    fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore {
        let mut seen: BTreeSet<(FieldKey, ClaimCategory, String)> = BTreeSet::new();
        let mut messages = Vec::new();

        let visible = profile
            .listing_shape
            .iter()
            .map(|spec| spec.name)
            .filter(FieldKey::is_customer_visible);

        for key in visible {
            for text in profile.field(key, content).all_text() {
                for (category, pattern) in claim_patterns() {
                    if !profile.restricts(*category) {
                        continue;
                    }
                    for found in pattern.find_iter(text) {
                        let phrase = found.as_str().to_lowercase();
                        if !seen.insert((key, *category, phrase.clone())) {
                            continue;
                        }
                        messages.push(
                            Diagnostic::new(
                                Self::severity(*category),
                                DiagnosticCode::RestrictedClaim,
                                Some(key),
                                format!("`{}` contains {} \"{}\"", key, category.label(), phrase),
                            )
                            .with_suggestion(Self::suggestion(*category)),
                        );
                    }
                }
            }
        }

        let errors = messages
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = messages.len() - errors;
        let value = 1.0 - ERROR_PENALTY * errors as f64 - WARNING_PENALTY * warnings as f64;
        CriterionScore::new(value, messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::profiles;
    use crate::{EtsyExtensions, ListingExtensions};

    #[test]
    fn test_clean_copy_is_perfect() {
        let content = ListingContent::new(
            "Acme Steel Water Bottle 750ml",
            "Double wall insulation keeps drinks cold for 24 hours.",
        )
        .with_bullets(["Leak proof lid"]);
        let result = ComplianceRule::new().evaluate(&content, &profiles::amazon());
        assert_eq!(result.value, 1.0);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_medical_claim_is_error() {
        let content = ListingContent::new("Copper Bracelet", "Cures arthritis overnight.");
        let result = ComplianceRule::new().evaluate(&content, &profiles::amazon());
        assert_eq!(result.messages.len(), 1);
        let msg = &result.messages[0];
        assert_eq!(msg.severity, Severity::Error);
        assert_eq!(msg.code, DiagnosticCode::RestrictedClaim);
        assert_eq!(msg.field, Some(FieldKey::Description));
        assert!((result.value - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_only_restricted_categories_checked() {
        // eBay does not restrict superlatives
        let content = ListingContent::new("Best seller camera", "Number one choice");
        let ebay = ComplianceRule::new().evaluate(&content, &profiles::ebay());
        assert!(ebay.messages.is_empty());

        let amazon = ComplianceRule::new().evaluate(&content, &profiles::amazon());
        assert_eq!(amazon.messages.len(), 2);
        assert!(amazon.messages.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_hidden_fields_not_scanned() {
        let content = ListingContent::new("Copper Bracelet", "Solid copper band")
            .with_backend_keywords("cures arthritis www.example.com");
        let result = ComplianceRule::new().evaluate(&content, &profiles::amazon());
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_contact_details_flagged() {
        let content = ListingContent::new(
            "Handmade mug",
            "Questions? Email me at maker@example.com or visit https://example.com/shop",
        );
        let result = ComplianceRule::new().evaluate(&content, &profiles::ebay());
        let phrases: Vec<&str> = result.messages.iter().map(|d| d.message.as_str()).collect();
        assert!(phrases.iter().any(|m| m.contains("maker@example.com")));
        assert!(phrases.iter().any(|m| m.contains("https://example.com/shop")));
        assert!(result.messages.iter().all(|d| d.severity == Severity::Error));
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_repeated_phrase_reported_once_per_field() {
        let content = ListingContent::new("Mug", "Risk-free purchase. Totally risk-free.");
        let result = ComplianceRule::new().evaluate(&content, &profiles::ebay());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn test_extension_lists_are_scanned() {
        let content = ListingContent::new("Ceramic mug", "Wheel thrown").with_extensions(
            ListingExtensions::Etsy(EtsyExtensions {
                tags: vec!["mug".to_string(), "heals anxiety".to_string()],
                materials: Vec::new(),
            }),
        );
        let result = ComplianceRule::new().evaluate(&content, &profiles::etsy());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].field, Some(FieldKey::Tags));
    }
}
