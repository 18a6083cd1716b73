//! Edge case tests: degenerate inputs and registries must not panic.

use listing_qa::analyzer::AuditEngine;
use listing_qa::marketplace::{
    ClaimCategory, FieldKey, FieldSpec, MarketplaceProfile, ProfileRegistry,
};
use listing_qa::{
    AmazonExtensions, APlusModule, Criterion, CriterionRegistry, DefectReason, DiagnosticCode,
    EtsyExtensions, ListingContent, ListingExtensions, ListingRequest, QaError, Severity,
};

fn registry() -> ProfileRegistry {
    ProfileRegistry::builtin().unwrap()
}

#[test]
fn empty_listing_no_panic() {
    let registry = registry();
    let engine = AuditEngine::new(&registry);
    for id in ["amazon", "ebay"] {
        let result = engine.analyze_listing(&ListingContent::default(), id).unwrap();
        assert!(result.score <= 100);
        assert!(result.has_errors());
    }
}

#[test]
fn unicode_title_counts_characters_not_bytes() {
    let registry = registry();
    // 80 characters, far more than 80 bytes
    let title = "é".repeat(80);
    let result = AuditEngine::new(&registry)
        .analyze_listing(&ListingContent::new(title, "Great item"), "ebay")
        .unwrap();
    assert!(!result
        .validation
        .iter()
        .any(|d| d.code == DiagnosticCode::FieldTooLong && d.field == Some(FieldKey::Title)));
}

#[test]
fn whitespace_only_required_field_is_missing() {
    let registry = registry();
    let result = AuditEngine::new(&registry)
        .analyze_listing(&ListingContent::new(" \t\n", "Great item"), "ebay")
        .unwrap();
    assert!(result
        .diagnostics_for(FieldKey::Title)
        .any(|d| d.code == DiagnosticCode::MissingRequiredField));
}

#[test]
fn fields_outside_the_shape_are_ignored() {
    let registry = registry();
    let engine = AuditEngine::new(&registry);
    let base = ListingContent::new("Canon EOS 80D DSLR Camera Body", "Used camera body in good order.");
    // eBay declares no bullets and no backend keywords
    let extra = base
        .clone()
        .with_bullets(["Visit https://example.com for more"])
        .with_backend_keywords("camera dslr");

    let plain = engine.analyze_listing(&base, "ebay").unwrap();
    let with_extra = engine.analyze_listing(&extra, "ebay").unwrap();
    assert_eq!(plain, with_extra);
}

#[test]
fn restricted_claim_in_a_plus_module_is_flagged() {
    let registry = registry();
    let content = ListingContent::new("Acme Copper Bracelet", "Solid copper cuff, adjustable.")
        .with_extensions(ListingExtensions::Amazon(AmazonExtensions {
            a_plus_modules: vec![APlusModule {
                module_type: "image_text".to_string(),
                headline: Some("Relief you can wear".to_string()),
                body: "Copper cures arthritis overnight.".to_string(),
            }],
        }));
    let result = AuditEngine::new(&registry)
        .analyze_listing(&content, "amazon")
        .unwrap();
    let claims: Vec<_> = result
        .diagnostics_for(FieldKey::APlusModules)
        .filter(|d| d.code == DiagnosticCode::RestrictedClaim)
        .collect();
    assert!(!claims.is_empty());
    assert!(claims.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn etsy_tags_when_enabled() {
    let registry = ProfileRegistry::builder(CriterionRegistry::builtin())
        .register(listing_qa::marketplace::profiles::etsy(), true)
        .unwrap()
        .build();
    let content = ListingContent::new(
        "Speckled Stoneware Mug, Hand Thrown Ceramic Coffee Cup",
        "Wheel thrown in small batches and glazed in a speckled oat finish. Holds 350ml.",
    )
    .with_extensions(ListingExtensions::Etsy(EtsyExtensions {
        tags: vec!["stoneware mug".to_string(), "stoneware mug".to_string()],
        materials: vec!["stoneware".to_string()],
    }));
    let result = AuditEngine::new(&registry)
        .analyze_listing(&content, "etsy")
        .unwrap();
    assert!(result
        .diagnostics_for(FieldKey::Tags)
        .any(|d| d.code == DiagnosticCode::DuplicateEntry));
}

#[test]
fn marketplace_ids_are_case_insensitive() {
    let registry = registry();
    let result = AuditEngine::new(&registry)
        .analyze_listing(&ListingContent::new("Mug", "A mug"), " Amazon ")
        .unwrap();
    assert_eq!(result.marketplace, "amazon");
}

#[test]
fn listing_request_ignores_unknown_keys() {
    let request: ListingRequest = serde_json::from_str(
        r#"{"marketplace":"ebay","title":"Camera","description":"Works","price":"12.00"}"#,
    )
    .unwrap();
    assert_eq!(request.marketplace.as_deref(), Some("ebay"));
    assert_eq!(request.content.title, "Camera");
}

// --- Registry construction defects ---

fn fixture_profile(id: &str) -> MarketplaceProfile {
    MarketplaceProfile::new(id, "Fixture")
        .with_field(FieldSpec::required(FieldKey::Title, "Title").with_max_length(10))
        .with_weight(Criterion::TitleLength.name(), 0.5)
        .with_weight(Criterion::Compliance.name(), 0.5)
        .restricting(&[ClaimCategory::Medical])
}

#[test]
fn isolated_registry_with_fixture_profile() {
    let registry = ProfileRegistry::builder(CriterionRegistry::builtin())
        .register(fixture_profile("bazaar"), true)
        .unwrap()
        .build();
    let result = AuditEngine::new(&registry)
        .analyze_listing(&ListingContent::new("Tiny mug", ""), "bazaar")
        .unwrap();
    assert_eq!(result.breakdown.len(), 2);
    assert!(AuditEngine::new(&registry)
        .analyze_listing(&ListingContent::default(), "amazon")
        .is_err());
}

#[test]
fn weights_not_summing_to_one_are_refused() {
    let profile = fixture_profile("bazaar").with_weight(Criterion::Structure.name(), 0.1);
    let err = ProfileRegistry::builder(CriterionRegistry::builtin())
        .register(profile, true)
        .unwrap_err();
    assert!(matches!(
        err,
        QaError::ConfigurationDefect { reason: DefectReason::WeightSum { .. }, .. }
    ));
}

#[test]
fn criterion_missing_from_registry_is_refused() {
    let criteria = CriterionRegistry::empty().with(Criterion::TitleLength);
    let err = ProfileRegistry::builder(criteria)
        .register(fixture_profile("bazaar"), true)
        .unwrap_err();
    assert!(matches!(
        err,
        QaError::ConfigurationDefect { reason: DefectReason::UnknownCriterion(ref name), .. }
            if name == "compliance"
    ));
}

#[test]
fn duplicate_marketplace_is_refused() {
    let err = ProfileRegistry::builder(CriterionRegistry::builtin())
        .register(fixture_profile("bazaar"), true)
        .unwrap()
        .register(fixture_profile("bazaar"), false)
        .unwrap_err();
    assert!(matches!(
        err,
        QaError::ConfigurationDefect { reason: DefectReason::DuplicateMarketplace, .. }
    ));
}
