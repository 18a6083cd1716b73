//! Property tests: score range, determinism and overrun handling

use listing_qa::analyzer::AuditEngine;
use listing_qa::marketplace::{FieldKey, ProfileRegistry, RegistryBuilder};
use listing_qa::{DiagnosticCode, ListingContent, Severity};
use proptest::prelude::*;

fn all_enabled() -> ProfileRegistry {
    let ids: Vec<String> = ProfileRegistry::builtin()
        .unwrap()
        .profiles()
        .map(|(p, _)| p.id.clone())
        .collect();
    RegistryBuilder::builtin()
        .unwrap()
        .enable_only(&ids)
        .unwrap()
        .build()
}

fn marketplace() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("amazon"), Just("ebay"), Just("etsy"), Just("walmart")]
}

prop_compose! {
    fn listing()(
        title in ".{0,250}",
        description in ".{0,600}",
        bullets in prop::collection::vec(".{0,80}", 0..8),
        keywords in prop::option::of("[a-z ]{0,120}"),
    ) -> ListingContent {
        let mut content = ListingContent::new(title, description).with_bullets(bullets);
        content.backend_keywords = keywords;
        content
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn score_is_always_in_range(content in listing(), id in marketplace()) {
        let registry = all_enabled();
        let result = AuditEngine::new(&registry).analyze_listing(&content, id).unwrap();
        prop_assert!(result.score <= 100);
        for score in result.breakdown.values() {
            prop_assert!((0.0..=1.0).contains(&score.value));
        }
    }

    #[test]
    fn audit_is_deterministic(content in listing(), id in marketplace()) {
        let registry = all_enabled();
        let engine = AuditEngine::new(&registry);
        let first = engine.analyze_listing(&content, id).unwrap();
        let second = engine.analyze_listing(&content, id).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn title_overrun_is_exactly_one_warning(
        extra in 1usize..400,
        fill in prop_oneof![Just("x"), Just(" "), Just("é")],
        id in marketplace(),
    ) {
        let registry = all_enabled();
        let profile = registry.get_marketplace_profile(id).unwrap();
        let max = profile.field_spec(FieldKey::Title).and_then(|s| s.max_length).unwrap();
        let content = ListingContent::new(fill.repeat(max + extra), "Plain description");

        let result = AuditEngine::new(&registry).analyze_listing(&content, id).unwrap();
        let overruns: Vec<_> = result
            .diagnostics_for(FieldKey::Title)
            .filter(|d| d.code == DiagnosticCode::FieldTooLong)
            .collect();
        prop_assert_eq!(overruns.len(), 1);
        prop_assert_eq!(overruns[0].severity, Severity::Warning);
        // A blank title is also missing; the overrun itself never escalates
        let errors: Vec<_> = result
            .diagnostics_for(FieldKey::Title)
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.code)
            .collect();
        if fill.trim().is_empty() {
            prop_assert_eq!(errors, vec![DiagnosticCode::MissingRequiredField]);
        } else {
            prop_assert!(errors.is_empty());
        }
    }

    #[test]
    fn missing_required_title_is_always_an_error(description in ".{0,300}", id in marketplace()) {
        let registry = all_enabled();
        let content = ListingContent::new("   ", description);
        let result = AuditEngine::new(&registry).analyze_listing(&content, id).unwrap();
        prop_assert!(result
            .diagnostics_for(FieldKey::Title)
            .any(|d| d.code == DiagnosticCode::MissingRequiredField && d.severity == Severity::Error));
    }
}

#[test]
fn pathological_descriptions_stay_in_range() {
    let registry = ProfileRegistry::builtin().unwrap();
    let engine = AuditEngine::new(&registry);
    // Amazon caps descriptions at 2000 characters
    for length in [0, 1, 2000, 2001, 10_000] {
        let content = ListingContent::new("Steel mug", "d".repeat(length)).with_bullets(Vec::<String>::new());
        let result = engine.analyze_listing(&content, "amazon").unwrap();
        assert!(result.score <= 100);
        let overruns = result
            .diagnostics_for(FieldKey::Description)
            .filter(|d| d.code == DiagnosticCode::FieldTooLong)
            .count();
        assert_eq!(overruns, usize::from(length > 2000), "length {}", length);
    }
}
