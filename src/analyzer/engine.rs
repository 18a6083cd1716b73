//! Audit engine - orchestrates validation and every weighted criterion

use crate::error::{DefectReason, QaError};
use crate::marketplace::{MarketplaceProfile, ProfileRegistry};
use crate::{AuditResult, CriterionScore, ListingContent, Severity};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use super::validation::validate_structure;
use super::ScoreCalculator;

/// One listing queued for a batch audit
#[derive(Debug, Clone)]
pub struct AuditJob {
    pub content: ListingContent,
    pub marketplace: String,
}

impl AuditJob {
    pub fn new(content: ListingContent, marketplace: impl Into<String>) -> Self {
        Self {
            content,
            marketplace: marketplace.into(),
        }
    }
}

/// Main audit engine.
///
/// Holds nothing but a shared reference to the boot-time registry, so one
/// engine can serve any number of concurrent audits.
#[derive(Debug, Clone, Copy)]
pub struct AuditEngine<'r> {
    registry: &'r ProfileRegistry,
}

impl<'r> AuditEngine<'r> {
    pub fn new(registry: &'r ProfileRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ProfileRegistry {
        self.registry
    }

    /// Audit one listing for one enabled marketplace
    pub fn analyze_listing(
        &self,
        content: &ListingContent,
        marketplace_id: &str,
    ) -> Result<AuditResult, QaError> {
        let profile = self.registry.get_marketplace_profile(marketplace_id)?;
        self.audit(content, profile)
    }

    fn audit(&self, content: &ListingContent, profile: &MarketplaceProfile) -> Result<AuditResult, QaError> {
        let mut validation = validate_structure(content, profile);
        let mut breakdown = BTreeMap::new();
        let mut weighted = Vec::with_capacity(profile.scoring_weights.len());

        for entry in &profile.scoring_weights {
            let criterion = self.registry.criteria().get(&entry.criterion).ok_or_else(|| {
                QaError::defect(&profile.id, DefectReason::UnknownCriterion(entry.criterion.clone()))
            })?;
            let score = checked(&entry.criterion, criterion.evaluate(content, profile))?;
            validation.extend(score.messages.iter().cloned());
            weighted.push((entry.weight, score.value));
            breakdown.insert(entry.criterion.clone(), score);
        }

        let score = ScoreCalculator::aggregate(&weighted);
        debug!(
            "audited listing for '{}': score {} ({} diagnostics)",
            profile.id,
            score,
            validation.len()
        );

        Ok(AuditResult {
            marketplace: profile.id.clone(),
            score,
            validation,
            breakdown,
        })
    }

    /// Audit several listings sequentially
    pub fn analyze_many(&self, jobs: &[AuditJob]) -> Vec<Result<AuditResult, QaError>> {
        jobs.iter()
            .map(|job| self.analyze_listing(&job.content, &job.marketplace))
            .collect()
    }

    /// Audit several listings in parallel using rayon; results keep job order
    pub fn analyze_parallel(&self, jobs: &[AuditJob]) -> Vec<Result<AuditResult, QaError>> {
        use rayon::prelude::*;

        jobs.par_iter()
            .map(|job| self.analyze_listing(&job.content, &job.marketplace))
            .collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[AuditResult]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total_score: u32 = results.iter().map(|r| r.score as u32).sum();
        let average_score = (total_score as f64 / results.len() as f64).round() as u8;

        AggregateStats {
            listings_audited: results.len(),
            average_score,
            total_errors: results.iter().map(|r| r.count(Severity::Error)).sum(),
            total_warnings: results.iter().map(|r| r.count(Severity::Warning)).sum(),
            unsellable: results.iter().filter(|r| r.has_errors()).count(),
        }
    }
}

/// A criterion returning NaN or infinity is a bug in that criterion
fn checked(criterion: &str, score: CriterionScore) -> Result<CriterionScore, QaError> {
    if score.value.is_finite() {
        Ok(score)
    } else {
        Err(QaError::CriterionDefect {
            criterion: criterion.to_string(),
            value: score.value,
        })
    }
}

/// Aggregate statistics from multiple audits
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of listings audited
    pub listings_audited: usize,
    /// Average score across all listings
    pub average_score: u8,
    pub total_errors: usize,
    pub total_warnings: usize,
    /// Listings with at least one error
    pub unsellable: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::FieldKey;
    use crate::DiagnosticCode;

    fn registry() -> ProfileRegistry {
        ProfileRegistry::builtin().unwrap()
    }

    fn good_amazon_listing() -> ListingContent {
        ListingContent::new(
            "Acme Insulated Stainless Steel Water Bottle 750ml, Leak Proof Lid, BPA Free, Keeps Drinks Cold 24 Hours",
            "Double wall vacuum insulation keeps drinks cold for 24 hours and hot for 12. \
             The powder coated finish resists sweat and scratches, the wide mouth takes ice cubes, \
             and the leak proof lid locks for travel. Dishwasher safe lid; hand wash the bottle. \
             Included: one 750ml bottle and one lid. Dimensions: 7.5cm wide, 27cm tall, 380g. \
             Suits hiking, cycling, office desks and school bags.",
        )
        .with_bullets([
            "Keeps drinks cold for 24 hours and hot for 12",
            "Leak proof lid locks shut for bags",
            "Wide mouth fits ice cubes and cleaning brushes",
            "Sweat free powder coat in six colours",
            "Fits most car cup holders",
        ])
        .with_backend_keywords("flask thermos canteen tumbler gym hiking camping cycling")
    }

    #[test]
    fn test_analyze_good_listing() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        let result = engine.analyze_listing(&good_amazon_listing(), "amazon").unwrap();

        assert_eq!(result.marketplace, "amazon");
        assert!(result.score >= 80, "score was {}", result.score);
        assert!(!result.has_errors());
        assert_eq!(result.breakdown.len(), 7);
    }

    #[test]
    fn test_unknown_marketplace_fails_fast() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        let err = engine
            .analyze_listing(&good_amazon_listing(), "shopify")
            .unwrap_err();
        assert_eq!(err, QaError::UnknownMarketplace("shopify".to_string()));
    }

    #[test]
    fn test_disabled_marketplace_fails() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        assert!(matches!(
            engine.analyze_listing(&good_amazon_listing(), "etsy"),
            Err(QaError::UnknownMarketplace(_))
        ));
    }

    #[test]
    fn test_structural_diagnostics_come_first() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        let content = ListingContent::new("", "Great item");
        let result = engine.analyze_listing(&content, "ebay").unwrap();

        assert_eq!(result.validation[0].code, DiagnosticCode::MissingRequiredField);
        assert_eq!(result.validation[0].field, Some(FieldKey::Title));
        let first_criterion = result
            .validation
            .iter()
            .position(|d| d.code != DiagnosticCode::MissingRequiredField)
            .unwrap();
        assert!(result.validation[first_criterion..]
            .iter()
            .all(|d| d.code != DiagnosticCode::MissingRequiredField));
    }

    #[test]
    fn test_score_matches_weighted_breakdown() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        let result = engine.analyze_listing(&good_amazon_listing(), "amazon").unwrap();
        let profile = registry.get_marketplace_profile("amazon").unwrap();

        let raw: f64 = profile
            .scoring_weights
            .iter()
            .map(|w| w.weight * result.breakdown[&w.criterion].value)
            .sum();
        assert_eq!(result.score, (raw * 100.0).round() as u8);
    }

    #[test]
    fn test_content_is_not_mutated() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        let content = good_amazon_listing();
        let before = content.clone();
        engine.analyze_listing(&content, "ebay").unwrap();
        assert_eq!(content, before);
    }

    #[test]
    fn test_non_finite_value_is_defect() {
        let err = checked("title_length", CriterionScore::new(f64::NAN, Vec::new())).unwrap_err();
        assert!(matches!(err, QaError::CriterionDefect { ref criterion, .. } if criterion == "title_length"));
        for value in [f64::INFINITY, f64::NEG_INFINITY] {
            let err = checked("structure", CriterionScore::new(value, Vec::new())).unwrap_err();
            assert!(matches!(err, QaError::CriterionDefect { value: v, .. } if v == value));
        }
        assert!(checked("title_length", CriterionScore::new(0.4, Vec::new())).is_ok());
        assert_eq!(CriterionScore::new(1.7, Vec::new()).value, 1.0);
    }

    #[test]
    fn test_analyze_many_and_parallel_agree() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        let jobs = vec![
            AuditJob::new(good_amazon_listing(), "amazon"),
            AuditJob::new(ListingContent::new("", "Great item"), "ebay"),
            AuditJob::new(good_amazon_listing(), "nowhere"),
            AuditJob::new(good_amazon_listing(), "EBAY"),
        ];

        let sequential = engine.analyze_many(&jobs);
        let parallel = engine.analyze_parallel(&jobs);
        assert_eq!(sequential, parallel);
        assert!(sequential[2].is_err());
        assert_eq!(sequential[3].as_ref().unwrap().marketplace, "ebay");
    }

    #[test]
    fn test_aggregate_stats_empty() {
        let stats = AuditEngine::aggregate_stats(&[]);
        assert_eq!(stats, AggregateStats::default());
    }

    #[test]
    fn test_aggregate_stats_multiple() {
        let registry = registry();
        let engine = AuditEngine::new(&registry);
        let good = engine.analyze_listing(&good_amazon_listing(), "amazon").unwrap();
        let bad = engine
            .analyze_listing(&ListingContent::new("", "Great item"), "ebay")
            .unwrap();

        let stats = AuditEngine::aggregate_stats(&[good.clone(), bad.clone()]);
        assert_eq!(stats.listings_audited, 2);
        assert_eq!(
            stats.average_score,
            ((good.score as f64 + bad.score as f64) / 2.0).round() as u8
        );
        assert_eq!(stats.unsellable, 1);
        assert_eq!(stats.total_errors, bad.count(Severity::Error));
    }
}
