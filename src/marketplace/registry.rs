//! Process-wide, read-only lookup from marketplace id to profile

use super::profile::{normalize_id, MarketplaceProfile};
use super::profiles::builtin_profiles;
use crate::analyzer::CriterionRegistry;
use crate::error::{DefectReason, QaError};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Allowed drift of a profile's weight sum from 1.0
pub const WEIGHT_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone)]
struct RegisteredProfile {
    profile: MarketplaceProfile,
    enabled: bool,
}

/// Immutable registry of marketplace profiles.
///
/// Built once at startup through [`RegistryBuilder`], which checks every
/// profile's consistency, then shared by reference with the engine.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    criteria: CriterionRegistry,
    profiles: BTreeMap<String, RegisteredProfile>,
}

impl ProfileRegistry {
    pub fn builder(criteria: CriterionRegistry) -> RegistryBuilder {
        RegistryBuilder::new(criteria)
    }

    /// Built-in criteria and profiles with default enablement
    pub fn builtin() -> Result<Self, QaError> {
        Ok(RegistryBuilder::builtin()?.build())
    }

    /// Resolve an enabled profile. Unknown and disabled ids both fail.
    pub fn get_marketplace_profile(&self, marketplace_id: &str) -> Result<&MarketplaceProfile, QaError> {
        match self.profiles.get(&normalize_id(marketplace_id)) {
            Some(entry) if entry.enabled => Ok(&entry.profile),
            _ => Err(QaError::UnknownMarketplace(marketplace_id.to_string())),
        }
    }

    /// Any registered profile, enabled or not. Not for auditing.
    pub fn registered_profile(&self, marketplace_id: &str) -> Option<&MarketplaceProfile> {
        self.profiles
            .get(&normalize_id(marketplace_id))
            .map(|entry| &entry.profile)
    }

    pub fn enabled_marketplace_ids(&self) -> BTreeSet<String> {
        self.profiles
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn is_enabled(&self, marketplace_id: &str) -> bool {
        self.profiles
            .get(&normalize_id(marketplace_id))
            .is_some_and(|entry| entry.enabled)
    }

    /// Every registered profile, enabled or not, in id order
    pub fn profiles(&self) -> impl Iterator<Item = (&MarketplaceProfile, bool)> {
        self.profiles.values().map(|e| (&e.profile, e.enabled))
    }

    pub fn criteria(&self) -> &CriterionRegistry {
        &self.criteria
    }
}

/// Collects profiles, rejecting inconsistent ones as they are registered
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    criteria: CriterionRegistry,
    profiles: BTreeMap<String, RegisteredProfile>,
}

impl RegistryBuilder {
    pub fn new(criteria: CriterionRegistry) -> Self {
        Self {
            criteria,
            profiles: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Result<Self, QaError> {
        builtin_profiles()
            .into_iter()
            .try_fold(Self::new(CriterionRegistry::builtin()), |builder, (profile, enabled)| {
                builder.register(profile, enabled)
            })
    }

    pub fn register(mut self, profile: MarketplaceProfile, enabled: bool) -> Result<Self, QaError> {
        validate_profile(&profile, &self.criteria)?;
        if self.profiles.contains_key(&profile.id) {
            return Err(QaError::defect(&profile.id, DefectReason::DuplicateMarketplace));
        }
        debug!(
            "registered marketplace profile '{}' ({} fields, {} criteria, enabled={})",
            profile.id,
            profile.listing_shape.len(),
            profile.scoring_weights.len(),
            enabled
        );
        self.profiles
            .insert(profile.id.clone(), RegisteredProfile { profile, enabled });
        Ok(self)
    }

    /// Enable exactly these marketplaces; every id must be registered
    pub fn enable_only<S: AsRef<str>>(mut self, ids: &[S]) -> Result<Self, QaError> {
        let wanted: HashSet<String> = ids.iter().map(|id| normalize_id(id.as_ref())).collect();
        if let Some(missing) = wanted.iter().find(|id| !self.profiles.contains_key(*id)) {
            return Err(QaError::defect(missing, DefectReason::NotRegistered));
        }
        for (id, entry) in self.profiles.iter_mut() {
            entry.enabled = wanted.contains(id);
        }
        Ok(self)
    }

    pub fn build(self) -> ProfileRegistry {
        ProfileRegistry {
            criteria: self.criteria,
            profiles: self.profiles,
        }
    }
}

/// Registration-time consistency checks
fn validate_profile(profile: &MarketplaceProfile, criteria: &CriterionRegistry) -> Result<(), QaError> {
    let defect = |reason| Err(QaError::defect(&profile.id, reason));

    if profile.id.is_empty() {
        return defect(DefectReason::EmptyId);
    }
    if profile.scoring_weights.is_empty() {
        return defect(DefectReason::NoCriteria);
    }

    let mut seen_fields = HashSet::new();
    for spec in &profile.listing_shape {
        if !seen_fields.insert(spec.name) {
            return defect(DefectReason::DuplicateField(spec.name.to_string()));
        }
    }

    let mut seen_criteria = HashSet::new();
    for weighted in &profile.scoring_weights {
        if !criteria.contains(&weighted.criterion) {
            return defect(DefectReason::UnknownCriterion(weighted.criterion.clone()));
        }
        if !seen_criteria.insert(weighted.criterion.as_str()) {
            return defect(DefectReason::DuplicateCriterion(weighted.criterion.clone()));
        }
        if !(0.0..=1.0).contains(&weighted.weight) {
            return defect(DefectReason::WeightOutOfRange {
                criterion: weighted.criterion.clone(),
                weight: weighted.weight,
            });
        }
    }

    let sum = profile.weight_sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return defect(DefectReason::WeightSum { sum });
    }

    Ok(())
}
