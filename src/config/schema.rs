//! Config schema and deserialization

use crate::marketplace::{ProfileRegistry, RegistryBuilder};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional threshold override for matched files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Marketplace for matched listings that do not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,
}

/// Root config structure for .listingqarc.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum score threshold (exit 1 if below). Default: 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Marketplace used when neither the CLI nor the listing names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_marketplace: Option<String>,

    /// Replaces the built-in enablement when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_marketplaces: Option<Vec<String>>,

    /// Glob patterns for files/directories to exclude from scans
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Per-path configuration overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>, cli_marketplace: Option<&str>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if let Some(marketplace) = cli_marketplace {
            self.default_marketplace = Some(marketplace.to_string());
            // An explicit marketplace beats per-path overrides too
            for override_cfg in &mut self.overrides {
                override_cfg.marketplace = None;
            }
        }
        self
    }

    /// Get effective config for a specific file path, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            marketplace: self.default_marketplace.clone(),
        };

        // Apply matching overrides in order
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                if let Some(ref marketplace) = override_cfg.marketplace {
                    effective.marketplace = Some(marketplace.clone());
                }
            }
        }

        effective
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => {
                glob.compile_matcher().is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
            }
            Err(_) => false,
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.default_marketplace.is_none() {
            self.default_marketplace = base.default_marketplace;
        }
        if self.enabled_marketplaces.is_none() {
            self.enabled_marketplaces = base.enabled_marketplaces;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        // Prepend base overrides so ours apply last
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// Build the profile registry, applying `enabledMarketplaces` if set
    pub fn build_registry(&self) -> Result<ProfileRegistry> {
        let mut builder =
            RegistryBuilder::builtin().context("Built-in marketplace profiles are inconsistent")?;
        if let Some(ref ids) = self.enabled_marketplaces {
            builder = builder
                .enable_only(ids)
                .context("Invalid enabledMarketplaces in config")?;
        }
        Ok(builder.build())
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub threshold: Option<u8>,
    pub marketplace: Option<String>,
}
