//! Configuration loading for listing-qa

mod schema;

pub use schema::{Config, ConfigOverride, EffectiveConfig};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".listingqarc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)?
    };

    match path {
        Some(path) => load_config_with_extends(&path, &mut HashSet::new()),
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if visited.contains(&canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }
    visited.insert(canonical.clone());

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    // Resolve extends
    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference to a config file path
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .listingqarc.json in directory and its parents
pub fn find_config_in_parents(mut dir: &Path) -> Result<Option<PathBuf>> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Ok(Some(candidate));
        }
        dir = match dir.parent() {
            Some(p) => p,
            None => return Ok(None),
        };
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

/// Starter config written by `listing-qa init`
pub fn starter_config(threshold: u8, marketplace: Option<&str>) -> Config {
    Config {
        threshold: Some(threshold),
        default_marketplace: Some(marketplace.unwrap_or("amazon").to_string()),
        ignore: vec!["**/drafts/**".to_string()],
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &str) {
        let mut file = fs::File::create(path).unwrap();
        writeln!(file, "{}", content).unwrap();
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join(CONFIG_FILENAME), "{}");
        let nested = dir.path().join("listings").join("kitchen");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_in_parents(&nested).unwrap();
        assert_eq!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_missing_custom_config_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_is_ignored_drafts() {
        let set = build_ignore_set(&["**/drafts/**".to_string()]).unwrap();
        assert!(is_ignored(Path::new("listings/drafts/mug.json"), &set));
        assert!(!is_ignored(Path::new("listings/mug.json"), &set));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        assert!(build_ignore_set(&["a/{b".to_string()]).is_err());
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();

        write_file(
            &dir.path().join("base.json"),
            r#"{
                "threshold": 70,
                "defaultMarketplace": "ebay",
                "enabledMarketplaces": ["amazon", "ebay", "etsy"],
                "ignore": ["**/drafts/**"]
            }"#,
        );
        write_file(
            &dir.path().join(CONFIG_FILENAME),
            r#"{
                "extends": "./base.json",
                "threshold": 80,
                "ignore": ["**/archive/**"]
            }"#,
        );

        let config = load_config(dir.path(), None).unwrap();

        // Child threshold overrides base
        assert_eq!(config.threshold, Some(80));
        // Base values are inherited
        assert_eq!(config.default_marketplace.as_deref(), Some("ebay"));
        assert_eq!(config.enabled_marketplaces.as_ref().map(Vec::len), Some(3));
        assert_eq!(config.ignore, vec!["**/drafts/**", "**/archive/**"]);
    }

    #[test]
    fn test_circular_extends_detected() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#);
        write_file(&dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#);

        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Circular extends"));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join(CONFIG_FILENAME), "{ not json");
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON in config"));
    }

    #[test]
    fn test_config_overrides() {
        let config: Config = serde_json::from_str(
            r#"{
                "threshold": 70,
                "defaultMarketplace": "amazon",
                "overrides": [
                    { "files": ["**/vintage/**"], "threshold": 50, "marketplace": "ebay" },
                    { "files": ["**/*.draft.json"], "threshold": 0 }
                ]
            }"#,
        )
        .unwrap();

        let effective = config.effective_for_file(Path::new("listings/mug.json"));
        assert_eq!(effective.threshold, Some(70));
        assert_eq!(effective.marketplace.as_deref(), Some("amazon"));

        let effective = config.effective_for_file(Path::new("listings/vintage/camera.json"));
        assert_eq!(effective.threshold, Some(50));
        assert_eq!(effective.marketplace.as_deref(), Some("ebay"));

        let effective = config.effective_for_file(Path::new("listings/mug.draft.json"));
        assert_eq!(effective.threshold, Some(0));
    }

    #[test]
    fn test_starter_config_round_trips() {
        let config = starter_config(75, Some("ebay"));
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.threshold, Some(75));
        assert_eq!(parsed.default_marketplace.as_deref(), Some("ebay"));
        assert!(!json.contains("extends"));
    }
}
