//! # autocli Configuration System
//!
//! File: lib/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges, and validates the settings of a binary built on autocli. The
//! settings cover the root parser (program name, description, version) and the
//! scan (commands directory, file extension, marker files, recursion, ordering).
//!
//! Configuration sources (in order of precedence):
//! 1. The `AUTOCLI_COMMANDS_DIR` environment variable (commands directory only)
//! 2. Project-specific `.autocli.toml` in the current directory or ancestors
//! 3. User-specific `<config dir>/autocli/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [parser]
//! name = "mixed_app"
//! about = "Mixed nesting and delimiter commands"
//!
//! [scan]
//! commands_dir = "~/src/mixed_app/commands"
//! recursive = true
//! ```
//!
//! ```rust,no_run
//! let cfg = autocli::core::config::load_config()?;
//! let scan_options = cfg.scan.to_scan_options();
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
use crate::core::error::{AutocliError, Result};
use crate::discovery::scanner::ScanOptions;
use crate::parser::ParserOptions;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Environment variable that overrides `scan.commands_dir`.
pub const COMMANDS_DIR_ENV: &str = "AUTOCLI_COMMANDS_DIR";

const PROJECT_CONFIG_FILENAME: &str = ".autocli.toml";

/// Resolved configuration: every file layer merged and defaults filled in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub parser: ParserOptions,
    pub scan: ScanConfig,
}

/// Resolved settings for discovering command files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory to scan at runtime (can use ~). When unset, binaries fall back
    /// to the listing recorded in their compiled registry.
    pub commands_dir: Option<String>,
    /// Command file extension, without the leading dot.
    pub extension: String,
    /// Package-marker file names that are never commands.
    pub markers: Vec<String>,
    pub recursive: bool,
    pub sorted: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let defaults = ScanOptions::default();
        Self {
            commands_dir: None,
            extension: defaults.extension,
            markers: defaults.markers,
            recursive: defaults.recursive,
            sorted: defaults.sorted,
        }
    }
}

impl ScanConfig {
    pub fn to_scan_options(&self) -> ScanOptions {
        ScanOptions {
            extension: self.extension.clone(),
            markers: self.markers.clone(),
            recursive: self.recursive,
            sorted: self.sorted,
        }
    }

    /// The configured commands directory, if any.
    pub fn commands_dir(&self) -> Option<PathBuf> {
        self.commands_dir.as_ref().map(PathBuf::from)
    }
}

/// One configuration file as written. Unset keys stay `None` so that a lower
/// layer can supply them.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub parser: ParserOptions,
    #[serde(default)]
    pub scan: ScanFile,
}

/// The `[scan]` table of one configuration file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScanFile {
    pub commands_dir: Option<String>,
    pub extension: Option<String>,
    pub markers: Option<Vec<String>>,
    pub recursive: Option<bool>,
    pub sorted: Option<bool>,
}

impl ConfigFile {
    /// Fills every unset key with its default.
    pub fn resolve(self) -> Config {
        let defaults = ScanConfig::default();
        Config {
            parser: self.parser,
            scan: ScanConfig {
                commands_dir: self.scan.commands_dir,
                extension: self.scan.extension.unwrap_or(defaults.extension),
                markers: self.scan.markers.unwrap_or(defaults.markers),
                recursive: self.scan.recursive.unwrap_or(defaults.recursive),
                sorted: self.scan.sorted.unwrap_or(defaults.sorted),
            },
        }
    }
}

/// # Load Configuration (`load_config`)
///
/// Loads user and project configuration, merges them, applies the environment
/// override, expands `~`, and validates the result.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config =
        merge_configs(user_config.unwrap_or_default(), project_config).resolve();
    apply_env_overrides(&mut merged_config, std::env::var(COMMANDS_DIR_ENV).ok());
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "autocli", "autocli") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_file_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_file_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.autocli.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for `.autocli.toml`,
/// stopping at the first directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path: &Path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// Reads a single configuration file and resolves it against the defaults.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    load_file_from_path(path).map(ConfigFile::resolve)
}

fn load_file_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Every key set in the project file wins over the user file.
fn merge_configs(user: ConfigFile, project: Option<ConfigFile>) -> ConfigFile {
    let project = match project {
        Some(p) => p,
        None => return user,
    };

    ConfigFile {
        parser: ParserOptions {
            name: project.parser.name.or(user.parser.name),
            about: project.parser.about.or(user.parser.about),
            long_about: project.parser.long_about.or(user.parser.long_about),
            version: project.parser.version.or(user.parser.version),
            author: project.parser.author.or(user.parser.author),
        },
        scan: ScanFile {
            commands_dir: project.scan.commands_dir.or(user.scan.commands_dir),
            extension: project.scan.extension.or(user.scan.extension),
            markers: project.scan.markers.or(user.scan.markers),
            recursive: project.scan.recursive.or(user.scan.recursive),
            sorted: project.scan.sorted.or(user.scan.sorted),
        },
    }
}

fn apply_env_overrides(config: &mut Config, commands_dir: Option<String>) {
    if let Some(dir) = commands_dir.filter(|d| !d.is_empty()) {
        debug!("{} overrides commands directory: {}", COMMANDS_DIR_ENV, dir);
        config.scan.commands_dir = Some(dir);
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = &config.scan.commands_dir {
        let expanded = shellexpand::tilde(dir).into_owned();
        debug!("Expanded commands directory: {}", expanded);
        config.scan.commands_dir = Some(expanded);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    let scan = &config.scan;
    if scan.extension.is_empty() {
        return Err(anyhow!(AutocliError::Config(
            "Scan extension cannot be empty.".to_string()
        )));
    }
    if scan.extension.starts_with('.') {
        return Err(anyhow!(AutocliError::Config(format!(
            "Scan extension '{}' must not start with a dot.",
            scan.extension
        ))));
    }
    for marker in &scan.markers {
        if marker.contains('/') || marker.contains('\\') {
            return Err(anyhow!(AutocliError::Config(format!(
                "Marker '{}' must be a file name, not a path.",
                marker
            ))));
        }
    }
    if let Some(name) = &config.parser.name {
        if name.trim().is_empty() {
            return Err(anyhow!(AutocliError::Config(
                "Parser name cannot be blank.".to_string()
            )));
        }
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(content: &str) -> ConfigFile {
        toml::from_str(content).expect("Failed to parse TOML")
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [parser]
            name = "dirs_app"
            about = "Deeply nested commands"

            [scan]
            commands_dir = "~/apps/dirs_app/commands"
            recursive = false
        "#;

        let file = parse(toml_content);
        assert_eq!(file.scan.sorted, None);
        let config = file.resolve();

        assert_eq!(config.parser.name.as_deref(), Some("dirs_app"));
        assert_eq!(config.parser.about.as_deref(), Some("Deeply nested commands"));
        assert_eq!(config.scan.commands_dir.as_deref(), Some("~/apps/dirs_app/commands"));
        assert!(!config.scan.recursive);
        assert!(config.scan.sorted); // Default
        assert_eq!(config.scan.markers, vec!["mod.rs"]); // Default
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<ConfigFile, _> =
            toml::from_str("[scan]\ndelimiter = \"--\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_prefers_project() {
        let user = parse(
            r#"
            [parser]
            name = "user-name"
            about = "user about"

            [scan]
            extension = "py"
        "#,
        );
        let project = parse(
            r#"
            [parser]
            name = "project-name"

            [scan]
            commands_dir = "/project/commands"
        "#,
        );
        let merged = merge_configs(user, Some(project)).resolve();
        assert_eq!(merged.parser.name.as_deref(), Some("project-name"));
        assert_eq!(merged.parser.about.as_deref(), Some("user about"));
        assert_eq!(merged.scan.extension, "py");
        assert_eq!(merged.scan.commands_dir.as_deref(), Some("/project/commands"));
    }

    #[test]
    fn test_project_can_restore_default_values() {
        let user = parse("[scan]\nrecursive = false\nsorted = false\nextension = \"py\"\n");
        let project = parse("[scan]\nrecursive = true\nsorted = true\nextension = \"rs\"\n");
        let merged = merge_configs(user, Some(project)).resolve();
        assert!(merged.scan.recursive);
        assert!(merged.scan.sorted);
        assert_eq!(merged.scan.extension, "rs");
    }

    #[test]
    fn test_user_values_kept_when_project_silent() {
        let user = parse("[scan]\nrecursive = false\n");
        let merged = merge_configs(user, Some(parse("[parser]\nname = \"app\"\n"))).resolve();
        assert!(!merged.scan.recursive);
        assert!(merged.scan.sorted);
        assert_eq!(merged.parser.name.as_deref(), Some("app"));
    }

    #[test]
    fn test_env_override_and_expansion() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, Some("~/cmds".to_string()));
        expand_config_paths(&mut config);
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.scan.commands_dir(),
            Some(PathBuf::from(home_dir.join("cmds").to_string_lossy().into_owned()))
        );

        let mut untouched = Config::default();
        apply_env_overrides(&mut untouched, Some(String::new()));
        assert_eq!(untouched.scan.commands_dir, None);
    }

    #[test]
    fn test_validate_config_invalid_extension() {
        let config = Config {
            scan: ScanConfig {
                extension: ".rs".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must not start with a dot"));
    }

    #[test]
    fn test_validate_config_marker_path() {
        let config = Config {
            scan: ScanConfig {
                markers: vec!["user/mod.rs".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_find_project_config_stops_at_git() {
        let temp_dir = tempdir().unwrap();
        let repo = temp_dir.path().join("repo");
        let nested = repo.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(find_project_config_path(&nested), None);

        fs::write(repo.join("a").join(PROJECT_CONFIG_FILENAME), "[scan]\nsorted = false\n").unwrap();
        let found = find_project_config_path(&nested).unwrap();
        assert_eq!(found, repo.join("a").join(PROJECT_CONFIG_FILENAME));
        let config = load_config_from_path(&found).unwrap();
        assert!(!config.scan.sorted);
    }
}
