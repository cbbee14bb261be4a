//! Configuration management for `register.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[site]`     | Site root directory and the URL it is served at  |
//! | `[unify]`    | Group id, placement, output directories, minify  |
//! | `[[style]]`  | Stylesheet declarations                          |
//! | `[[script]]` | Script declarations                              |

mod error;
mod section;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{ScriptEntry, SiteSection, StyleEntry, UnifySection};

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetReference, SiteRoot};
use crate::log;
use crate::unify::UnificationGroup;
use crate::utils::path::normalize_path;

/// Default config file name.
pub const CONFIG_FILE: &str = "register.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing register.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub unify: UnifySection,

    #[serde(default)]
    pub style: Vec<StyleEntry>,

    #[serde(default)]
    pub script: Vec<ScriptEntry>,
}

impl RegisterConfig {
    /// Load, normalize and validate a config file.
    ///
    /// Unknown fields are reported as warnings and ignored.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = normalize_path(path);
        let base = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.normalize(&base);
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve `site.root` against the config file's directory.
    fn normalize(&mut self, base: &Path) {
        self.site.root = normalize_path(&base.join(&self.site.root));
    }

    /// Check the parsed configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.site.url.trim().is_empty() {
            diag.error_with_hint(
                FieldPath::new("site.url"),
                "missing site URL",
                "set it to the public URL of `site.root`, e.g. \"https://example.com/themes/mytheme/\"",
            );
        } else if let Err(err) = url::Url::parse(&self.site.url) {
            diag.error(
                FieldPath::new("site.url"),
                format!("`{}` is not an absolute URL: {err}", self.site.url),
            );
        }

        if !self.unify.output.is_disabled() && self.unify.id.trim().is_empty() {
            diag.error_with_hint(
                FieldPath::new("unify.id"),
                "missing group id",
                "bundles are registered under this name",
            );
        }
        if let Err(err) = self.unify.output.validate() {
            diag.error(FieldPath::new("unify.output"), err.to_string());
        }

        let styles = self.style.iter().map(|e| (e.name.as_str(), e.url.as_str()));
        Self::validate_entries("style", styles, &mut diag);
        let scripts = self.script.iter().map(|e| (e.name.as_str(), e.url.as_str()));
        Self::validate_entries("script", scripts, &mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    fn validate_entries<'a>(
        section: &str,
        entries: impl Iterator<Item = (&'a str, &'a str)>,
        diag: &mut ConfigDiagnostics,
    ) {
        let mut seen = FxHashSet::default();
        for (idx, (name, url)) in entries.enumerate() {
            if name.trim().is_empty() {
                diag.error(FieldPath::indexed(section, idx, "name"), "empty name");
            } else if !seen.insert(name) {
                diag.error_with_hint(
                    FieldPath::indexed(section, idx, "name"),
                    format!("duplicate name `{name}`"),
                    format!("{section} names must be unique"),
                );
            }
            if url.trim().is_empty() {
                diag.error(FieldPath::indexed(section, idx, "url"), "empty url");
            }
        }
    }

    /// URL ↔ path mapping of the site root.
    pub fn site_root(&self) -> Result<SiteRoot, ConfigError> {
        SiteRoot::new(&self.site.root, &self.site.url).map_err(|err| {
            let mut diag = ConfigDiagnostics::new();
            diag.error(FieldPath::new("site.url"), err.to_string());
            ConfigError::Diagnostics(diag)
        })
    }

    /// Declared assets: styles then scripts, each in file order.
    pub fn assets(&self) -> Vec<AssetReference> {
        self.style
            .iter()
            .map(AssetReference::from)
            .chain(self.script.iter().map(AssetReference::from))
            .collect()
    }

    /// The `[unify]` group.
    pub fn group(&self) -> UnificationGroup {
        UnificationGroup::new(&self.unify.id, self.unify.output.clone())
            .minify(self.unify.minify)
            .in_place(self.unify.place)
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}
