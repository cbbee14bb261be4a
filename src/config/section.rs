//! Configuration sections of `register.toml`.
//!
//! # Example
//!
//! ```toml
//! [site]
//! root = "."
//! url = "https://example.com/wp-content/themes/twentytwelve/"
//!
//! [unify]
//! id = "UniqueID"
//! place = "admin"
//! output = { styles = "min/css/", scripts = "min/js/" }
//! minify = true
//!
//! [[style]]
//! name = "EditorStyleAdmin"
//! url = "editor-style.css"
//! place = "admin"
//!
//! [[script]]
//! name = "HTML_scriptAdmin"
//! url = "js/html5.js"
//! place = "admin"
//! deps = ["jquery"]
//! footer = true
//! params = { date = "now" }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::asset::{AssetExtra, AssetReference, Placement, ScriptOptions, StyleOptions};
use crate::unify::OutputSpec;

/// `[site]`: where the theme or plugin lives and where it is served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Directory the base URL maps onto (relative to the config file).
    pub root: PathBuf,
    /// Public base URL of `root`.
    pub url: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            url: String::new(),
        }
    }
}

/// `[unify]`: the group to merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifySection {
    /// Name the bundles are registered under.
    pub id: String,
    /// Placement whose assets are collected.
    pub place: Placement,
    /// Output directories, or `false` to keep individual files.
    pub output: OutputSpec,
    pub minify: bool,
}

/// `[[style]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub place: Placement,
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_media")]
    pub media: String,
}

fn default_media() -> String {
    StyleOptions::default().media
}

/// `[[script]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub place: Placement,
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub footer: bool,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl From<&StyleEntry> for AssetReference {
    fn from(entry: &StyleEntry) -> Self {
        Self {
            name: entry.name.clone(),
            url: entry.url.clone(),
            deps: entry.deps.clone(),
            version: entry.version.clone(),
            placement: entry.place,
            extra: AssetExtra::Style(StyleOptions {
                media: entry.media.clone(),
            }),
        }
    }
}

impl From<&ScriptEntry> for AssetReference {
    fn from(entry: &ScriptEntry) -> Self {
        Self {
            name: entry.name.clone(),
            url: entry.url.clone(),
            deps: entry.deps.clone(),
            version: entry.version.clone(),
            placement: entry.place,
            extra: AssetExtra::Script(ScriptOptions {
                footer: entry.footer,
                params: entry.params.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetType;

    #[test]
    fn test_style_entry_defaults() {
        let entry: StyleEntry = toml::from_str(
            r#"
            name = "DefaultStyleAdmin"
            url = "style.css"
            "#,
        )
        .unwrap();
        let asset = AssetReference::from(&entry);
        assert_eq!(asset.kind(), AssetType::Style);
        assert_eq!(asset.placement, Placement::Front);
        assert_eq!(asset.extra, AssetExtra::Style(StyleOptions::default()));
    }

    #[test]
    fn test_script_entry() {
        let entry: ScriptEntry = toml::from_str(
            r#"
            name = "NavigationScriptAdmin"
            url = "js/navigation.js"
            place = "admin"
            deps = ["jquery-effects-core"]
            version = "1.1.3"
            footer = true
            params = { date = "now" }
            "#,
        )
        .unwrap();
        let asset = AssetReference::from(&entry);
        assert_eq!(asset.kind(), AssetType::Script);
        assert_eq!(asset.placement, Placement::Admin);
        assert_eq!(asset.deps, ["jquery-effects-core"]);
        assert_eq!(asset.version.as_deref(), Some("1.1.3"));
        let AssetExtra::Script(opts) = asset.extra else {
            panic!("expected script options");
        };
        assert!(opts.footer);
        assert_eq!(opts.params["date"], "now");
    }

    #[test]
    fn test_entry_requires_name_and_url() {
        assert!(toml::from_str::<StyleEntry>(r#"url = "a.css""#).is_err());
        assert!(toml::from_str::<ScriptEntry>(r#"name = "a""#).is_err());
    }

    #[test]
    fn test_unify_section_defaults_to_disabled() {
        let section: UnifySection = toml::from_str("").unwrap();
        assert!(section.output.is_disabled());
        assert!(!section.minify);
        assert_eq!(section.place, Placement::Front);
    }
}
