//! Asset declarations.
//!
//! An [`AssetReference`] is what a caller registers: a named URL plus typed,
//! per-type options. Options that only make sense for one asset type live in
//! [`StyleOptions`] or [`ScriptOptions`], so the type is always derivable
//! from the reference itself.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use super::AssetType;

/// Context an asset is emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Administration screens.
    Admin,
    /// Public-facing pages.
    #[default]
    Front,
}

/// Stylesheet options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    /// Media query the stylesheet applies to (e.g. `all`, `print`).
    pub media: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self { media: "all".into() }
    }
}

/// Script options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    /// Emit before the closing body tag instead of in the head.
    pub footer: bool,
    /// Inline parameters injected alongside the script.
    pub params: BTreeMap<String, String>,
}

/// Type-specific options. The variant determines the asset type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetExtra {
    Style(StyleOptions),
    Script(ScriptOptions),
}

/// A declared style or script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    /// Unique id within its asset type.
    pub name: String,
    /// Source location (absolute, or relative to the site root URL).
    pub url: String,
    /// Names of assets this one depends on.
    pub deps: Vec<String>,
    pub version: Option<String>,
    pub placement: Placement,
    pub extra: AssetExtra,
}

impl AssetReference {
    /// Declare a stylesheet with default options.
    pub fn style(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, url, AssetExtra::Style(StyleOptions::default()))
    }

    /// Declare a script with default options.
    pub fn script(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, url, AssetExtra::Script(ScriptOptions::default()))
    }

    fn new(name: impl Into<String>, url: impl Into<String>, extra: AssetExtra) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            deps: Vec::new(),
            version: None,
            placement: Placement::default(),
            extra,
        }
    }

    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn in_place(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the media query. No effect on scripts.
    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        if let AssetExtra::Style(opts) = &mut self.extra {
            opts.media = media.into();
        }
        self
    }

    /// Place the script in the footer. No effect on styles.
    pub fn in_footer(mut self, footer: bool) -> Self {
        if let AssetExtra::Script(opts) = &mut self.extra {
            opts.footer = footer;
        }
        self
    }

    /// Add an inline parameter. No effect on styles.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let AssetExtra::Script(opts) = &mut self.extra {
            opts.params.insert(key.into(), value.into());
        }
        self
    }

    pub const fn kind(&self) -> AssetType {
        match self.extra {
            AssetExtra::Style(_) => AssetType::Style,
            AssetExtra::Script(_) => AssetType::Script,
        }
    }

    /// Last path segment of the URL, percent-decoded.
    ///
    /// Query strings and fragments are ignored:
    /// `https://example.com/js/html5.js?ver=3` -> `html5.js`.
    pub fn filename(&self) -> String {
        filename_of(&self.url)
    }

    /// Check required fields are present.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.url.trim().is_empty() && !self.filename().is_empty()
    }
}

/// Extract the decoded filename from a URL or URL path.
pub fn filename_of(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_extra() {
        assert_eq!(AssetReference::style("a", "a.css").kind(), AssetType::Style);
        assert_eq!(AssetReference::script("b", "b.js").kind(), AssetType::Script);
    }

    #[test]
    fn test_filename() {
        let asset = AssetReference::script("nav", "https://example.com/theme/js/navigation.js");
        assert_eq!(asset.filename(), "navigation.js");

        assert_eq!(filename_of("https://example.com/js/html5.js?ver=3"), "html5.js");
        assert_eq!(filename_of("style.css#top"), "style.css");
        assert_eq!(filename_of("css/my%20style.css"), "my style.css");
        assert_eq!(filename_of("https://example.com/dir/"), "");
    }

    #[test]
    fn test_type_specific_setters() {
        let style = AssetReference::style("s", "s.css")
            .with_media("print")
            .in_footer(true)
            .with_param("k", "v");
        assert_eq!(
            style.extra,
            AssetExtra::Style(StyleOptions {
                media: "print".into()
            })
        );

        let script = AssetReference::script("j", "j.js")
            .with_media("print")
            .in_footer(true)
            .with_param("date", "now");
        let AssetExtra::Script(opts) = &script.extra else {
            panic!("expected script options");
        };
        assert!(opts.footer);
        assert_eq!(opts.params.get("date").map(String::as_str), Some("now"));
    }

    #[test]
    fn test_is_valid() {
        assert!(AssetReference::style("a", "a.css").is_valid());
        assert!(!AssetReference::style("", "a.css").is_valid());
        assert!(!AssetReference::style("a", "  ").is_valid());
        assert!(!AssetReference::style("a", "https://example.com/").is_valid());
    }
}
