//! Asset type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type of a registered asset.
///
/// Unification partitions sources by type, producing one output per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Stylesheet (`.css`).
    Style,
    /// JavaScript (`.js`).
    Script,
}

impl AssetType {
    /// Both types, in the order unification processes them.
    pub const ALL: [Self; 2] = [Self::Style, Self::Script];

    /// File extension of unified output (without dot).
    pub const fn ext(self) -> &'static str {
        match self {
            Self::Style => "css",
            Self::Script => "js",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Script => "script",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "style" | "styles" | "css" => Ok(Self::Style),
            "script" | "scripts" | "js" => Ok(Self::Script),
            other => Err(format!("unknown asset type `{other}`")),
        }
    }
}
