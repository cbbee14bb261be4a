//! Unification group and output destinations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::UnifyError;
use crate::asset::{AssetType, Placement};

/// Where unified bundles are written.
///
/// In TOML:
///
/// ```toml
/// output = false                                        # Disabled
/// output = "min/"                                       # Shared
/// output = { styles = "min/css/", scripts = "min/js/" } # Split
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawOutput", into = "RawOutput")]
pub enum OutputSpec {
    /// Stop unifying and restore individual registrations.
    #[default]
    Disabled,
    /// One directory for both styles and scripts.
    Shared(PathBuf),
    /// Separate directories per asset type.
    Split { styles: PathBuf, scripts: PathBuf },
}

impl OutputSpec {
    pub fn shared(dir: impl Into<PathBuf>) -> Self {
        Self::Shared(dir.into())
    }

    pub fn split(styles: impl Into<PathBuf>, scripts: impl Into<PathBuf>) -> Self {
        Self::Split {
            styles: styles.into(),
            scripts: scripts.into(),
        }
    }

    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Destination directory for `kind`, `None` when disabled.
    pub fn dir_for(&self, kind: AssetType) -> Option<&Path> {
        match (self, kind) {
            (Self::Disabled, _) => None,
            (Self::Shared(dir), _) => Some(dir),
            (Self::Split { styles, .. }, AssetType::Style) => Some(styles),
            (Self::Split { scripts, .. }, AssetType::Script) => Some(scripts),
        }
    }

    /// Reject empty destination paths.
    pub fn validate(&self) -> Result<(), UnifyError> {
        for kind in AssetType::ALL {
            if let Some(dir) = self.dir_for(kind)
                && dir.as_os_str().is_empty()
            {
                return Err(UnifyError::Config(format!(
                    "empty output directory for {kind}s"
                )));
            }
        }
        Ok(())
    }
}

/// Serialized shape of [`OutputSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawOutput {
    Toggle(bool),
    Shared(PathBuf),
    Split { styles: PathBuf, scripts: PathBuf },
}

impl TryFrom<RawOutput> for OutputSpec {
    type Error = String;

    fn try_from(raw: RawOutput) -> Result<Self, Self::Error> {
        match raw {
            RawOutput::Toggle(false) => Ok(Self::Disabled),
            RawOutput::Toggle(true) => {
                Err("`output = true` needs a directory, e.g. `output = \"min/\"`".into())
            }
            RawOutput::Shared(dir) => Ok(Self::Shared(dir)),
            RawOutput::Split { styles, scripts } => Ok(Self::Split { styles, scripts }),
        }
    }
}

impl From<OutputSpec> for RawOutput {
    fn from(spec: OutputSpec) -> Self {
        match spec {
            OutputSpec::Disabled => Self::Toggle(false),
            OutputSpec::Shared(dir) => Self::Shared(dir),
            OutputSpec::Split { styles, scripts } => Self::Split { styles, scripts },
        }
    }
}

/// A named set of registered assets to merge.
///
/// The group collects every style and script registered in its placement;
/// each non-empty type becomes one bundle registered under `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnificationGroup {
    pub id: String,
    pub output: OutputSpec,
    pub minify: bool,
    pub placement: Placement,
}

impl UnificationGroup {
    pub fn new(id: impl Into<String>, output: OutputSpec) -> Self {
        Self {
            id: id.into(),
            output,
            minify: false,
            placement: Placement::default(),
        }
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn in_place(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}
