//! Asset unification: merge a group's registered styles and scripts into one
//! fingerprinted bundle per type.
//!
//! For each asset type with registered sources in the group's placement:
//!
//! 1. read every source file in registration order (any failure aborts the type)
//! 2. concatenate the raw bytes, optionally minify
//! 3. name the bundle `sha1(filename₁ filename₂ …).<ext>`
//! 4. write it atomically into the type's output directory
//! 5. swap the source registrations for one registration under the group id
//!
//! The fingerprint covers filenames only. Editing a source without renaming
//! it regenerates the same path with new content, so URLs stay stable across
//! content changes.

mod artifact;
mod group;
mod writer;


use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use crate::asset::{AssetType, SiteRoot, minify::minify_by_type};
use crate::host::{HostError, RegistrationHost, SourceFile};
use crate::utils::hash;
use crate::utils::path::display_relative;
use crate::{debug, log};

pub use artifact::UnifiedArtifact;
pub use group::{OutputSpec, UnificationGroup};
pub use writer::write_atomic;

/// Unification failures.
///
/// Bundles already written for another type in the same call are kept;
/// the failing type leaves no partial output behind.
#[derive(Debug, Error)]
pub enum UnifyError {
    #[error("invalid output configuration: {0}")]
    Config(String),

    #[error("cannot create output directory `{0}`")]
    OutputDir(PathBuf, #[source] io::Error),

    #[error("cannot write unified file `{0}`")]
    Write(PathBuf, #[source] io::Error),

    #[error("cannot read {kind} source `{name}` at `{path}`")]
    Source {
        kind: AssetType,
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Outcome of a successful unify call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnifyReport {
    pub group: String,
    /// Bundles written and registered.
    pub artifacts: Vec<UnifiedArtifact>,
    /// Types with no registered sources (nothing written).
    pub skipped: Vec<AssetType>,
    /// Types whose unified registration was dropped (disabled output).
    pub reverted: Vec<AssetType>,
}

impl UnifyReport {
    fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            ..Self::default()
        }
    }

    pub fn artifact(&self, kind: AssetType) -> Option<&UnifiedArtifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

/// Resolved destination for one asset type.
struct Target {
    dir: PathBuf,
    /// Directory URL with trailing slash.
    url: String,
}

/// Merges registered assets into bundles and swaps registrations on the host.
///
/// Calls for the same group id are serialized; different groups run
/// concurrently.
pub struct Unifier<H> {
    host: H,
    root: SiteRoot,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<H: RegistrationHost> Unifier<H> {
    pub fn new(host: H, root: SiteRoot) -> Self {
        Self {
            host,
            root,
            locks: DashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn root(&self) -> &SiteRoot {
        &self.root
    }

    /// Unify the group's registered assets, or revert a previous unification
    /// when its output is [`OutputSpec::Disabled`].
    pub fn unify(&self, group: &UnificationGroup) -> Result<UnifyReport, UnifyError> {
        if group.id.trim().is_empty() {
            return Err(UnifyError::Config("group id must not be empty".into()));
        }

        let lock = Arc::clone(&self.locks.entry(group.id.clone()).or_default());
        let result = {
            let _guard = lock.lock();
            self.unify_locked(group)
        };

        // Drop the group's lock once no other call is waiting on it.
        drop(lock);
        self.locks
            .remove_if(&group.id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    fn unify_locked(&self, group: &UnificationGroup) -> Result<UnifyReport, UnifyError> {
        if group.output.is_disabled() {
            return Ok(self.revert(group));
        }

        // Resolve every destination and source list before touching the filesystem.
        group.output.validate()?;
        let mut plan = Vec::with_capacity(AssetType::ALL.len());
        for kind in AssetType::ALL {
            let target = self.target(group, kind)?;
            let sources = self
                .host
                .list_registered_sources(&group.id, group.placement, kind)?;
            self.check_name(group, kind, &sources)?;
            plan.push((kind, target, sources));
        }

        let mut report = UnifyReport::new(&group.id);
        for (kind, target, sources) in plan {
            if sources.is_empty() {
                debug!("unify"; "no {}s registered for `{}`", kind, group.id);
                report.skipped.push(kind);
                continue;
            }
            let artifact = self.unify_kind(group, kind, &target, &sources)?;
            report.artifacts.push(artifact);
        }
        Ok(report)
    }

    /// The group id becomes a registration name: it must not shadow an
    /// unrelated asset of the same type.
    fn check_name(
        &self,
        group: &UnificationGroup,
        kind: AssetType,
        sources: &[SourceFile],
    ) -> Result<(), UnifyError> {
        let taken = !sources.is_empty()
            && self.host.is_registered(kind, &group.id)
            && !self.host.is_unified(kind, &group.id)
            && !sources.iter().any(|s| s.asset.name == group.id);
        if taken {
            return Err(UnifyError::Config(format!(
                "group id `{}` is already registered as another {kind}",
                group.id
            )));
        }
        Ok(())
    }

    fn revert(&self, group: &UnificationGroup) -> UnifyReport {
        let mut report = UnifyReport::new(&group.id);
        for kind in AssetType::ALL {
            if self.host.deregister(&group.id, kind) {
                log!("unify"; "{} `{}` reverted to individual files", kind, group.id);
                report.reverted.push(kind);
            }
        }
        report
    }

    fn target(&self, group: &UnificationGroup, kind: AssetType) -> Result<Target, UnifyError> {
        let dir = group
            .output
            .dir_for(kind)
            .map(|dir| self.root.resolve_dir(dir))
            .ok_or_else(|| UnifyError::Config(format!("no output directory for {kind}s")))?;
        let url = self.root.dir_url_for(&dir).ok_or_else(|| {
            UnifyError::Config(format!(
                "output directory `{}` is outside the site root `{}`",
                dir.display(),
                self.root.dir().display()
            ))
        })?;
        Ok(Target { dir, url })
    }

    fn unify_kind(
        &self,
        group: &UnificationGroup,
        kind: AssetType,
        target: &Target,
        sources: &[SourceFile],
    ) -> Result<UnifiedArtifact, UnifyError> {
        let raw = concat_sources(kind, sources)?;
        let filenames: Vec<String> = sources.iter().map(|s| s.filename.clone()).collect();
        let fingerprint = hash::fingerprint(&filenames);

        let (content, minified) = if group.minify {
            minify_bundle(kind, raw)
        } else {
            (raw, false)
        };

        let file_name = format!("{fingerprint}.{}", kind.ext());
        let path = target.dir.join(&file_name);
        writer::write_atomic(&path, &content)?;

        let url = format!("{}{file_name}", target.url);
        let registration =
            artifact::merged_registration(group, kind, sources, &url, &fingerprint);
        let artifact = UnifiedArtifact {
            kind,
            fingerprint,
            path,
            url,
            sources: sources.iter().map(|s| s.asset.name.clone()).collect(),
            filenames,
            minified,
            registration,
        };
        self.host.register_unified(&group.id, &artifact);

        log!(
            "unify"; "{} `{}` <- {} ({} files{})",
            kind,
            group.id,
            display_relative(&artifact.path, self.root.dir()),
            artifact.sources.len(),
            if minified { ", minified" } else { "" }
        );
        Ok(artifact)
    }
}

/// Read and concatenate sources in order. Fails on the first unreadable file.
fn concat_sources(kind: AssetType, sources: &[SourceFile]) -> Result<Vec<u8>, UnifyError> {
    let mut content = Vec::new();
    for source in sources {
        let bytes = fs::read(&source.path).map_err(|err| UnifyError::Source {
            kind,
            name: source.asset.name.clone(),
            path: source.path.clone(),
            source: err,
        })?;
        content.extend_from_slice(&bytes);
    }
    Ok(content)
}

/// Minify a bundle, keeping the raw bytes when that is not possible.
fn minify_bundle(kind: AssetType, raw: Vec<u8>) -> (Vec<u8>, bool) {
    let Ok(text) = std::str::from_utf8(&raw) else {
        log!("minify"; "{} bundle is not UTF-8, writing it unminified", kind);
        return (raw, false);
    };
    match minify_by_type(kind, text) {
        Ok(minified) => (minified.into_bytes(), true),
        Err(err) => {
            log!("minify"; "{}, writing it unminified", err);
            (raw, false)
        }
    }
}
