//! Registration host: the asset table unification reads from and writes to.
//!
//! The host owns every registration. The unifier only asks it for the
//! sources of a group and tells it to swap them for a unified artifact
//! (or to swap back), so any platform's asset queue can sit behind
//! [`RegistrationHost`]. [`MemoryHost`] is the bundled implementation.

mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::asset::{AssetReference, AssetType, Placement};
use crate::unify::UnifiedArtifact;

pub use memory::MemoryHost;

/// A registered source file, resolved to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Decoded last URL segment, used for fingerprinting.
    pub filename: String,
    /// Absolute path of the file to read.
    pub path: PathBuf,
    /// The registration this file came from.
    pub asset: AssetReference,
}

/// Host-side failures.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("cannot map {kind} `{name}` ({url}) to a file under the site root")]
    Unresolvable {
        kind: AssetType,
        name: String,
        url: String,
    },
}

/// Asset registration store.
///
/// Implementations use interior mutability so one host can be shared by
/// several unifiers across threads.
pub trait RegistrationHost: Send + Sync {
    /// Register an asset. Returns false if it is invalid or its name is taken.
    fn add(&self, asset: AssetReference) -> bool;

    /// Remove a registration by name. Returns whether anything was removed.
    ///
    /// A group's bundle registration can be removed even after
    /// [`RegistrationHost::deregister`] reverted it.
    fn remove(&self, kind: AssetType, name: &str) -> bool;

    /// Whether `name` is currently registered as an individual or unified asset.
    fn is_registered(&self, kind: AssetType, name: &str) -> bool;

    /// Sources belonging to `group`, in registration order.
    ///
    /// These are the assets of `kind` placed in `placement` that are either
    /// individually registered or already replaced by this group's artifact.
    fn list_registered_sources(
        &self,
        group: &str,
        placement: Placement,
        kind: AssetType,
    ) -> Result<Vec<SourceFile>, HostError>;

    /// Whether `group` holds a bundle registration for `kind`, active or reverted.
    fn is_unified(&self, kind: AssetType, group: &str) -> bool;

    /// Replace the artifact's sources with its unified registration.
    fn register_unified(&self, group: &str, artifact: &UnifiedArtifact);

    /// Stop emitting the group's bundle for `kind` and restore the originals
    /// it replaced. The group name stays reserved until removed. Returns
    /// whether anything changed.
    fn deregister(&self, group: &str, kind: AssetType) -> bool;
}
