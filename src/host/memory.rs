//! In-memory registration table.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{HostError, RegistrationHost, SourceFile};
use crate::asset::{AssetReference, AssetType, Placement, SiteRoot};
use crate::debug;
use crate::unify::UnifiedArtifact;

/// An individually registered asset.
#[derive(Debug, Clone)]
struct Entry {
    asset: AssetReference,
    /// Group whose unified artifact currently replaces this entry.
    hidden_by: Option<String>,
}

impl Entry {
    fn is_visible(&self) -> bool {
        self.hidden_by.is_none()
    }
}

/// A group's bundle registration.
#[derive(Debug, Clone)]
struct Unified {
    asset: AssetReference,
    /// Unification was disabled: the originals are back in place and the
    /// bundle is no longer emitted, but the group name stays reserved
    /// until it is removed.
    reverted: bool,
}

/// Registrations of one asset type.
#[derive(Debug, Default)]
struct Table {
    /// Originals, in registration order.
    originals: Vec<Entry>,
    /// Bundle registrations keyed by group id.
    unified: FxHashMap<String, Unified>,
}

impl Table {
    fn active(&self, group: &str) -> Option<&AssetReference> {
        self.unified
            .get(group)
            .filter(|u| !u.reverted)
            .map(|u| &u.asset)
    }

    fn visible(&self, name: &str) -> Option<&AssetReference> {
        self.originals
            .iter()
            .find(|e| e.is_visible() && e.asset.name == name)
            .map(|e| &e.asset)
    }

    fn contains(&self, name: &str) -> bool {
        self.active(name).is_some() || self.visible(name).is_some()
    }

    fn release(&mut self, group: &str) -> bool {
        let mut changed = false;
        for entry in &mut self.originals {
            if entry.hidden_by.as_deref() == Some(group) {
                entry.hidden_by = None;
                changed = true;
            }
        }
        changed
    }
}

/// Thread-safe, ordered in-memory [`RegistrationHost`].
///
/// Source URLs are mapped to files through the [`SiteRoot`] given at
/// construction.
#[derive(Debug)]
pub struct MemoryHost {
    root: SiteRoot,
    tables: RwLock<FxHashMap<AssetType, Table>>,
}

impl MemoryHost {
    pub fn new(root: SiteRoot) -> Self {
        Self {
            root,
            tables: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn root(&self) -> &SiteRoot {
        &self.root
    }

    /// Look up a registration (individual or unified) by name.
    pub fn get(&self, kind: AssetType, name: &str) -> Option<AssetReference> {
        let tables = self.tables.read();
        let table = tables.get(&kind)?;
        table.active(name).or_else(|| table.visible(name)).cloned()
    }

    /// Names currently registered for `kind`: visible originals in
    /// registration order, then unified groups sorted by id.
    pub fn registered(&self, kind: AssetType) -> Vec<String> {
        let tables = self.tables.read();
        let Some(table) = tables.get(&kind) else {
            return Vec::new();
        };
        let mut groups: Vec<_> = table
            .unified
            .iter()
            .filter(|(_, u)| !u.reverted)
            .map(|(group, _)| group.clone())
            .collect();
        groups.sort();
        table
            .originals
            .iter()
            .filter(|e| e.is_visible())
            .map(|e| e.asset.name.clone())
            .chain(groups)
            .collect()
    }
}

impl RegistrationHost for MemoryHost {
    fn add(&self, asset: AssetReference) -> bool {
        if !asset.is_valid() {
            return false;
        }
        let mut tables = self.tables.write();
        let table = tables.entry(asset.kind()).or_default();
        let taken = table.unified.contains_key(&asset.name)
            || table.originals.iter().any(|e| e.asset.name == asset.name);
        if taken {
            return false;
        }
        table.originals.push(Entry {
            asset,
            hidden_by: None,
        });
        true
    }

    fn remove(&self, kind: AssetType, name: &str) -> bool {
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(&kind) else {
            return false;
        };

        // An active bundle stands for the originals it replaced; a reverted
        // one has already handed them back.
        if let Some(unified) = table.unified.remove(name) {
            if !unified.reverted {
                table
                    .originals
                    .retain(|e| e.hidden_by.as_deref() != Some(name));
            }
            return true;
        }

        let before = table.originals.len();
        table
            .originals
            .retain(|e| !(e.is_visible() && e.asset.name == name));
        table.originals.len() != before
    }

    fn is_registered(&self, kind: AssetType, name: &str) -> bool {
        self.tables
            .read()
            .get(&kind)
            .is_some_and(|table| table.contains(name))
    }

    fn list_registered_sources(
        &self,
        group: &str,
        placement: Placement,
        kind: AssetType,
    ) -> Result<Vec<SourceFile>, HostError> {
        let tables = self.tables.read();
        let Some(table) = tables.get(&kind) else {
            return Ok(Vec::new());
        };

        table
            .originals
            .iter()
            .filter(|e| e.asset.placement == placement)
            .filter(|e| e.hidden_by.as_deref().is_none_or(|g| g == group))
            .map(|e| -> Result<SourceFile, HostError> {
                let path =
                    self.root
                        .path_for(&e.asset.url)
                        .ok_or_else(|| HostError::Unresolvable {
                            kind,
                            name: e.asset.name.clone(),
                            url: e.asset.url.clone(),
                        })?;
                Ok(SourceFile {
                    filename: e.asset.filename(),
                    path,
                    asset: e.asset.clone(),
                })
            })
            .collect()
    }

    fn is_unified(&self, kind: AssetType, group: &str) -> bool {
        self.tables
            .read()
            .get(&kind)
            .is_some_and(|table| table.unified.contains_key(group))
    }

    fn register_unified(&self, group: &str, artifact: &UnifiedArtifact) {
        let mut tables = self.tables.write();
        let table = tables.entry(artifact.kind).or_default();

        for entry in &mut table.originals {
            let replaced = artifact.sources.contains(&entry.asset.name);
            if replaced {
                entry.hidden_by = Some(group.to_string());
            } else if entry.hidden_by.as_deref() == Some(group) {
                entry.hidden_by = None;
            }
        }
        table.unified.insert(
            group.to_string(),
            Unified {
                asset: artifact.registration.clone(),
                reverted: false,
            },
        );

        debug!("host"; "{} `{}` replaces {}", artifact.kind, group, artifact.sources.join(", "));
    }

    fn deregister(&self, group: &str, kind: AssetType) -> bool {
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(&kind) else {
            return false;
        };
        let retired = match table.unified.get_mut(group) {
            Some(unified) if !unified.reverted => {
                unified.reverted = true;
                true
            }
            _ => false,
        };
        let restored = table.release(group);
        retired || restored
    }
}
