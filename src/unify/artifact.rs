//! Unified artifacts and their merged registration.

use std::path::PathBuf;

use serde::Serialize;

use crate::asset::{AssetExtra, AssetReference, AssetType, ScriptOptions, StyleOptions};
use crate::host::SourceFile;

use super::UnificationGroup;

/// One bundle written by a unify call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedArtifact {
    pub kind: AssetType,
    /// Hex SHA-1 of the ordered source filenames; the output file stem.
    pub fingerprint: String,
    /// Absolute path of `<dir>/<fingerprint>.<ext>`.
    pub path: PathBuf,
    pub url: String,
    /// Names of the registrations the bundle replaces, in order.
    pub sources: Vec<String>,
    /// Filenames the fingerprint was computed from, in order.
    pub filenames: Vec<String>,
    /// Whether the written content is minified.
    pub minified: bool,
    /// Registration that replaces the sources in the host.
    pub registration: AssetReference,
}

/// Build the registration for a bundle from the registrations it replaces.
///
/// - deps: union of the sources' deps in order, minus the sources themselves
/// - version: first 8 chars of the fingerprint
/// - styles: shared media query, or `all` if they differ
/// - scripts: footer only if every source is in the footer; params merged,
///   later sources winning
pub(crate) fn merged_registration(
    group: &UnificationGroup,
    kind: AssetType,
    sources: &[SourceFile],
    url: &str,
    fingerprint: &str,
) -> AssetReference {
    let own: Vec<&str> = sources.iter().map(|s| s.asset.name.as_str()).collect();

    let mut deps: Vec<String> = Vec::new();
    for dep in sources.iter().flat_map(|s| &s.asset.deps) {
        if dep != &group.id && !own.contains(&dep.as_str()) && !deps.contains(dep) {
            deps.push(dep.clone());
        }
    }

    let extra = match kind {
        AssetType::Style => {
            let mut media = sources.iter().filter_map(|s| match &s.asset.extra {
                AssetExtra::Style(opts) => Some(opts.media.as_str()),
                AssetExtra::Script(_) => None,
            });
            let first = media.next().unwrap_or("all");
            let media = if media.all(|m| m == first) { first } else { "all" };
            AssetExtra::Style(StyleOptions {
                media: media.to_string(),
            })
        }
        AssetType::Script => {
            let mut opts = ScriptOptions {
                footer: true,
                ..ScriptOptions::default()
            };
            for source in sources {
                if let AssetExtra::Script(src) = &source.asset.extra {
                    opts.footer &= src.footer;
                    opts.params
                        .extend(src.params.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
            AssetExtra::Script(opts)
        }
    };

    AssetReference {
        name: group.id.clone(),
        url: url.to_string(),
        deps,
        version: Some(fingerprint.chars().take(8).collect()),
        placement: group.placement,
        extra,
    }
}
