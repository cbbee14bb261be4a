//! Boolean facade over a registration host and its unifier.
//!
//! Mirrors the call shape theme and plugin code expects: every operation
//! answers yes or no, and failures are logged instead of returned.
//!
//! ```ignore
//! let register = Register::new(MemoryHost::new(root.clone()), root);
//! register.add(AssetReference::style("main", "style.css"));
//! register.unify("UniqueID", OutputSpec::shared("min/"), true);
//! assert!(register.is_added(AssetType::Style, "UniqueID"));
//! ```

use crate::asset::{AssetReference, AssetType, Placement, SiteRoot};
use crate::host::RegistrationHost;
use crate::log;
use crate::unify::{OutputSpec, UnificationGroup, Unifier, UnifyReport};

pub struct Register<H> {
    unifier: Unifier<H>,
    placement: Placement,
}

impl<H: RegistrationHost> Register<H> {
    pub fn new(host: H, root: SiteRoot) -> Self {
        Self {
            unifier: Unifier::new(host, root),
            placement: Placement::default(),
        }
    }

    /// Placement whose assets `unify` collects.
    pub fn in_place(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn host(&self) -> &H {
        self.unifier.host()
    }

    pub fn unifier(&self) -> &Unifier<H> {
        &self.unifier
    }

    /// Register a style or script.
    pub fn add(&self, asset: AssetReference) -> bool {
        let (kind, name) = (asset.kind(), asset.name.clone());
        let added = self.host().add(asset);
        if !added {
            log!("register"; "{} `{}` rejected: invalid or already registered", kind, name);
        }
        added
    }

    pub fn remove(&self, kind: AssetType, name: &str) -> bool {
        self.host().remove(kind, name)
    }

    pub fn is_added(&self, kind: AssetType, name: &str) -> bool {
        self.host().is_registered(kind, name)
    }

    /// Unify every registered asset of this register's placement under `id`.
    ///
    /// [`OutputSpec::Disabled`] reverts a previous call. Returns false when
    /// nothing usable was produced.
    pub fn unify(&self, id: &str, output: OutputSpec, minify: bool) -> bool {
        self.try_unify(id, output, minify).is_some()
    }

    /// Like [`Register::unify`], keeping the report on success.
    pub fn try_unify(&self, id: &str, output: OutputSpec, minify: bool) -> Option<UnifyReport> {
        let group = UnificationGroup::new(id, output)
            .minify(minify)
            .in_place(self.placement);
        match self.unifier.unify(&group) {
            Ok(report) => Some(report),
            Err(err) => {
                log!("error"; "unify `{}` failed: {}", id, error_chain(&err));
                None
            }
        }
    }
}

/// Render an error with its sources, `outer: inner: root`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
