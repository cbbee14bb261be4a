//! Register - merge a theme's registered styles and scripts into
//! fingerprinted bundles, one per asset type.

pub mod asset;
pub mod cli;
pub mod config;
pub mod host;
pub mod logger;
pub mod register;
pub mod unify;
pub mod utils;

pub use asset::{AssetReference, AssetType, Placement, SiteRoot};
pub use host::{MemoryHost, RegistrationHost};
pub use register::Register;
pub use unify::{OutputSpec, UnificationGroup, Unifier, UnifyError, UnifyReport};
