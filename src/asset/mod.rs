//! Asset declarations, path mapping and minification.

mod kind;
mod meta;
pub mod minify;
mod route;

// Types
pub use kind::AssetType;
pub use meta::{AssetExtra, AssetReference, Placement, ScriptOptions, StyleOptions, filename_of};
pub use route::SiteRoot;
