//! HTML asset tags with deferred placeholder substitution.
//!
//! Views register CSS and JavaScript files while they render and reserve the
//! spot where a group's tags belong via a placeholder. Once the outermost view
//! has finished, the controller flushes the registry over the full page and
//! every placeholder is replaced by the tags of its group.
//!
//! The placeholder is the literal text `<!-- assets="<group>" -->`. Replacement
//! is plain text substitution, so page content that happens to contain the
//! same comment is replaced too.
//!
//! ## Key Types
//!
//! - [`Asset`]: one file with its URI, attributes, order and group
//! - [`Assets`]: the registry, keyed by file
//! - [`AssetsHandler`]: hook to filter or reorder assets before a flush

mod asset;
mod registry;

pub use asset::{Asset, DEFAULT_ASSET_GROUP};
pub use registry::{placeholder, Assets, AssetsHandler};
