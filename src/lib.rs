//! Decision-tree navigation core.
//!
//! A named, versioned decision tree ("quiz" or "tree") is parsed and
//! validated from a nested source document, stored in a catalog, and
//! traversed by a [`Session`]: select an answer to move the cursor,
//! rewind to any visited step (discarding everything after it), and
//! land on a terminal node.
//!
//! The crate owns three pieces:
//! - [`authoring`] — source documents and the validating build into
//!   an immutable [`types::TreeDefinition`];
//! - [`catalog`] — the versioned name → definition store
//!   ([`MemoryCatalog`], plus an HTTP-backed `RemoteCatalog` behind
//!   the `remote` feature);
//! - [`session`] — the navigation engine.
//!
//! Rendering and browser automation live elsewhere; the only thing
//! shared with them is the text labels that nodes and choices carry.

pub mod authoring;
pub mod catalog;
#[cfg(feature = "remote")]
pub mod client;
pub mod error;
pub mod events;
pub mod session;
pub mod types;

pub use catalog::{CatalogStore, CatalogSummary, MemoryCatalog};
#[cfg(feature = "remote")]
pub use client::RemoteCatalog;
pub use error::{CatalogError, SessionError, ValidationError};
pub use events::SessionEvent;
pub use session::Session;
pub use types::{
    CatalogEntry, Choice, Feedback, Node, NodeId, ResourceKind, SessionState, Timestamp,
    TreeDefinition, Version,
};
