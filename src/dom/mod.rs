//! DOM Module - Flat Preorder Document Storage
//!
//! Implements the compact document representation:
//! - Three flat record arrays (nodes, attributes, namespaces) in preorder
//! - `u32` positions for every cross-record reference
//! - Depth-encoded topology with O(1) subtree skipping via sibling links
//! - String interning for names, URIs and values

pub mod builder;
pub mod document;
pub mod namespace;
pub mod record;
pub mod strings;

pub use builder::Builder;
pub use document::{Document, DocumentView};
pub use namespace::{ns, Binding, InScopeNamespaces};
pub use record::{
    AttrId, AttributeRecord, NamespaceRecord, NodeData, NodeId, NodeKind, NodeRecord, NsId, QName, TypeName,
};
pub use strings::{StrId, StringPool};
