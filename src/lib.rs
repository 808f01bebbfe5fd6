//! FastXDM - Compact preorder XML document model
//!
//! Documents are built from a stream of tree events into three flat arrays
//! (nodes, attributes, namespaces) laid out in document order. Nesting is
//! encoded by depth alone; sibling links allow subtrees to be skipped.
//! Finalized documents are immutable and shared, and every XPath axis runs
//! as a small cursor over the arrays.
//!
//! Layers:
//! - `dom` - record arrays, string interning, the builder
//! - `sax` - the event protocol, replay and sequence building
//! - `xpath` - axis cursors and node tests
//! - `xdm` - owned item handles and document order
//! - `cache` - LRU cache of resolved documents
//! - `strategy` - parallel axis steps (feature `parallel`)
//!
//! ```
//! use fastxdm::{Axis, Builder, Event, NodeTest};
//!
//! let doc = Builder::from_events(&[
//!     Event::start_element("", "", "root"),
//!     Event::attribute("", "", "id", "1"),
//!     Event::text("hello"),
//!     Event::end_element("", "", "root"),
//! ])
//! .unwrap();
//!
//! let root = doc.root().unwrap();
//! assert_eq!(root.string_value(), "hello");
//! let ids: Vec<String> = root
//!     .axis(Axis::Attribute, Some(NodeTest::attribute(None, Some("id"))))
//!     .map(|item| item.string_value())
//!     .collect();
//! assert_eq!(ids, ["1"]);
//! ```

pub mod cache;
pub mod config;
pub mod dom;
pub mod error;
pub mod sax;
#[cfg(feature = "parallel")]
pub mod strategy;
pub mod xdm;
pub mod xpath;

#[cfg(test)]
mod testing;

pub use cache::DocumentCache;
pub use config::{BuilderConfig, EventOptions};
pub use dom::{Builder, Document, DocumentView, NodeKind};
pub use error::{BuildError, NameTestError};
pub use sax::{replay, Event, EventCollector, EventHandler, SequenceBuilder, TypeRef};
pub use xdm::{Attribute, AxisIter, Item, NamespaceNode, Node, QNameRef};
pub use xpath::{Axis, KindTest, NodeTest};
