//! XDM Item Handles
//!
//! Owned handles onto a finalized document. A handle is a shared pointer
//! to the document plus a position, so handles are cheap to clone and keep
//! their document alive:
//! - [`Node`] - an entry of the node array
//! - [`Attribute`] - an entry of the attribute array
//! - [`NamespaceNode`] - an in-scope binding of an element, or the sole
//!   content of a namespace-only document
//! - [`Item`] - any of the three, totally ordered in document order

mod attribute;
mod axis;
mod item;
mod namespace;
mod node;
mod uri;

use std::fmt;

pub use attribute::Attribute;
pub use axis::{step, AxisIter};
pub use item::Item;
pub use namespace::NamespaceNode;
pub use node::Node;

/// Borrowed qualified name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QNameRef<'a> {
    pub prefix: &'a str,
    pub uri: &'a str,
    pub local: &'a str,
}

impl fmt::Display for QNameRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(self.local)
        } else {
            write!(f, "{}:{}", self.prefix, self.local)
        }
    }
}

/// Non-empty string, or `None`
fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
