//! XPath Navigation
//!
//! The thirteen XPath axes as lazy cursors over a document's arrays, and
//! the node tests that filter what they yield. Item-level iteration lives
//! in [`crate::xdm`].

pub mod axes;

pub use axes::{attributes_of, navigate, AttributeCursor, Axis, NodeCursor};
pub use node_test::{KindTest, NodeTest};
