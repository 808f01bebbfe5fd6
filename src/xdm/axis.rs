//! Item-level axis iteration
//!
//! Wraps the position cursors of [`crate::xpath::axes`] so they yield owned
//! items, applying the node test before a handle is created.

use super::{Attribute, Item, NamespaceNode, Node};
use crate::dom::{Document, InScopeNamespaces, NodeId};
use crate::xpath::{AttributeCursor, Axis, NodeCursor, NodeTest};

enum Source {
    Empty,
    Nodes(Document, NodeCursor),
    Attributes(Document, AttributeCursor),
    Namespaces(Document, NodeId, InScopeNamespaces),
}

impl Source {
    fn next(&mut self, test: Option<&NodeTest>) -> Option<Item> {
        match self {
            Source::Empty => None,
            Source::Nodes(document, cursor) => {
                let view = document.view();
                while let Some(id) = cursor.next(&view) {
                    if test.is_none_or(|t| t.matches_node(&view, id)) {
                        return Some(Item::Node(Node::new(document.clone(), id)));
                    }
                }
                None
            }
            Source::Attributes(document, cursor) => {
                let view = document.view();
                while let Some(id) = cursor.next(&view) {
                    if test.is_none_or(|t| t.matches_attribute(&view, id)) {
                        return Some(Item::Attribute(Attribute::new(document.clone(), id)));
                    }
                }
                None
            }
            Source::Namespaces(document, owner, walk) => {
                let view = document.view();
                while let Some(binding) = walk.next(&view) {
                    if test.is_none_or(|t| t.matches_namespace(&view, binding.prefix)) {
                        return Some(Item::Namespace(NamespaceNode::new(document.clone(), *owner, binding)));
                    }
                }
                None
            }
        }
    }
}

/// Lazy iterator over the items on one axis
pub struct AxisIter {
    /// Context item still to be yielded by a self-including axis
    pending: Option<Item>,
    source: Source,
    test: Option<NodeTest>,
}

impl AxisIter {
    fn new(pending: Option<Item>, source: Source, test: Option<NodeTest>) -> Self {
        AxisIter { pending, source, test }
    }

    fn empty() -> Self {
        Self::new(None, Source::Empty, None)
    }
}

impl Iterator for AxisIter {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        if let Some(item) = self.pending.take() {
            if self.test.as_ref().is_none_or(|t| t.matches(&item)) {
                return Some(item);
            }
        }
        self.source.next(self.test.as_ref())
    }
}

impl std::fmt::Debug for AxisIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisIter")
            .field("pending", &self.pending)
            .field("test", &self.test)
            .finish_non_exhaustive()
    }
}

pub(super) fn from_node(node: &Node, axis: Axis, test: Option<NodeTest>) -> AxisIter {
    let document = node.document().clone();
    let view = document.view();
    let is_element = view.node(node.id()).is_some_and(|n| n.is_element());
    let source = match axis {
        Axis::Attribute if is_element => Source::Attributes(document.clone(), AttributeCursor::new(&view, node.id())),
        Axis::Namespace if is_element => {
            Source::Namespaces(document.clone(), node.id(), InScopeNamespaces::new(node.id(), true))
        }
        Axis::Attribute | Axis::Namespace => return AxisIter::empty(),
        _ => Source::Nodes(document.clone(), NodeCursor::new(&view, node.id(), axis)),
    };
    AxisIter::new(None, source, test)
}

/// Axes from an attribute or namespace node, relative to its owner
fn from_owned(document: &Document, owner: Option<NodeId>, context: Item, axis: Axis, test: Option<NodeTest>) -> AxisIter {
    let view = document.view();
    let nodes = |cursor: NodeCursor| Source::Nodes(document.clone(), cursor);
    let (pending, source) = match (axis, owner) {
        (Axis::Ancestor, Some(o)) => (None, nodes(NodeCursor::new(&view, o, Axis::AncestorOrSelf))),
        (Axis::AncestorOrSelf, Some(o)) => (Some(context), nodes(NodeCursor::new(&view, o, Axis::AncestorOrSelf))),
        (Axis::Parent, Some(o)) => (None, nodes(NodeCursor::new(&view, o, Axis::Self_))),
        (Axis::Following, Some(o)) => (None, nodes(NodeCursor::following_owner(o))),
        (Axis::Preceding, Some(o)) => (None, nodes(NodeCursor::new(&view, o, Axis::Preceding))),
        (Axis::AncestorOrSelf | Axis::DescendantOrSelf | Axis::Self_, _) => (Some(context), Source::Empty),
        _ => (None, Source::Empty),
    };
    AxisIter::new(pending, source, test)
}

pub(super) fn from_attribute(attr: &Attribute, axis: Axis, test: Option<NodeTest>) -> AxisIter {
    from_owned(attr.document(), attr.owner_id(), Item::Attribute(attr.clone()), axis, test)
}

pub(super) fn from_namespace(ns: &NamespaceNode, axis: Axis, test: Option<NodeTest>) -> AxisIter {
    from_owned(ns.document(), ns.owner_id(), Item::Namespace(ns.clone()), axis, test)
}

/// Apply one axis step to every item, returning the union in document
/// order without duplicates
pub fn step(items: &[Item], axis: Axis, test: Option<&NodeTest>) -> Vec<Item> {
    let mut result: Vec<Item> = items
        .iter()
        .flat_map(|item| item.axis(axis, test.cloned()))
        .collect();
    result.sort_unstable();
    result.dedup();
    result
}
