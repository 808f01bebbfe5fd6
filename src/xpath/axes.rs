//! XPath Axes Implementation
//!
//! Every axis over the node array is a small cursor: a state machine that
//! holds only its current position and steps by array arithmetic. Depth
//! encodes the tree, so no parent or child links are stored:
//! - child, parent, self
//! - descendant, descendant-or-self
//! - ancestor, ancestor-or-self
//! - following, following-sibling
//! - preceding, preceding-sibling
//!
//! Attribute runs get their own cursor. The namespace axis is computed by
//! [`InScopeNamespaces`](crate::dom::InScopeNamespaces).
//!
//! Cursors read through a [`DocumentView`], so they work the same on a
//! builder's arrays and on a finalized document.

use crate::dom::{AttrId, DocumentView, NodeId};

/// XPath axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    Self_,
    Attribute,
    Namespace,
}

impl Axis {
    /// All axes, in declaration order
    pub const ALL: [Axis; 13] = [
        Axis::Child,
        Axis::Descendant,
        Axis::DescendantOrSelf,
        Axis::Parent,
        Axis::Ancestor,
        Axis::AncestorOrSelf,
        Axis::FollowingSibling,
        Axis::PrecedingSibling,
        Axis::Following,
        Axis::Preceding,
        Axis::Self_,
        Axis::Attribute,
        Axis::Namespace,
    ];

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "child" => Some(Axis::Child),
            "descendant" => Some(Axis::Descendant),
            "descendant-or-self" => Some(Axis::DescendantOrSelf),
            "parent" => Some(Axis::Parent),
            "ancestor" => Some(Axis::Ancestor),
            "ancestor-or-self" => Some(Axis::AncestorOrSelf),
            "following-sibling" => Some(Axis::FollowingSibling),
            "preceding-sibling" => Some(Axis::PrecedingSibling),
            "following" => Some(Axis::Following),
            "preceding" => Some(Axis::Preceding),
            "self" => Some(Axis::Self_),
            "attribute" => Some(Axis::Attribute),
            "namespace" => Some(Axis::Namespace),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Following => "following",
            Axis::Preceding => "preceding",
            Axis::Self_ => "self",
            Axis::Attribute => "attribute",
            Axis::Namespace => "namespace",
        }
    }

    /// Whether the axis yields nodes in reverse document order
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent | Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling | Axis::Preceding
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeStep {
    Done,
    Once(NodeId),
    /// Follow sibling links starting at the given node
    Siblings(Option<NodeId>),
    /// Next candidate position and the context depth
    Descendants { pos: NodeId, depth: u32 },
    /// Last ancestor yielded (or the context)
    Ancestors(NodeId),
    /// Last position examined and the context depth
    PrecedingSiblings { pos: NodeId, depth: u32 },
    /// Next candidate position
    Following(NodeId),
    /// Last position examined and the depth of the next ancestor to skip
    Preceding { pos: NodeId, ancestor_depth: u32 },
}

/// Lazy cursor over one axis of the node array
#[derive(Debug, Clone)]
pub struct NodeCursor {
    /// Context node still to be yielded by an `-or-self` axis
    pending: Option<NodeId>,
    step: NodeStep,
}

impl NodeCursor {
    /// A cursor that yields nothing
    pub fn empty() -> Self {
        NodeCursor {
            pending: None,
            step: NodeStep::Done,
        }
    }

    /// Start an axis at a context node. The attribute and namespace axes
    /// never yield entries of the node array, so their cursors are empty.
    pub fn new(view: &DocumentView<'_>, context: NodeId, axis: Axis) -> Self {
        let node = match view.node(context) {
            Some(node) if !node.is_marker() => node,
            _ => return Self::empty(),
        };

        let step = match axis {
            Axis::Child if node.is_container() => NodeStep::Siblings(first_child(view, context)),
            Axis::Descendant | Axis::DescendantOrSelf if node.is_container() => NodeStep::Descendants {
                pos: context + 1,
                depth: node.depth,
            },
            Axis::Parent => view.parent(context).map_or(NodeStep::Done, NodeStep::Once),
            Axis::Ancestor | Axis::AncestorOrSelf => NodeStep::Ancestors(context),
            Axis::FollowingSibling => NodeStep::Siblings(node.next_sibling),
            Axis::PrecedingSibling if node.depth > 0 => NodeStep::PrecedingSiblings {
                pos: context,
                depth: node.depth,
            },
            Axis::Following => NodeStep::Following(following_start(view, context)),
            Axis::Preceding if node.depth > 0 => NodeStep::Preceding {
                pos: context,
                ancestor_depth: node.depth - 1,
            },
            Axis::Self_ => NodeStep::Once(context),
            _ => NodeStep::Done,
        };

        let pending = matches!(axis, Axis::DescendantOrSelf | Axis::AncestorOrSelf).then_some(context);
        NodeCursor { pending, step }
    }

    /// Every node after `owner` in document order, descendants included.
    /// This is the following axis of an attribute or namespace node.
    pub fn following_owner(owner: NodeId) -> Self {
        NodeCursor {
            pending: None,
            step: NodeStep::Following(owner + 1),
        }
    }

    /// Advance to the next node on the axis
    pub fn next(&mut self, view: &DocumentView<'_>) -> Option<NodeId> {
        if let Some(context) = self.pending.take() {
            return Some(context);
        }

        match self.step {
            NodeStep::Done => None,
            NodeStep::Once(id) => {
                self.step = NodeStep::Done;
                Some(id)
            }
            NodeStep::Siblings(next) => {
                let id = next?;
                self.step = NodeStep::Siblings(view.node(id).and_then(|n| n.next_sibling));
                Some(id)
            }
            NodeStep::Descendants { pos, depth } => match view.node(pos) {
                Some(node) if !node.is_marker() && node.depth > depth => {
                    self.step = NodeStep::Descendants { pos: pos + 1, depth };
                    Some(pos)
                }
                _ => self.finish(),
            },
            NodeStep::Ancestors(current) => match view.parent(current) {
                Some(parent) => {
                    self.step = NodeStep::Ancestors(parent);
                    Some(parent)
                }
                None => self.finish(),
            },
            NodeStep::PrecedingSiblings { mut pos, depth } => loop {
                if pos == 0 {
                    return self.finish();
                }
                pos -= 1;
                let d = view.nodes()[pos as usize].depth;
                if d > depth {
                    continue;
                }
                if d < depth {
                    return self.finish();
                }
                self.step = NodeStep::PrecedingSiblings { pos, depth };
                return Some(pos);
            },
            NodeStep::Following(pos) => match view.node(pos) {
                Some(node) if !node.is_marker() => {
                    self.step = NodeStep::Following(pos + 1);
                    Some(pos)
                }
                _ => self.finish(),
            },
            NodeStep::Preceding {
                mut pos,
                mut ancestor_depth,
            } => loop {
                if pos == 0 {
                    return self.finish();
                }
                pos -= 1;
                let d = view.nodes()[pos as usize].depth;
                if d == ancestor_depth {
                    // an ancestor of the context; nothing precedes the root
                    if ancestor_depth == 0 {
                        return self.finish();
                    }
                    ancestor_depth -= 1;
                    continue;
                }
                self.step = NodeStep::Preceding { pos, ancestor_depth };
                return Some(pos);
            },
        }
    }

    fn finish(&mut self) -> Option<NodeId> {
        self.step = NodeStep::Done;
        None
    }
}

fn first_child(view: &DocumentView<'_>, id: NodeId) -> Option<NodeId> {
    let depth = view.node(id)?.depth;
    let next = id + 1;
    view.node(next)
        .filter(|n| !n.is_marker() && n.depth == depth + 1)
        .map(|_| next)
}

/// First node after the subtree of `id`
fn following_start(view: &DocumentView<'_>, id: NodeId) -> NodeId {
    let Some(node) = view.node(id) else {
        return id;
    };
    if let Some(next) = node.next_sibling {
        return next;
    }
    let mut pos = id + 1;
    while view.node(pos).is_some_and(|n| !n.is_marker() && n.depth > node.depth) {
        pos += 1;
    }
    pos
}

/// Lazy cursor over the attribute run of an element
#[derive(Debug, Clone)]
pub struct AttributeCursor {
    owner: NodeId,
    next: Option<AttrId>,
}

impl AttributeCursor {
    pub fn new(view: &DocumentView<'_>, owner: NodeId) -> Self {
        AttributeCursor {
            owner,
            next: view.node(owner).and_then(|n| n.first_attribute()),
        }
    }

    pub fn next(&mut self, view: &DocumentView<'_>) -> Option<AttrId> {
        let id = self.next?;
        match view.attribute(id) {
            Some(attr) if attr.owner == Some(self.owner) => {
                self.next = Some(id + 1);
                Some(id)
            }
            _ => {
                self.next = None;
                None
            }
        }
    }
}

/// Navigate along an axis from a context node, collecting node positions.
///
/// Attribute and namespace nodes live outside the node array, so those two
/// axes yield nothing here.
pub fn navigate(view: &DocumentView<'_>, context: NodeId, axis: Axis) -> Vec<NodeId> {
    let mut cursor = NodeCursor::new(view, context, axis);
    std::iter::from_fn(|| cursor.next(view)).collect()
}

/// Collect the attribute positions of an element
pub fn attributes_of(view: &DocumentView<'_>, owner: NodeId) -> Vec<AttrId> {
    let mut cursor = AttributeCursor::new(view, owner);
    std::iter::from_fn(|| cursor.next(view)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Builder, Document};
    use crate::sax::{replay, Event, EventHandler};
    use crate::testing::{arb_document, element_ids};
    use proptest::prelude::*;

    // 0 doc
    // 1   root a="1"
    // 2     child
    // 3     text
    fn scenario_a() -> Document {
        Builder::from_events(&[
            Event::start_document("", ""),
            Event::start_element("", "", "root"),
            Event::attribute("", "", "a", "1"),
            Event::start_element("", "", "child"),
            Event::end_element("", "", "child"),
            Event::text("text"),
            Event::end_element("", "", "root"),
            Event::end_document(),
        ])
        .unwrap()
    }

    // 0 doc
    // 1   a
    // 2     b
    // 3       c
    // 4       d
    // 5     e
    // 6       f
    // 7     g
    fn wide() -> Document {
        Builder::from_events(&[
            Event::start_document("", ""),
            Event::start_element("", "", "a"),
            Event::start_element("", "", "b"),
            Event::start_element("", "", "c"),
            Event::end_element("", "", "c"),
            Event::start_element("", "", "d"),
            Event::end_element("", "", "d"),
            Event::end_element("", "", "b"),
            Event::start_element("", "", "e"),
            Event::start_element("", "", "f"),
            Event::end_element("", "", "f"),
            Event::end_element("", "", "e"),
            Event::start_element("", "", "g"),
            Event::end_element("", "", "g"),
            Event::end_element("", "", "a"),
            Event::end_document(),
        ])
        .unwrap()
    }

    #[test]
    fn test_axis_names() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_name(axis.as_str()), Some(axis));
        }
        assert_eq!(Axis::from_name("sideways"), None);
        assert!(Axis::Preceding.is_reverse());
        assert!(!Axis::Following.is_reverse());
    }

    #[test]
    fn test_scenario_a_child_and_attribute() {
        let doc = scenario_a();
        let view = doc.view();
        assert_eq!(navigate(&view, 1, Axis::Child), [2, 3]);
        assert_eq!(attributes_of(&view, 1), [0]);
        assert!(attributes_of(&view, 2).is_empty());
    }

    #[test]
    fn test_scenario_c_following_preceding() {
        let doc = scenario_a();
        let view = doc.view();
        assert_eq!(navigate(&view, 2, Axis::Following), [3]);
        assert_eq!(navigate(&view, 3, Axis::Preceding), [2]);
    }

    #[test]
    fn test_child() {
        let doc = wide();
        let view = doc.view();
        assert_eq!(navigate(&view, 0, Axis::Child), [1]);
        assert_eq!(navigate(&view, 1, Axis::Child), [2, 5, 7]);
        assert!(navigate(&view, 3, Axis::Child).is_empty());
    }

    #[test]
    fn test_descendant() {
        let doc = wide();
        let view = doc.view();
        assert_eq!(navigate(&view, 2, Axis::Descendant), [3, 4]);
        assert_eq!(navigate(&view, 2, Axis::DescendantOrSelf), [2, 3, 4]);
        assert_eq!(navigate(&view, 0, Axis::Descendant), [1, 2, 3, 4, 5, 6, 7]);
        assert!(navigate(&view, 7, Axis::Descendant).is_empty());
        assert_eq!(navigate(&view, 7, Axis::DescendantOrSelf), [7]);
    }

    #[test]
    fn test_parent_and_ancestors() {
        let doc = wide();
        let view = doc.view();
        assert_eq!(navigate(&view, 6, Axis::Parent), [5]);
        assert!(navigate(&view, 0, Axis::Parent).is_empty());
        assert_eq!(navigate(&view, 6, Axis::Ancestor), [5, 1, 0]);
        assert_eq!(navigate(&view, 6, Axis::AncestorOrSelf), [6, 5, 1, 0]);
        assert!(navigate(&view, 0, Axis::Ancestor).is_empty());
    }

    #[test]
    fn test_siblings() {
        let doc = wide();
        let view = doc.view();
        assert_eq!(navigate(&view, 2, Axis::FollowingSibling), [5, 7]);
        assert_eq!(navigate(&view, 7, Axis::PrecedingSibling), [5, 2]);
        assert_eq!(navigate(&view, 4, Axis::PrecedingSibling), [3]);
        assert!(navigate(&view, 3, Axis::PrecedingSibling).is_empty());
        assert!(navigate(&view, 0, Axis::FollowingSibling).is_empty());
    }

    #[test]
    fn test_following() {
        let doc = wide();
        let view = doc.view();
        assert_eq!(navigate(&view, 2, Axis::Following), [5, 6, 7]);
        assert_eq!(navigate(&view, 4, Axis::Following), [5, 6, 7]);
        assert!(navigate(&view, 7, Axis::Following).is_empty());
        assert!(navigate(&view, 0, Axis::Following).is_empty());
    }

    #[test]
    fn test_preceding() {
        let doc = wide();
        let view = doc.view();
        assert_eq!(navigate(&view, 6, Axis::Preceding), [4, 3, 2]);
        assert_eq!(navigate(&view, 7, Axis::Preceding), [6, 5, 4, 3, 2]);
        assert!(navigate(&view, 3, Axis::Preceding).is_empty());
        assert!(navigate(&view, 0, Axis::Preceding).is_empty());
    }

    #[test]
    fn test_self_and_out_of_range() {
        let doc = wide();
        let view = doc.view();
        assert_eq!(navigate(&view, 4, Axis::Self_), [4]);
        assert!(navigate(&view, 99, Axis::Self_).is_empty());
        // the marker is not a node
        assert!(navigate(&view, 8, Axis::Self_).is_empty());
        assert!(navigate(&view, 1, Axis::Attribute).is_empty());
        assert!(navigate(&view, 1, Axis::Namespace).is_empty());
    }

    #[test]
    fn test_following_owner_includes_descendants() {
        let doc = wide();
        let view = doc.view();
        let mut cursor = NodeCursor::following_owner(2);
        let found: Vec<NodeId> = std::iter::from_fn(|| cursor.next(&view)).collect();
        assert_eq!(found, [3, 4, 5, 6, 7]);
    }

    proptest! {
        #[test]
        fn prop_depth_invariant(events in arb_document()) {
            let doc = Builder::from_events(&events).unwrap();
            let view = doc.view();
            let count = doc.node_count() as NodeId;
            for id in 0..count {
                let depth = view.nodes()[id as usize].depth;
                let mut expected = Vec::new();
                let mut pos = id + 1;
                while pos < count && view.nodes()[pos as usize].depth > depth {
                    if view.nodes()[pos as usize].depth == depth + 1 {
                        expected.push(pos);
                    }
                    pos += 1;
                }
                prop_assert_eq!(navigate(&view, id, Axis::Child), expected);
            }
        }

        #[test]
        fn prop_parent_child_inverse(events in arb_document()) {
            let doc = Builder::from_events(&events).unwrap();
            let view = doc.view();
            for e in element_ids(&view) {
                for c in navigate(&view, e, Axis::Child) {
                    prop_assert_eq!(navigate(&view, c, Axis::Parent), vec![e]);
                }
            }
        }

        #[test]
        fn prop_sibling_closure(events in arb_document()) {
            let doc = Builder::from_events(&events).unwrap();
            let view = doc.view();
            for n in 1..doc.node_count() as NodeId {
                let parent = navigate(&view, n, Axis::Parent);
                prop_assert_eq!(parent.len(), 1);
                let mut rebuilt: Vec<NodeId> = navigate(&view, n, Axis::PrecedingSibling);
                rebuilt.reverse();
                rebuilt.push(n);
                rebuilt.extend(navigate(&view, n, Axis::FollowingSibling));
                prop_assert_eq!(rebuilt, navigate(&view, parent[0], Axis::Child));
            }
        }

        #[test]
        fn prop_following_preceding_exclusive(events in arb_document()) {
            let doc = Builder::from_events(&events).unwrap();
            let view = doc.view();
            for n in 0..doc.node_count() as NodeId {
                let ancestors = navigate(&view, n, Axis::Ancestor);
                let descendants = navigate(&view, n, Axis::Descendant);
                for f in navigate(&view, n, Axis::Following) {
                    prop_assert!(f > n && !descendants.contains(&f));
                }
                for p in navigate(&view, n, Axis::Preceding) {
                    prop_assert!(p < n && !ancestors.contains(&p));
                }
                // self, ancestors, descendants, following and preceding partition the tree
                let total = 1
                    + ancestors.len()
                    + descendants.len()
                    + navigate(&view, n, Axis::Following).len()
                    + navigate(&view, n, Axis::Preceding).len();
                prop_assert_eq!(total, doc.node_count());
            }
        }

        #[test]
        fn prop_idempotent_finalize(events in arb_document()) {
            let mut open = Builder::new();
            replay(&events, &mut open).unwrap();
            let doc = Builder::from_events(&events).unwrap();

            let before = open.view();
            let after = doc.view();
            for n in 0..doc.node_count() as NodeId {
                for axis in Axis::ALL {
                    prop_assert_eq!(navigate(&before, n, axis), navigate(&after, n, axis));
                }
                prop_assert_eq!(attributes_of(&before, n), attributes_of(&after, n));
            }
            open.end().unwrap();
        }
    }
}
