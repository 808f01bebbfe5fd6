//! Items and document order

use std::cmp::Ordering;

use super::axis::AxisIter;
use super::{Attribute, NamespaceNode, Node};
use crate::config::EventOptions;
use crate::dom::{Document, NodeId};
use crate::error::BuildError;
use crate::sax::EventHandler;
use crate::xpath::{Axis, NodeTest};

/// Any node an axis can yield
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Node(Node),
    Attribute(Attribute),
    Namespace(NamespaceNode),
}

/// Sort key realizing document order across all item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    /// Parentless namespace nodes sort before everything else
    rank: u8,
    document: u64,
    /// Owning node position; the node itself for `Item::Node`
    owner: Option<NodeId>,
    /// Node, then its attributes, then its namespaces
    slot: u8,
    index: u32,
}

impl Item {
    pub fn document(&self) -> &Document {
        match self {
            Item::Node(node) => node.document(),
            Item::Attribute(attr) => attr.document(),
            Item::Namespace(ns) => ns.document(),
        }
    }

    /// XDM node kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::Node(node) => node.kind().as_str(),
            Item::Attribute(_) => "attribute",
            Item::Namespace(_) => "namespace",
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Item::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Item::Attribute(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NamespaceNode> {
        match self {
            Item::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    /// Parent node: the owner of an attribute or namespace
    pub fn parent(&self) -> Option<Node> {
        match self {
            Item::Node(node) => node.parent(),
            Item::Attribute(attr) => attr.owner(),
            Item::Namespace(ns) => ns.owner(),
        }
    }

    pub fn string_value(&self) -> String {
        match self {
            Item::Node(node) => node.string_value(),
            Item::Attribute(attr) => attr.string_value(),
            Item::Namespace(ns) => ns.string_value(),
        }
    }

    /// Base URI; namespace nodes have none
    pub fn base_uri(&self) -> Option<String> {
        match self {
            Item::Node(node) => node.base_uri(),
            Item::Attribute(attr) => attr.base_uri(),
            Item::Namespace(_) => None,
        }
    }

    /// Nilled property; defined only for elements
    pub fn nilled(&self) -> Option<bool> {
        self.as_node().and_then(Node::nilled)
    }

    /// Iterate an axis, keeping only items that pass `test`
    pub fn axis(&self, axis: Axis, test: Option<NodeTest>) -> AxisIter {
        match self {
            Item::Node(node) => node.axis(axis, test),
            Item::Attribute(attr) => attr.axis(axis, test),
            Item::Namespace(ns) => ns.axis(axis, test),
        }
    }

    pub fn to_events<H>(&self, handler: &mut H, options: EventOptions) -> Result<(), H::Error>
    where
        H: EventHandler + ?Sized,
    {
        match self {
            Item::Node(node) => node.to_events(handler, options),
            Item::Attribute(attr) => attr.to_events(handler, options),
            Item::Namespace(ns) => ns.to_events(handler, options),
        }
    }

    pub fn copy_to_document(&self, options: EventOptions) -> Result<Document, BuildError> {
        match self {
            Item::Node(node) => node.copy_to_document(options),
            Item::Attribute(attr) => attr.copy_to_document(options),
            Item::Namespace(ns) => ns.copy_to_document(options),
        }
    }

    fn order_key(&self) -> OrderKey {
        let document = self.document().id();
        match self {
            Item::Node(node) => OrderKey {
                rank: 1,
                document,
                owner: Some(node.id()),
                slot: 0,
                index: 0,
            },
            Item::Attribute(attr) => OrderKey {
                rank: 1,
                document,
                owner: attr.owner_id(),
                slot: 1,
                index: attr.id(),
            },
            Item::Namespace(ns) => match ns.owner_id() {
                Some(owner) => OrderKey {
                    rank: 1,
                    document,
                    owner: Some(owner),
                    slot: 2,
                    index: ns.order(),
                },
                None => OrderKey {
                    rank: 0,
                    document,
                    owner: None,
                    slot: 0,
                    index: 0,
                },
            },
        }
    }
}

impl From<Node> for Item {
    fn from(node: Node) -> Self {
        Item::Node(node)
    }
}

impl From<Attribute> for Item {
    fn from(attr: Attribute) -> Self {
        Item::Attribute(attr)
    }
}

impl From<NamespaceNode> for Item {
    fn from(ns: NamespaceNode) -> Self {
        Item::Namespace(ns)
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Document order. Within one element: the element, its attributes in
/// array order, then its namespace nodes in walk order.
impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}
