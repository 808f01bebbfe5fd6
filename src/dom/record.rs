//! Record Model
//!
//! Fixed-size records stored in the three flat arrays of a document.
//! Every cross-record reference is a plain array position: positions stay
//! valid while the arrays grow during building and after they are frozen.

use super::strings::{StrId, StringPool};

/// Position in the node array
pub type NodeId = u32;
/// Position in the attribute array
pub type AttrId = u32;
/// Position in the namespace array
pub type NsId = u32;

/// Kind of a record in the node array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
    /// Sentinel terminating the array
    Marker,
}

impl NodeKind {
    /// The XDM kind name
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
            NodeKind::ProcessingInstruction => "processing-instruction",
            NodeKind::Marker => "marker",
        }
    }
}

/// Interned qualified name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QName {
    pub prefix: StrId,
    pub uri: StrId,
    pub local: StrId,
}

impl QName {
    pub fn new(prefix: StrId, uri: StrId, local: StrId) -> Self {
        QName { prefix, uri, local }
    }
}

/// Interned schema type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub uri: StrId,
    pub local: StrId,
}

impl TypeName {
    /// `xs:untyped`, the type of elements built without schema information
    pub const UNTYPED: TypeName = TypeName {
        uri: StringPool::SCHEMA_URI,
        local: StringPool::UNTYPED,
    };

    /// `xs:untypedAtomic`, the type of untyped attributes and text
    pub const UNTYPED_ATOMIC: TypeName = TypeName {
        uri: StringPool::SCHEMA_URI,
        local: StringPool::UNTYPED_ATOMIC,
    };

    pub fn new(uri: StrId, local: StrId) -> Self {
        TypeName { uri, local }
    }
}

/// Kind-specific payload of a node record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeData {
    Document {
        uri: StrId,
        encoding: StrId,
    },
    Element {
        name: QName,
        type_name: TypeName,
        /// First record of this element's attribute run
        attributes: Option<AttrId>,
        /// First record of this element's namespace run
        namespaces: Option<NsId>,
    },
    Text {
        value: StrId,
    },
    Comment {
        value: StrId,
    },
    ProcessingInstruction {
        target: StrId,
        value: StrId,
    },
    Marker,
}

/// A record in the node array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    /// Nesting depth; the root is 0
    pub depth: u32,
    /// Next node at the same depth after this node's subtree
    pub next_sibling: Option<NodeId>,
    pub data: NodeData,
}

impl NodeRecord {
    /// Create a document node
    pub fn document(uri: StrId, encoding: StrId, depth: u32) -> Self {
        Self::with_data(depth, NodeData::Document { uri, encoding })
    }

    /// Create an element node. Its type is settled when the element ends.
    pub fn element(name: QName, depth: u32) -> Self {
        Self::with_data(
            depth,
            NodeData::Element {
                name,
                type_name: TypeName::UNTYPED,
                attributes: None,
                namespaces: None,
            },
        )
    }

    /// Create a text node
    pub fn text(value: StrId, depth: u32) -> Self {
        Self::with_data(depth, NodeData::Text { value })
    }

    /// Create a comment node
    pub fn comment(value: StrId, depth: u32) -> Self {
        Self::with_data(depth, NodeData::Comment { value })
    }

    /// Create a processing instruction node
    pub fn processing_instruction(target: StrId, value: StrId, depth: u32) -> Self {
        Self::with_data(depth, NodeData::ProcessingInstruction { target, value })
    }

    /// Create the sentinel that terminates the node array
    pub fn marker() -> Self {
        Self::with_data(0, NodeData::Marker)
    }

    fn with_data(depth: u32, data: NodeData) -> Self {
        NodeRecord {
            depth,
            next_sibling: None,
            data,
        }
    }

    /// Kind of this node
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Document { .. } => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text { .. } => NodeKind::Text,
            NodeData::Comment { .. } => NodeKind::Comment,
            NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
            NodeData::Marker => NodeKind::Marker,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    #[inline]
    pub fn is_marker(&self) -> bool {
        matches!(self.data, NodeData::Marker)
    }

    /// Whether child/descendant axes can yield anything from this node
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document { .. } | NodeData::Element { .. })
    }

    /// Element name, if this is an element
    pub fn element_name(&self) -> Option<QName> {
        match self.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// First attribute of this element's run
    pub fn first_attribute(&self) -> Option<AttrId> {
        match self.data {
            NodeData::Element { attributes, .. } => attributes,
            _ => None,
        }
    }

    /// First namespace of this element's run
    pub fn first_namespace(&self) -> Option<NsId> {
        match self.data {
            NodeData::Element { namespaces, .. } => namespaces,
            _ => None,
        }
    }

    /// Payload string of text, comment and PI nodes
    pub fn value(&self) -> Option<StrId> {
        match self.data {
            NodeData::Text { value }
            | NodeData::Comment { value }
            | NodeData::ProcessingInstruction { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// A record in the attribute array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRecord {
    /// Owning element; `None` for the sentinel or a parentless attribute
    pub owner: Option<NodeId>,
    pub name: QName,
    pub value: StrId,
    pub type_name: TypeName,
}

impl AttributeRecord {
    pub fn new(owner: Option<NodeId>, name: QName, value: StrId, type_name: TypeName) -> Self {
        AttributeRecord {
            owner,
            name,
            value,
            type_name,
        }
    }

    /// Create the sentinel that terminates the attribute array
    pub fn sentinel() -> Self {
        Self::new(None, QName::default(), StringPool::EMPTY, TypeName::UNTYPED_ATOMIC)
    }
}

/// A record in the namespace array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceRecord {
    /// Owning element; `None` for the sentinel or a parentless namespace
    pub owner: Option<NodeId>,
    pub prefix: StrId,
    pub uri: StrId,
}

impl NamespaceRecord {
    pub fn new(owner: Option<NodeId>, prefix: StrId, uri: StrId) -> Self {
        NamespaceRecord { owner, prefix, uri }
    }

    /// Create the sentinel that terminates the namespace array
    pub fn sentinel() -> Self {
        Self::new(None, StringPool::EMPTY, StringPool::EMPTY)
    }
}
