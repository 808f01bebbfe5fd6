//! Attribute handles

use std::fmt;
use std::hash::{Hash, Hasher};

use super::axis::{self, AxisIter};
use super::{non_empty, Node, QNameRef};
use crate::config::EventOptions;
use crate::dom::{AttrId, AttributeRecord, Builder, Document, DocumentView, NodeId};
use crate::error::BuildError;
use crate::sax::{EventHandler, TypeRef};
use crate::xpath::{Axis, NodeTest};

/// Handle to an entry of a document's attribute array
#[derive(Clone)]
pub struct Attribute {
    document: Document,
    id: AttrId,
}

impl Attribute {
    pub(crate) fn new(document: Document, id: AttrId) -> Self {
        Attribute { document, id }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Position in the attribute array
    #[inline]
    pub fn id(&self) -> AttrId {
        self.id
    }

    fn view(&self) -> DocumentView<'_> {
        self.document.view()
    }

    fn record(&self) -> &AttributeRecord {
        &self.view().attributes()[self.id as usize]
    }

    pub(crate) fn owner_id(&self) -> Option<NodeId> {
        self.record().owner
    }

    /// Owning element; `None` for a parentless attribute
    pub fn owner(&self) -> Option<Node> {
        self.owner_id().map(|o| Node::new(self.document.clone(), o))
    }

    pub fn name(&self) -> QNameRef<'_> {
        let view = self.view();
        let name = self.record().name;
        QNameRef {
            prefix: view.str(name.prefix),
            uri: view.str(name.uri),
            local: view.str(name.local),
        }
    }

    pub fn local_name(&self) -> &str {
        self.name().local
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        non_empty(self.name().uri)
    }

    pub fn prefix(&self) -> Option<&str> {
        non_empty(self.name().prefix)
    }

    pub fn value(&self) -> &str {
        self.view().str(self.record().value)
    }

    pub fn string_value(&self) -> String {
        self.value().to_string()
    }

    pub fn type_name(&self) -> TypeRef<'_> {
        let view = self.view();
        let type_name = self.record().type_name;
        TypeRef::new(view.str(type_name.uri), view.str(type_name.local))
    }

    /// Base URI of the owning element
    pub fn base_uri(&self) -> Option<String> {
        self.owner().and_then(|o| o.base_uri())
    }

    /// Root of the owner's tree
    pub fn root(&self) -> Option<Node> {
        self.owner().map(|o| o.root())
    }

    /// Iterate an axis, keeping only items that pass `test`
    pub fn axis(&self, axis: Axis, test: Option<NodeTest>) -> AxisIter {
        axis::from_attribute(self, axis, test)
    }

    /// Emit this attribute as a single event
    pub fn to_events<H>(&self, handler: &mut H, options: EventOptions) -> Result<(), H::Error>
    where
        H: EventHandler + ?Sized,
    {
        let name = self.name();
        let type_name = if options.preserve_type {
            self.type_name()
        } else {
            TypeRef::UNTYPED_ATOMIC
        };
        handler.attribute(name.prefix, name.uri, name.local, self.value(), Some(type_name))
    }

    /// Copy into a new parentless-attribute document
    pub fn copy_to_document(&self, options: EventOptions) -> Result<Document, BuildError> {
        let mut builder = Builder::new();
        self.to_events(&mut builder, options)?;
        builder.finish()
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.document.ptr_eq(&other.document)
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.id().hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("document", &self.document.id())
            .field("id", &self.id)
            .field("name", &self.name().to_string())
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sax::Event;

    fn sample() -> Document {
        Builder::from_events(&[
            Event::start_element("", "", "root"),
            Event::attribute("x", "urn:x", "a", "1"),
            Event::attribute_typed("", "", "b", "2", TypeRef::new("urn:t", "int")),
            Event::end_element("", "", "root"),
        ])
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let doc = sample();
        let a = doc.attribute(0).unwrap();
        assert_eq!(a.local_name(), "a");
        assert_eq!(a.prefix(), Some("x"));
        assert_eq!(a.namespace_uri(), Some("urn:x"));
        assert_eq!(a.value(), "1");
        assert_eq!(a.type_name(), TypeRef::UNTYPED_ATOMIC);
        assert_eq!(a.owner(), doc.root());
        assert_eq!(a.root(), doc.root());

        let b = doc.attribute(1).unwrap();
        assert_eq!(b.prefix(), None);
        assert_eq!(b.type_name(), TypeRef::new("urn:t", "int"));
        assert_eq!(b.name().to_string(), "b");
    }

    #[test]
    fn test_copy_drops_owner() {
        let doc = sample();
        let copy = doc.attribute(1).unwrap().copy_to_document(EventOptions::default()).unwrap();
        assert_eq!(copy.node_count(), 0);
        let attr = copy.attribute(0).unwrap();
        assert_eq!(attr.owner(), None);
        assert_eq!(attr.value(), "2");
        assert_eq!(attr.type_name(), TypeRef::new("urn:t", "int"));

        let untyped = doc
            .attribute(1)
            .unwrap()
            .copy_to_document(EventOptions::new(true, false))
            .unwrap();
        assert_eq!(untyped.attribute(0).unwrap().type_name(), TypeRef::UNTYPED_ATOMIC);
    }

    #[test]
    fn test_identity() {
        let doc = sample();
        assert_eq!(doc.attribute(0), doc.attribute(0));
        assert_ne!(doc.attribute(0), doc.attribute(1));
        assert_ne!(doc.attribute(0), sample().attribute(0));
    }
}
