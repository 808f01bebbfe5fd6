//! Document Builder
//!
//! Consumes the event protocol and appends records to the three flat
//! arrays in document order. Adjacent text events coalesce into a single
//! text node. Sibling links are patched as each following sibling arrives.
//!
//! `end()` finalizes: each non-empty array receives its sentinel, the links
//! are checked, and the arrays are frozen into a shared [`Document`].
//!
//! Malformed event sequences are programming errors and panic.

use log::{debug, trace};

use super::document::{Document, DocumentView};
use super::record::{AttributeRecord, NamespaceRecord, NodeData, NodeId, NodeRecord, QName, TypeName};
use super::strings::StringPool;
use crate::config::BuilderConfig;
use crate::error::BuildError;
use crate::sax::{replay, Event, EventHandler, TypeRef};

/// Event sink that builds one document
#[derive(Debug)]
pub struct Builder {
    nodes: Vec<NodeRecord>,
    attributes: Vec<AttributeRecord>,
    namespaces: Vec<NamespaceRecord>,
    strings: StringPool,
    /// Open document/element ancestors, innermost last
    stack: Vec<NodeId>,
    /// Last node appended at the current depth, awaiting its next sibling
    prev_node: Option<NodeId>,
    text: String,
    text_pending: bool,
    document: Option<Document>,
}

/// Append a record, doubling the array's capacity when it is full
fn push_record<T>(records: &mut Vec<T>, record: T, array: &'static str) -> Result<u32, BuildError> {
    let id = BuildError::position(records.len(), array)?;
    grow(records, array)?;
    records.push(record);
    Ok(id)
}

/// Double a full array's capacity, reporting allocator refusal
fn grow<T>(records: &mut Vec<T>, array: &'static str) -> Result<(), BuildError> {
    if records.len() < records.capacity() {
        return Ok(());
    }
    let additional = records.capacity().max(1);
    let requested = records.capacity() + additional;
    trace!("growing {} array to {} records", array, requested);
    records
        .try_reserve_exact(additional)
        .map_err(|source| BuildError::Allocation {
            array,
            requested,
            source,
        })
}

impl Builder {
    /// Create a builder with the default initial capacities
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create a builder with explicit initial capacities
    pub fn with_config(config: BuilderConfig) -> Self {
        Builder {
            nodes: Vec::with_capacity(config.node_capacity),
            attributes: Vec::with_capacity(config.attribute_capacity),
            namespaces: Vec::with_capacity(config.namespace_capacity),
            strings: StringPool::new(),
            stack: Vec::new(),
            prev_node: None,
            text: String::new(),
            text_pending: false,
            document: None,
        }
    }

    /// Build a document from a recorded event stream. A trailing
    /// [`Event::End`] is optional.
    pub fn from_events(events: &[Event]) -> Result<Document, BuildError> {
        let mut builder = Builder::new();
        replay(events, &mut builder)?;
        builder.finish()
    }

    /// Read access to the records appended so far
    pub fn view(&self) -> DocumentView<'_> {
        DocumentView::new(&self.nodes, &self.attributes, &self.namespaces, &self.strings)
    }

    /// Current capacities of the node, attribute and namespace arrays
    pub fn capacities(&self) -> (usize, usize, usize) {
        (
            self.nodes.capacity(),
            self.attributes.capacity(),
            self.namespaces.capacity(),
        )
    }

    /// Whether `end()` has been received
    pub fn is_finished(&self) -> bool {
        self.document.is_some()
    }

    /// The finalized document, once `end()` has been received
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Finalize if needed and return the document
    pub fn finish(mut self) -> Result<Document, BuildError> {
        match self.document.take() {
            Some(document) => Ok(document),
            None => self.close(),
        }
    }

    fn assert_open(&self) {
        assert!(self.document.is_none(), "event received after end()");
    }

    /// A node with no open ancestor must be the only top-level node
    fn assert_top_level_free(&self) {
        assert!(
            !self.stack.is_empty() || self.nodes.is_empty(),
            "a document holds exactly one top-level node"
        );
    }

    fn depth(&self) -> u32 {
        self.stack.len() as u32
    }

    fn link_sibling(&mut self, id: NodeId) {
        if let Some(prev) = self.prev_node {
            self.nodes[prev as usize].next_sibling = Some(id);
        }
    }

    fn append_node(&mut self, record: NodeRecord) -> Result<NodeId, BuildError> {
        self.assert_top_level_free();
        let id = push_record(&mut self.nodes, record, "node")?;
        self.link_sibling(id);
        Ok(id)
    }

    /// Turn pending text into at most one text node.
    ///
    /// Empty text is dropped unless it is the only node of the document.
    fn flush_text(&mut self) -> Result<(), BuildError> {
        if !self.text_pending {
            return Ok(());
        }
        self.text_pending = false;
        if self.text.is_empty() && !self.nodes.is_empty() {
            return Ok(());
        }
        let value = self.strings.intern(&self.text)?;
        self.text.clear();
        let id = self.append_node(NodeRecord::text(value, self.depth()))?;
        self.prev_node = Some(id);
        Ok(())
    }

    fn intern_type(&mut self, type_name: Option<TypeRef<'_>>, default: TypeName) -> Result<TypeName, BuildError> {
        Ok(match type_name {
            Some(t) => TypeName::new(self.strings.intern(t.uri)?, self.strings.intern(t.name)?),
            None => default,
        })
    }

    fn intern_name(&mut self, prefix: &str, uri: &str, local: &str) -> Result<QName, BuildError> {
        Ok(QName::new(
            self.strings.intern(prefix)?,
            self.strings.intern(uri)?,
            self.strings.intern(local)?,
        ))
    }

    /// Owner for an attribute or namespace event, checking the preconditions
    fn owner_for(&self, what: &str) -> Option<NodeId> {
        match self.stack.last() {
            Some(&top) => {
                assert!(
                    self.nodes[top as usize].is_element(),
                    "{} event inside a document node",
                    what
                );
                Some(top)
            }
            None => {
                assert!(
                    self.nodes.is_empty() && self.attributes.is_empty() && self.namespaces.is_empty(),
                    "{} event outside an element",
                    what
                );
                None
            }
        }
    }

    fn close(&mut self) -> Result<Document, BuildError> {
        self.assert_open();
        self.flush_text()?;
        assert!(
            self.stack.is_empty(),
            "end() with {} unclosed node(s)",
            self.stack.len()
        );

        if !self.nodes.is_empty() {
            push_record(&mut self.nodes, NodeRecord::marker(), "node")?;
        }
        if !self.attributes.is_empty() {
            push_record(&mut self.attributes, AttributeRecord::sentinel(), "attribute")?;
        }
        if !self.namespaces.is_empty() {
            push_record(&mut self.namespaces, NamespaceRecord::sentinel(), "namespace")?;
        }
        if cfg!(debug_assertions) {
            self.verify_links();
        }

        let document = Document::freeze(
            std::mem::take(&mut self.nodes),
            std::mem::take(&mut self.attributes),
            std::mem::take(&mut self.namespaces),
            std::mem::take(&mut self.strings),
        );
        debug!(
            "finalized document {}: {} nodes, {} attributes, {} namespaces",
            document.id(),
            document.node_count(),
            document.attribute_count(),
            document.namespace_count()
        );
        self.prev_node = None;
        self.document = Some(document.clone());
        Ok(document)
    }

    /// Check that every stored position refers to a record of the right shape
    fn verify_links(&self) {
        let nodes = self.nodes.len();
        for (pos, node) in self.nodes.iter().enumerate() {
            let owner = Some(pos as NodeId);
            if let Some(next) = node.next_sibling {
                debug_assert!((next as usize) < nodes && self.nodes[next as usize].depth == node.depth);
            }
            if let Some(first) = node.first_attribute() {
                debug_assert_eq!(self.attributes[first as usize].owner, owner);
            }
            if let Some(first) = node.first_namespace() {
                debug_assert_eq!(self.namespaces[first as usize].owner, owner);
            }
        }
        for attr in &self.attributes {
            debug_assert!(attr.owner.map_or(true, |o| (o as usize) < nodes));
        }
        for decl in &self.namespaces {
            debug_assert!(decl.owner.map_or(true, |o| (o as usize) < nodes));
        }
        trace!(
            "verified {} nodes, {} attributes, {} namespaces",
            nodes,
            self.attributes.len(),
            self.namespaces.len()
        );
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for Builder {
    type Error = BuildError;

    fn start_document(&mut self, uri: &str, encoding: &str) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        assert!(
            self.nodes.is_empty() && self.stack.is_empty(),
            "start_document must open the document"
        );
        let uri = self.strings.intern(uri)?;
        let encoding = self.strings.intern(encoding)?;
        let id = self.append_node(NodeRecord::document(uri, encoding, 0))?;
        self.stack.push(id);
        self.prev_node = None;
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        let id = match self.stack.pop() {
            Some(id) => id,
            None => panic!("end_document without an open document"),
        };
        assert!(
            matches!(self.nodes[id as usize].data, NodeData::Document { .. }),
            "end_document closes an element"
        );
        self.prev_node = Some(id);
        Ok(())
    }

    fn start_element(&mut self, prefix: &str, uri: &str, local: &str) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        let name = self.intern_name(prefix, uri, local)?;
        let id = self.append_node(NodeRecord::element(name, self.depth()))?;
        self.stack.push(id);
        self.prev_node = None;
        Ok(())
    }

    fn end_element(
        &mut self,
        _prefix: &str,
        _uri: &str,
        _local: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        let id = match self.stack.pop() {
            Some(id) => id,
            None => panic!("end_element without an open element"),
        };
        let resolved = self.intern_type(type_name, TypeName::UNTYPED)?;
        match &mut self.nodes[id as usize].data {
            NodeData::Element { type_name, .. } => *type_name = resolved,
            _ => panic!("end_element closes a document"),
        }
        self.prev_node = Some(id);
        Ok(())
    }

    fn processing_instruction(&mut self, target: &str, value: &str) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        let target = self.strings.intern(target)?;
        let value = self.strings.intern(value)?;
        let id = self.append_node(NodeRecord::processing_instruction(target, value, self.depth()))?;
        self.prev_node = Some(id);
        Ok(())
    }

    fn text(&mut self, value: &str) -> Result<(), BuildError> {
        self.assert_open();
        self.text.push_str(value);
        self.text_pending = true;
        Ok(())
    }

    fn comment(&mut self, value: &str) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        let value = self.strings.intern(value)?;
        let id = self.append_node(NodeRecord::comment(value, self.depth()))?;
        self.prev_node = Some(id);
        Ok(())
    }

    fn attribute(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        value: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        let owner = self.owner_for("attribute");
        if let Some(owner) = owner {
            if self.nodes[owner as usize].first_attribute().is_some() {
                assert!(
                    self.attributes.last().is_some_and(|a| a.owner == Some(owner)),
                    "attributes must directly follow their element's start"
                );
            }
        }

        let name = self.intern_name(prefix, uri, local)?;
        let value = self.strings.intern(value)?;
        let type_name = self.intern_type(type_name, TypeName::UNTYPED_ATOMIC)?;
        let id = push_record(
            &mut self.attributes,
            AttributeRecord::new(owner, name, value, type_name),
            "attribute",
        )?;

        if let Some(owner) = owner {
            if let NodeData::Element { attributes, .. } = &mut self.nodes[owner as usize].data {
                attributes.get_or_insert(id);
            }
        }
        Ok(())
    }

    fn namespace(&mut self, prefix: &str, uri: &str) -> Result<(), BuildError> {
        self.assert_open();
        self.flush_text()?;
        let owner = self.owner_for("namespace");
        if let Some(owner) = owner {
            if self.nodes[owner as usize].first_namespace().is_some() {
                assert!(
                    self.namespaces.last().is_some_and(|n| n.owner == Some(owner)),
                    "namespaces must directly follow their element's start"
                );
            }
        }

        let prefix = self.strings.intern(prefix)?;
        let uri = self.strings.intern(uri)?;
        let id = push_record(
            &mut self.namespaces,
            NamespaceRecord::new(owner, prefix, uri),
            "namespace",
        )?;

        if let Some(owner) = owner {
            if let NodeData::Element { namespaces, .. } = &mut self.nodes[owner as usize].data {
                namespaces.get_or_insert(id);
            }
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), BuildError> {
        self.close().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;

    fn scenario_a() -> Vec<Event> {
        vec![
            Event::start_element("", "", "root"),
            Event::attribute("", "", "a", "1"),
            Event::start_element("", "", "child"),
            Event::end_element("", "", "child"),
            Event::text("text"),
            Event::end_element("", "", "root"),
        ]
    }

    #[test]
    fn test_scenario_a_layout() {
        let doc = Builder::from_events(&scenario_a()).unwrap();
        let view = doc.view();

        let kinds: Vec<(NodeKind, u32)> = view.nodes().iter().map(|n| (n.kind(), n.depth)).collect();
        assert_eq!(
            kinds,
            [
                (NodeKind::Element, 0),
                (NodeKind::Element, 1),
                (NodeKind::Text, 1),
                (NodeKind::Marker, 0),
            ]
        );
        assert_eq!(view.nodes()[1].next_sibling, Some(2));
        assert_eq!(view.nodes()[2].next_sibling, None);
        assert_eq!(view.nodes()[0].next_sibling, None);

        assert_eq!(doc.attribute_count(), 1);
        let attr = view.attribute(0).unwrap();
        assert_eq!(attr.owner, Some(0));
        assert_eq!(view.str(attr.name.local), "a");
        assert_eq!(view.str(attr.value), "1");
        assert_eq!(attr.type_name, TypeName::UNTYPED_ATOMIC);
        assert_eq!(view.nodes()[0].first_attribute(), Some(0));
    }

    #[test]
    fn test_text_coalescing() {
        let doc = Builder::from_events(&[
            Event::start_element("", "", "root"),
            Event::text("ab"),
            Event::text("cd"),
            Event::end_element("", "", "root"),
        ])
        .unwrap();
        assert_eq!(doc.node_count(), 2);
        let view = doc.view();
        assert_eq!(view.nodes()[1].kind(), NodeKind::Text);
        assert_eq!(view.nodes()[1].value().map(|v| view.str(v)), Some("abcd"));
    }

    #[test]
    fn test_text_partial_coalesces() {
        let mut builder = Builder::new();
        builder.start_element("", "", "root").unwrap();
        builder.text_partial("abXYZ", 2).unwrap();
        builder.text("cd").unwrap();
        builder.end_element("", "", "root", None).unwrap();
        let doc = builder.finish().unwrap();
        assert_eq!(doc.view().descendant_text(0), "abcd");
    }

    #[test]
    fn test_empty_text_dropped_inside_element() {
        let doc = Builder::from_events(&[
            Event::start_element("", "", "root"),
            Event::text(""),
            Event::end_element("", "", "root"),
        ])
        .unwrap();
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_empty_text_kept_alone() {
        let doc = Builder::from_events(&[Event::text("")]).unwrap();
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.view().nodes()[0].kind(), NodeKind::Text);
    }

    #[test]
    fn test_element_types() {
        let doc = Builder::from_events(&[
            Event::start_element("", "", "root"),
            Event::start_element("", "", "n"),
            Event::end_element_typed("", "", "n", TypeRef::new("urn:types", "number")),
            Event::end_element("", "", "root"),
        ])
        .unwrap();
        let view = doc.view();
        match view.nodes()[0].data {
            NodeData::Element { type_name, .. } => assert_eq!(type_name, TypeName::UNTYPED),
            _ => panic!("expected element"),
        }
        match view.nodes()[1].data {
            NodeData::Element { type_name, .. } => {
                assert_eq!(view.str(type_name.uri), "urn:types");
                assert_eq!(view.str(type_name.local), "number");
            }
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn test_sibling_links_skip_subtrees() {
        let doc = Builder::from_events(&[
            Event::start_document("", ""),
            Event::start_element("", "", "a"),
            Event::start_element("", "", "b"),
            Event::start_element("", "", "c"),
            Event::end_element("", "", "c"),
            Event::end_element("", "", "b"),
            Event::comment("note"),
            Event::processing_instruction("pi", "data"),
            Event::end_element("", "", "a"),
            Event::end_document(),
        ])
        .unwrap();
        let view = doc.view();
        assert_eq!(view.nodes()[2].next_sibling, Some(4));
        assert_eq!(view.nodes()[4].next_sibling, Some(5));
        assert_eq!(view.nodes()[5].next_sibling, None);
        assert_eq!(view.nodes()[3].next_sibling, None);
        assert_eq!(view.nodes()[1].next_sibling, None);
    }

    #[test]
    fn test_namespace_runs() {
        let doc = Builder::from_events(&[
            Event::start_element("a", "urn:a", "root"),
            Event::namespace("a", "urn:a"),
            Event::namespace("b", "urn:b"),
            Event::start_element("", "", "child"),
            Event::namespace("c", "urn:c"),
            Event::end_element("", "", "child"),
            Event::end_element("a", "urn:a", "root"),
        ])
        .unwrap();
        let view = doc.view();
        assert_eq!(doc.namespace_count(), 3);
        assert_eq!(view.nodes()[0].first_namespace(), Some(0));
        assert_eq!(view.nodes()[1].first_namespace(), Some(2));
        assert_eq!(view.namespace_run(0).count(), 2);
        assert_eq!(view.namespace_run(1).count(), 1);
        assert_eq!(view.namespaces()[3].owner, None);
    }

    #[test]
    fn test_capacity_doubles() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut builder = Builder::with_config(BuilderConfig::new(1, 0, 0));
        builder.start_element("", "", "root").unwrap();
        for i in 0..5 {
            builder.attribute("", "", &format!("a{}", i), "v", None).unwrap();
        }
        builder.start_element("", "", "x").unwrap();
        builder.end_element("", "", "x", None).unwrap();
        builder.start_element("", "", "y").unwrap();
        builder.end_element("", "", "y", None).unwrap();
        let (nodes, attributes, namespaces) = builder.capacities();
        assert_eq!(nodes, 4);
        assert_eq!(attributes, 8);
        assert_eq!(namespaces, 0);

        let doc = builder.finish().unwrap();
        assert_eq!(doc.node_count(), 3);
        assert_eq!(doc.attribute_count(), 5);
    }

    #[test]
    fn test_view_before_finalize() {
        let mut builder = Builder::new();
        replay(&scenario_a(), &mut builder).unwrap();
        assert!(!builder.is_finished());
        assert_eq!(builder.view().nodes().len(), 3);

        builder.end().unwrap();
        assert!(builder.is_finished());
        assert_eq!(builder.document().map(|d| d.node_count()), Some(3));
    }

    #[test]
    fn test_parentless_attribute() {
        let doc = Builder::from_events(&[Event::attribute("", "", "id", "7")]).unwrap();
        assert_eq!(doc.node_count(), 0);
        assert_eq!(doc.attribute_count(), 1);
        assert_eq!(doc.view().attributes()[0].owner, None);
    }

    #[test]
    fn test_push_record_position_limit() {
        let mut records: Vec<()> = Vec::new();
        // SAFETY: `()` is zero-sized, so a zero-sized vec holds any length
        unsafe { records.set_len(u32::MAX as usize) };
        assert_eq!(push_record(&mut records, (), "namespace").unwrap(), u32::MAX);
        match push_record(&mut records, (), "namespace") {
            Err(BuildError::Capacity { array }) => assert_eq!(array, "namespace"),
            other => panic!("expected a capacity error, got {:?}", other),
        }
        assert_eq!(records.len(), u32::MAX as usize + 1);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_grow_reports_refused_allocation() {
        let mut records: Vec<[u8; 1 << 60]> = Vec::new();
        match grow(&mut records, "attribute") {
            Err(err @ BuildError::Allocation { .. }) => {
                assert!(matches!(err, BuildError::Allocation { array: "attribute", requested: 1, .. }));
                assert!(err.to_string().contains("attribute array"));
            }
            other => panic!("expected an allocation error, got {:?}", other),
        }
        assert_eq!(records.capacity(), 0);
    }

    #[test]
    #[should_panic(expected = "end_element without an open element")]
    fn test_unbalanced_end_panics() {
        let mut builder = Builder::new();
        let _ = builder.end_element("", "", "x", None);
    }

    #[test]
    #[should_panic(expected = "unclosed")]
    fn test_end_with_open_element_panics() {
        let mut builder = Builder::new();
        builder.start_element("", "", "x").unwrap();
        let _ = builder.end();
    }

    #[test]
    #[should_panic(expected = "attribute event outside an element")]
    fn test_stray_attribute_panics() {
        let mut builder = Builder::new();
        builder.start_element("", "", "x").unwrap();
        builder.end_element("", "", "x", None).unwrap();
        let _ = builder.attribute("", "", "a", "1", None);
    }

    #[test]
    #[should_panic(expected = "exactly one top-level node")]
    fn test_second_root_panics() {
        let mut builder = Builder::new();
        builder.start_element("", "", "x").unwrap();
        builder.end_element("", "", "x", None).unwrap();
        let _ = builder.start_element("", "", "y");
    }

    #[test]
    #[should_panic(expected = "after end()")]
    fn test_event_after_end_panics() {
        let mut builder = Builder::new();
        builder.comment("c").unwrap();
        builder.end().unwrap();
        let _ = builder.comment("again");
    }
}
