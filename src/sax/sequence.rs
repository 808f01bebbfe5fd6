//! Sequence Builder
//!
//! Builds a sequence of items from one event stream. Every top-level item
//! (a whole document, an element subtree, a lone text or comment or
//! processing instruction, a parentless attribute or namespace) becomes its
//! own document, sized for what it will hold.

use log::debug;

use super::handler::{EventHandler, TypeRef};
use crate::config::BuilderConfig;
use crate::dom::{Builder, Document};
use crate::error::BuildError;
use crate::xdm::Item;

/// Event sink that collects one item per top-level construct
#[derive(Debug, Default)]
pub struct SequenceBuilder {
    config: BuilderConfig,
    current: Option<Builder>,
    level: usize,
    items: Vec<Item>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for documents and element subtrees
    pub fn with_config(config: BuilderConfig) -> Self {
        SequenceBuilder {
            config,
            ..Self::default()
        }
    }

    /// Items completed so far, in arrival order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builder receiving the current item, started fresh at top level
    fn builder(&mut self, config: BuilderConfig) -> &mut Builder {
        if self.level == 0 {
            self.current = None;
        }
        self.current.get_or_insert_with(|| Builder::with_config(config))
    }

    fn open(&mut self) -> &mut Builder {
        match self.current.as_mut() {
            Some(builder) => builder,
            None => panic!("event outside of an open item"),
        }
    }

    /// Finalize the current item and keep what `pick` selects from it
    fn complete(&mut self, pick: fn(&Document) -> Option<Item>) -> Result<(), BuildError> {
        if let Some(builder) = self.current.take() {
            let document = builder.finish()?;
            if let Some(item) = pick(&document) {
                debug!("sequence item {} is a {}", self.items.len(), item.kind_name());
                self.items.push(item);
            }
        }
        Ok(())
    }

    /// Send a leaf event, completing it as an item when at top level
    fn leaf<F>(&mut self, config: BuilderConfig, pick: fn(&Document) -> Option<Item>, send: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut Builder) -> Result<(), BuildError>,
    {
        let top_level = self.level == 0;
        send(self.builder(config))?;
        if top_level {
            self.complete(pick)?;
        }
        Ok(())
    }

    fn end_container(&mut self, send: impl FnOnce(&mut Builder) -> Result<(), BuildError>) -> Result<(), BuildError> {
        assert!(self.level > 0, "end event without a matching start");
        self.level -= 1;
        send(self.open())?;
        if self.level == 0 {
            self.complete(root_item)?;
        }
        Ok(())
    }
}

fn root_item(document: &Document) -> Option<Item> {
    document.root().map(Item::Node)
}

fn attribute_item(document: &Document) -> Option<Item> {
    document.attribute(0).map(Item::Attribute)
}

fn namespace_item(document: &Document) -> Option<Item> {
    document.parentless_namespace().map(Item::Namespace)
}

impl EventHandler for SequenceBuilder {
    type Error = BuildError;

    fn start_document(&mut self, uri: &str, encoding: &str) -> Result<(), BuildError> {
        let config = self.config;
        self.builder(config).start_document(uri, encoding)?;
        self.level += 1;
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), BuildError> {
        self.end_container(|b| b.end_document())
    }

    fn start_element(&mut self, prefix: &str, uri: &str, local: &str) -> Result<(), BuildError> {
        let config = self.config;
        self.builder(config).start_element(prefix, uri, local)?;
        self.level += 1;
        Ok(())
    }

    fn end_element(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), BuildError> {
        self.end_container(|b| b.end_element(prefix, uri, local, type_name))
    }

    fn processing_instruction(&mut self, target: &str, value: &str) -> Result<(), BuildError> {
        self.leaf(BuilderConfig::single_node(), root_item, |b| b.processing_instruction(target, value))
    }

    fn text(&mut self, value: &str) -> Result<(), BuildError> {
        self.leaf(BuilderConfig::single_node(), root_item, |b| b.text(value))
    }

    fn comment(&mut self, value: &str) -> Result<(), BuildError> {
        self.leaf(BuilderConfig::single_node(), root_item, |b| b.comment(value))
    }

    fn attribute(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        value: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), BuildError> {
        self.leaf(BuilderConfig::single_attribute(), attribute_item, |b| {
            b.attribute(prefix, uri, local, value, type_name)
        })
    }

    fn namespace(&mut self, prefix: &str, uri: &str) -> Result<(), BuildError> {
        self.leaf(BuilderConfig::single_namespace(), namespace_item, |b| b.namespace(prefix, uri))
    }

    /// Items complete as their top-level construct closes
    fn end(&mut self) -> Result<(), BuildError> {
        Ok(())
    }
}
