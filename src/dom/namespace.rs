//! Namespace Scope
//!
//! Well-known namespace constants and the walk that computes the in-scope
//! namespace bindings of an element from the stored records.

use std::collections::HashSet;

use super::document::DocumentView;
use super::record::{AttrId, NodeId, NsId};
use super::strings::{StrId, StringPool};

/// Well-known namespace URIs and names
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
    pub const SCHEMA: &str = "http://www.w3.org/2001/XMLSchema";
    pub const XML_PREFIX: &str = "xml";
    pub const UNTYPED: &str = "untyped";
    pub const UNTYPED_ATOMIC: &str = "untypedAtomic";
}

/// One in-scope prefix binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub prefix: StrId,
    pub uri: StrId,
    /// Position of this binding in the walk that produced it
    pub order: u32,
}

#[derive(Debug, Clone, Copy)]
enum ScopeState {
    CheckElement,
    CheckAttributes(Option<AttrId>),
    CheckDeclarations(Option<NsId>),
    Xml,
    Done,
}

/// Walk over the namespace bindings in scope at an element.
///
/// Visits the element's own name, its namespaced attributes and its
/// declarations, then repeats on each ancestor element. The first binding
/// seen for a prefix wins; a prefix bound to no URI still shadows outer
/// bindings. Optionally finishes with the implicit `xml` binding.
#[derive(Debug, Clone)]
pub struct InScopeNamespaces {
    element: NodeId,
    state: ScopeState,
    seen: HashSet<StrId>,
    include_xml: bool,
    order: u32,
}

impl InScopeNamespaces {
    pub fn new(element: NodeId, include_xml: bool) -> Self {
        InScopeNamespaces {
            element,
            state: ScopeState::CheckElement,
            seen: HashSet::new(),
            include_xml,
            order: 0,
        }
    }

    fn emit(&mut self, prefix: StrId, uri: StrId) -> Binding {
        let binding = Binding {
            prefix,
            uri,
            order: self.order,
        };
        self.order += 1;
        binding
    }

    /// Advance to the next binding
    pub fn next(&mut self, view: &DocumentView<'_>) -> Option<Binding> {
        loop {
            match self.state {
                ScopeState::CheckElement => {
                    let node = match view.node(self.element) {
                        Some(node) if node.is_element() => node,
                        _ => {
                            self.state = ScopeState::Done;
                            continue;
                        }
                    };
                    self.state = ScopeState::CheckAttributes(node.first_attribute());
                    if let Some(name) = node.element_name() {
                        if self.seen.insert(name.prefix) && name.uri != StringPool::EMPTY {
                            return Some(self.emit(name.prefix, name.uri));
                        }
                    }
                }
                ScopeState::CheckAttributes(pos) => {
                    let attr = pos
                        .and_then(|p| view.attribute(p))
                        .filter(|a| a.owner == Some(self.element));
                    match (pos, attr) {
                        (Some(p), Some(attr)) => {
                            self.state = ScopeState::CheckAttributes(Some(p + 1));
                            if attr.name.uri != StringPool::EMPTY && self.seen.insert(attr.name.prefix) {
                                return Some(self.emit(attr.name.prefix, attr.name.uri));
                            }
                        }
                        _ => {
                            let first = view.node(self.element).and_then(|n| n.first_namespace());
                            self.state = ScopeState::CheckDeclarations(first);
                        }
                    }
                }
                ScopeState::CheckDeclarations(pos) => {
                    let decl = pos
                        .and_then(|p| view.namespace(p))
                        .filter(|n| n.owner == Some(self.element));
                    match (pos, decl) {
                        (Some(p), Some(decl)) => {
                            self.state = ScopeState::CheckDeclarations(Some(p + 1));
                            if self.seen.insert(decl.prefix) && decl.uri != StringPool::EMPTY {
                                return Some(self.emit(decl.prefix, decl.uri));
                            }
                        }
                        _ => match view.parent(self.element) {
                            Some(parent) if view.node(parent).is_some_and(|n| n.is_element()) => {
                                self.element = parent;
                                self.state = ScopeState::CheckElement;
                            }
                            _ => {
                                self.state = if self.include_xml {
                                    ScopeState::Xml
                                } else {
                                    ScopeState::Done
                                };
                            }
                        },
                    }
                }
                ScopeState::Xml => {
                    self.state = ScopeState::Done;
                    if self.seen.insert(StringPool::XML_PREFIX) {
                        return Some(self.emit(StringPool::XML_PREFIX, StringPool::XML_URI));
                    }
                }
                ScopeState::Done => return None,
            }
        }
    }
}
