//! Shared generators for property tests

use proptest::collection::vec;
use proptest::prelude::*;

use crate::dom::{DocumentView, NodeId};
use crate::sax::{Event, SchemaType, TypeRef};

/// Generated qualified name
#[derive(Debug, Clone)]
pub struct Name {
    pub prefix: String,
    pub uri: String,
    pub local: String,
}

/// Generated schema type for typed end-element and attribute events
pub type Typed = Option<(String, String)>;

/// Generated content below the root element
#[derive(Debug, Clone)]
pub enum Tree {
    Element {
        name: Name,
        attributes: Vec<(Name, String, Typed)>,
        declarations: Vec<(String, String)>,
        children: Vec<Tree>,
        type_name: Typed,
    },
    Text(String),
    Comment(String),
    Pi(String, String),
}

/// Unqualified, prefixed, or in the default namespace when `default` is set
fn name(default: bool) -> impl Strategy<Value = Name> {
    let bindings: Vec<(&str, &str)> = if default {
        vec![("", ""), ("p", "urn:p"), ("q", "urn:q"), ("", "urn:d")]
    } else {
        vec![("", ""), ("p", "urn:p"), ("q", "urn:q")]
    };
    (proptest::sample::select(bindings), "[a-z]{1,3}").prop_map(|((prefix, uri), local)| Name {
        prefix: prefix.to_string(),
        uri: uri.to_string(),
        local,
    })
}

fn typed() -> impl Strategy<Value = Typed> {
    proptest::option::weighted(
        0.3,
        (Just("urn:types"), "[a-z]{1,4}").prop_map(|(uri, local)| (uri.to_string(), local)),
    )
}

fn leaf() -> impl Strategy<Value = Tree> {
    prop_oneof![
        "[a-z]{1,4}".prop_map(Tree::Text),
        "[a-z ]{0,5}".prop_map(Tree::Comment),
        ("[a-z]{1,3}", "[a-z]{0,3}").prop_map(|(t, v)| Tree::Pi(t, v)),
    ]
}

fn declaration() -> impl Strategy<Value = (String, String)> {
    (prop_oneof![Just("p"), Just("q"), Just("")], "[a-z]{0,3}")
        .prop_map(|(prefix, tail)| {
            let uri = if tail.is_empty() { String::new() } else { format!("urn:{}", tail) };
            (prefix.to_string(), uri)
        })
}

pub fn arb_tree() -> impl Strategy<Value = Tree> {
    leaf().prop_recursive(4, 48, 5, |inner| {
        (
            name(true),
            vec((name(false), "[a-z0-9]{0,3}", typed()), 0..3),
            vec(declaration(), 0..2),
            vec(inner, 0..5),
            typed(),
        )
            .prop_map(|(name, attributes, declarations, children, type_name)| Tree::Element {
                name,
                attributes,
                declarations,
                children,
                type_name,
            })
    })
}

fn push_events(tree: &Tree, out: &mut Vec<Event>) {
    match tree {
        Tree::Element {
            name,
            attributes,
            declarations,
            children,
            type_name,
        } => {
            out.push(Event::start_element(&name.prefix, &name.uri, &name.local));
            for (attr, value, attr_type) in attributes {
                out.push(match attr_type {
                    Some((uri, local)) => Event::attribute_typed(
                        &attr.prefix,
                        &attr.uri,
                        &attr.local,
                        value,
                        TypeRef::new(uri, local),
                    ),
                    None => Event::attribute(&attr.prefix, &attr.uri, &attr.local, value),
                });
            }
            for (prefix, uri) in declarations {
                out.push(Event::namespace(prefix, uri));
            }
            for child in children {
                push_events(child, out);
            }
            out.push(match type_name {
                Some((uri, local)) => {
                    Event::end_element_typed(&name.prefix, &name.uri, &name.local, TypeRef::new(uri, local))
                }
                None => Event::end_element(&name.prefix, &name.uri, &name.local),
            });
        }
        Tree::Text(value) => out.push(Event::text(value)),
        Tree::Comment(value) => out.push(Event::comment(value)),
        Tree::Pi(target, value) => out.push(Event::processing_instruction(target, value)),
    }
}

/// A complete document: a document node around one `root` element that
/// declares the `p` prefix, so descendants inherit a binding
pub fn arb_document() -> impl Strategy<Value = Vec<Event>> {
    (vec(("[a-z]{1,3}", "[a-z]{0,3}"), 0..3), vec(arb_tree(), 0..6)).prop_map(|(attributes, children)| {
        let mut events = vec![
            Event::start_document("urn:generated", "UTF-8"),
            Event::start_element("", "", "root"),
        ];
        for (local, value) in &attributes {
            events.push(Event::attribute("", "", local, value));
        }
        events.push(Event::namespace("p", "urn:p"));
        for child in &children {
            push_events(child, &mut events);
        }
        events.push(Event::end_element("", "", "root"));
        events.push(Event::end_document());
        events
    })
}

/// Bring a stream into the form a built document replays: adjacent text
/// merged, empty text dropped, absent types made explicit
pub fn normalize(events: &[Event]) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        match event {
            Event::Text(value) if value.is_empty() => {}
            Event::Text(value) => {
                if let Some(Event::Text(prev)) = out.last_mut() {
                    prev.push_str(value);
                } else {
                    out.push(event.clone());
                }
            }
            Event::EndElement {
                prefix,
                uri,
                local,
                type_name: None,
            } => out.push(Event::EndElement {
                prefix: prefix.clone(),
                uri: uri.clone(),
                local: local.clone(),
                type_name: Some(SchemaType::from(TypeRef::UNTYPED)),
            }),
            Event::Attribute {
                prefix,
                uri,
                local,
                value,
                type_name: None,
            } => out.push(Event::Attribute {
                prefix: prefix.clone(),
                uri: uri.clone(),
                local: local.clone(),
                value: value.clone(),
                type_name: Some(SchemaType::from(TypeRef::UNTYPED_ATOMIC)),
            }),
            Event::End => {}
            other => out.push(other.clone()),
        }
    }
    out
}

/// Positions of every element record
pub fn element_ids(view: &DocumentView<'_>) -> Vec<NodeId> {
    (0..view.nodes().len() as NodeId)
        .filter(|&id| view.node(id).is_some_and(|n| n.is_element()))
        .collect()
}
