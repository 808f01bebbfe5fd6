//! Owned Events
//!
//! An owned form of the event protocol, for recording a stream and
//! replaying it later into any handler.

use super::handler::{EventHandler, TypeRef};

/// Owned schema type annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaType {
    pub uri: String,
    pub name: String,
}

impl SchemaType {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        SchemaType {
            uri: uri.into(),
            name: name.into(),
        }
    }

    pub fn as_type_ref(&self) -> TypeRef<'_> {
        TypeRef::new(&self.uri, &self.name)
    }
}

impl From<TypeRef<'_>> for SchemaType {
    fn from(t: TypeRef<'_>) -> Self {
        SchemaType::new(t.uri, t.name)
    }
}

/// A single protocol event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDocument {
        uri: String,
        encoding: String,
    },
    EndDocument,
    StartElement {
        prefix: String,
        uri: String,
        local: String,
    },
    EndElement {
        prefix: String,
        uri: String,
        local: String,
        type_name: Option<SchemaType>,
    },
    ProcessingInstruction {
        target: String,
        value: String,
    },
    Text(String),
    Comment(String),
    Attribute {
        prefix: String,
        uri: String,
        local: String,
        value: String,
        type_name: Option<SchemaType>,
    },
    Namespace {
        prefix: String,
        uri: String,
    },
    End,
}

impl Event {
    pub fn start_document(uri: &str, encoding: &str) -> Self {
        Event::StartDocument {
            uri: uri.to_string(),
            encoding: encoding.to_string(),
        }
    }

    pub fn end_document() -> Self {
        Event::EndDocument
    }

    pub fn start_element(prefix: &str, uri: &str, local: &str) -> Self {
        Event::StartElement {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            local: local.to_string(),
        }
    }

    /// End an element without a type annotation
    pub fn end_element(prefix: &str, uri: &str, local: &str) -> Self {
        Event::EndElement {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            local: local.to_string(),
            type_name: None,
        }
    }

    pub fn end_element_typed(prefix: &str, uri: &str, local: &str, type_name: TypeRef<'_>) -> Self {
        Event::EndElement {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            local: local.to_string(),
            type_name: Some(type_name.into()),
        }
    }

    pub fn processing_instruction(target: &str, value: &str) -> Self {
        Event::ProcessingInstruction {
            target: target.to_string(),
            value: value.to_string(),
        }
    }

    pub fn text(value: &str) -> Self {
        Event::Text(value.to_string())
    }

    pub fn comment(value: &str) -> Self {
        Event::Comment(value.to_string())
    }

    /// An attribute without a type annotation
    pub fn attribute(prefix: &str, uri: &str, local: &str, value: &str) -> Self {
        Event::Attribute {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            local: local.to_string(),
            value: value.to_string(),
            type_name: None,
        }
    }

    pub fn attribute_typed(prefix: &str, uri: &str, local: &str, value: &str, type_name: TypeRef<'_>) -> Self {
        Event::Attribute {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            local: local.to_string(),
            value: value.to_string(),
            type_name: Some(type_name.into()),
        }
    }

    pub fn namespace(prefix: &str, uri: &str) -> Self {
        Event::Namespace {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
        }
    }

    /// Check if this event opens a document or element
    #[inline]
    pub fn is_start(&self) -> bool {
        matches!(self, Event::StartDocument { .. } | Event::StartElement { .. })
    }

    /// Check if this event closes a document or element
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, Event::EndDocument | Event::EndElement { .. })
    }

    /// Deliver this event to a handler
    pub fn send<H: EventHandler + ?Sized>(&self, handler: &mut H) -> Result<(), H::Error> {
        match self {
            Event::StartDocument { uri, encoding } => handler.start_document(uri, encoding),
            Event::EndDocument => handler.end_document(),
            Event::StartElement { prefix, uri, local } => handler.start_element(prefix, uri, local),
            Event::EndElement {
                prefix,
                uri,
                local,
                type_name,
            } => handler.end_element(prefix, uri, local, type_name.as_ref().map(SchemaType::as_type_ref)),
            Event::ProcessingInstruction { target, value } => handler.processing_instruction(target, value),
            Event::Text(value) => handler.text(value),
            Event::Comment(value) => handler.comment(value),
            Event::Attribute {
                prefix,
                uri,
                local,
                value,
                type_name,
            } => handler.attribute(prefix, uri, local, value, type_name.as_ref().map(SchemaType::as_type_ref)),
            Event::Namespace { prefix, uri } => handler.namespace(prefix, uri),
            Event::End => handler.end(),
        }
    }
}

/// Deliver a recorded stream to a handler, stopping at the first error
pub fn replay<'e, H, I>(events: I, handler: &mut H) -> Result<(), H::Error>
where
    H: EventHandler + ?Sized,
    I: IntoIterator<Item = &'e Event>,
{
    for event in events {
        event.send(handler)?;
    }
    Ok(())
}
