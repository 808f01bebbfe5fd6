//! Event Protocol
//!
//! The streaming interface used both to build documents and to replay them.
//! Producers must respect the nesting discipline: every start has a matching
//! end, attributes and namespaces directly follow the start of their element,
//! and `end` is sent exactly once per top-level item.

use crate::dom::ns;

/// Schema type annotation carried by element and attribute events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef<'a> {
    pub uri: &'a str,
    pub name: &'a str,
}

impl<'a> TypeRef<'a> {
    /// `xs:untyped`
    pub const UNTYPED: TypeRef<'static> = TypeRef {
        uri: ns::SCHEMA,
        name: ns::UNTYPED,
    };

    /// `xs:untypedAtomic`
    pub const UNTYPED_ATOMIC: TypeRef<'static> = TypeRef {
        uri: ns::SCHEMA,
        name: ns::UNTYPED_ATOMIC,
    };

    pub const fn new(uri: &'a str, name: &'a str) -> Self {
        TypeRef { uri, name }
    }
}

/// Receiver of tree events.
///
/// Empty strings stand for absent values: no prefix, no namespace URI, no
/// document URI.
pub trait EventHandler {
    type Error;

    fn start_document(&mut self, uri: &str, encoding: &str) -> Result<(), Self::Error>;

    fn end_document(&mut self) -> Result<(), Self::Error>;

    fn start_element(&mut self, prefix: &str, uri: &str, local: &str) -> Result<(), Self::Error>;

    /// End an element. `None` means the element carries no schema type.
    fn end_element(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), Self::Error>;

    fn processing_instruction(&mut self, target: &str, value: &str) -> Result<(), Self::Error>;

    fn text(&mut self, value: &str) -> Result<(), Self::Error>;

    /// Text taken from the first `length` characters of a larger buffer
    fn text_partial(&mut self, buffer: &str, length: usize) -> Result<(), Self::Error> {
        let end = buffer.char_indices().nth(length).map_or(buffer.len(), |(i, _)| i);
        self.text(&buffer[..end])
    }

    fn comment(&mut self, value: &str) -> Result<(), Self::Error>;

    /// An attribute of the element just started, or a parentless attribute
    fn attribute(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        value: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), Self::Error>;

    /// A namespace binding of the element just started, or a parentless namespace
    fn namespace(&mut self, prefix: &str, uri: &str) -> Result<(), Self::Error>;

    /// End of the current top-level item
    fn end(&mut self) -> Result<(), Self::Error>;
}

impl<H: EventHandler + ?Sized> EventHandler for &mut H {
    type Error = H::Error;

    fn start_document(&mut self, uri: &str, encoding: &str) -> Result<(), Self::Error> {
        (**self).start_document(uri, encoding)
    }

    fn end_document(&mut self) -> Result<(), Self::Error> {
        (**self).end_document()
    }

    fn start_element(&mut self, prefix: &str, uri: &str, local: &str) -> Result<(), Self::Error> {
        (**self).start_element(prefix, uri, local)
    }

    fn end_element(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), Self::Error> {
        (**self).end_element(prefix, uri, local, type_name)
    }

    fn processing_instruction(&mut self, target: &str, value: &str) -> Result<(), Self::Error> {
        (**self).processing_instruction(target, value)
    }

    fn text(&mut self, value: &str) -> Result<(), Self::Error> {
        (**self).text(value)
    }

    fn text_partial(&mut self, buffer: &str, length: usize) -> Result<(), Self::Error> {
        (**self).text_partial(buffer, length)
    }

    fn comment(&mut self, value: &str) -> Result<(), Self::Error> {
        (**self).comment(value)
    }

    fn attribute(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        value: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), Self::Error> {
        (**self).attribute(prefix, uri, local, value, type_name)
    }

    fn namespace(&mut self, prefix: &str, uri: &str) -> Result<(), Self::Error> {
        (**self).namespace(prefix, uri)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        (**self).end()
    }
}
