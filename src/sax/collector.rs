//! Event Collector
//!
//! Implements `EventHandler` by recording every event it receives.

use std::convert::Infallible;

use super::events::{Event, SchemaType};
use super::handler::{EventHandler, TypeRef};

/// Handler that gathers events into a vector
#[derive(Debug, Default, Clone)]
pub struct EventCollector {
    events: Vec<Event>,
}

impl EventCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Create with estimated capacity
    pub fn with_capacity(events: usize) -> Self {
        Self {
            events: Vec::with_capacity(events),
        }
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take the collected events, leaving the collector empty
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Get number of collected events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    fn push(&mut self, event: Event) -> Result<(), Infallible> {
        self.events.push(event);
        Ok(())
    }
}

impl EventHandler for EventCollector {
    type Error = Infallible;

    fn start_document(&mut self, uri: &str, encoding: &str) -> Result<(), Infallible> {
        self.push(Event::start_document(uri, encoding))
    }

    fn end_document(&mut self) -> Result<(), Infallible> {
        self.push(Event::EndDocument)
    }

    fn start_element(&mut self, prefix: &str, uri: &str, local: &str) -> Result<(), Infallible> {
        self.push(Event::start_element(prefix, uri, local))
    }

    fn end_element(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), Infallible> {
        self.push(Event::EndElement {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            local: local.to_string(),
            type_name: type_name.map(SchemaType::from),
        })
    }

    fn processing_instruction(&mut self, target: &str, value: &str) -> Result<(), Infallible> {
        self.push(Event::processing_instruction(target, value))
    }

    fn text(&mut self, value: &str) -> Result<(), Infallible> {
        self.push(Event::text(value))
    }

    fn comment(&mut self, value: &str) -> Result<(), Infallible> {
        self.push(Event::comment(value))
    }

    fn attribute(
        &mut self,
        prefix: &str,
        uri: &str,
        local: &str,
        value: &str,
        type_name: Option<TypeRef<'_>>,
    ) -> Result<(), Infallible> {
        self.push(Event::Attribute {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            local: local.to_string(),
            value: value.to_string(),
            type_name: type_name.map(SchemaType::from),
        })
    }

    fn namespace(&mut self, prefix: &str, uri: &str) -> Result<(), Infallible> {
        self.push(Event::namespace(prefix, uri))
    }

    fn end(&mut self) -> Result<(), Infallible> {
        self.push(Event::End)
    }
}
