//! SAX-style Event Protocol
//!
//! Documents are built from, and replayed into, a stream of tree events.
//!
//! ## Architecture
//!
//! ```text
//! producer ---> EventHandler ---> Builder ---> Document
//!                                                 |
//!                 EventHandler <--- to_events <---+
//! ```
//!
//! ## Handlers
//!
//! - `Builder` - builds one document
//! - `SequenceBuilder` - builds one document per top-level item
//! - `EventCollector` - records events for later replay

pub mod collector;
pub mod events;
pub mod handler;
pub mod player;
pub mod sequence;

pub use collector::EventCollector;
pub use events::{replay, Event, SchemaType};
pub use handler::{EventHandler, TypeRef};
pub use sequence::SequenceBuilder;
