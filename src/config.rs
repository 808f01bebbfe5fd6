//! Configuration
//!
//! Plain settings structs with sensible defaults.

use std::num::NonZeroUsize;

/// Default number of documents kept by a [`DocumentCache`](crate::cache::DocumentCache)
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(n) => n,
    None => unreachable!(),
};

/// Initial capacities of the three record arrays of a builder.
///
/// Arrays double whenever they fill up, so these only tune the first
/// allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    pub node_capacity: usize,
    pub attribute_capacity: usize,
    pub namespace_capacity: usize,
}

impl BuilderConfig {
    /// Create a config with explicit capacities
    pub const fn new(node_capacity: usize, attribute_capacity: usize, namespace_capacity: usize) -> Self {
        BuilderConfig {
            node_capacity,
            attribute_capacity,
            namespace_capacity,
        }
    }

    /// Capacities for a document holding a single leaf node
    pub const fn single_node() -> Self {
        Self::new(1, 0, 0)
    }

    /// Capacities for a document holding a single parentless attribute
    pub const fn single_attribute() -> Self {
        Self::new(0, 1, 0)
    }

    /// Capacities for a document holding a single parentless namespace
    pub const fn single_namespace() -> Self {
        Self::new(0, 0, 1)
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new(1000, 500, 5)
    }
}

/// Flags controlling event playback from a finalized tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOptions {
    /// Emit namespace events. The top-level element then reports its full
    /// inherited namespace context.
    pub preserve_namespaces: bool,
    /// Report stored schema types instead of `xs:untyped`/`xs:untypedAtomic`
    pub preserve_type: bool,
}

impl EventOptions {
    pub const fn new(preserve_namespaces: bool, preserve_type: bool) -> Self {
        EventOptions {
            preserve_namespaces,
            preserve_type,
        }
    }
}

impl Default for EventOptions {
    fn default() -> Self {
        Self::new(true, true)
    }
}
