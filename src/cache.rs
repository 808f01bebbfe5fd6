//! Document Cache
//!
//! Keeps recently resolved documents by URI so repeated lookups of the same
//! resource share one finalized document. Least recently used documents
//! are evicted first.

use std::num::NonZeroUsize;

use log::debug;
use lru::LruCache;

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::dom::Document;

/// LRU map from document URI to finalized document
pub struct DocumentCache {
    documents: LruCache<String, Document>,
    hits: u64,
    misses: u64,
}

impl DocumentCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        DocumentCache {
            documents: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a document, marking it as recently used
    pub fn get(&mut self, uri: &str) -> Option<Document> {
        match self.documents.get(uri) {
            Some(document) => {
                self.hits += 1;
                debug!("document cache hit for {}", uri);
                Some(document.clone())
            }
            None => {
                self.misses += 1;
                debug!("document cache miss for {}", uri);
                None
            }
        }
    }

    /// Store a document, returning the one it replaced
    pub fn insert(&mut self, uri: impl Into<String>, document: Document) -> Option<Document> {
        let uri = uri.into();
        if self.documents.len() == self.documents.cap().get() && !self.documents.contains(&uri) {
            if let Some((evicted, _)) = self.documents.peek_lru() {
                debug!("document cache evicting {}", evicted);
            }
        }
        self.documents.put(uri, document)
    }

    /// Return the cached document, or load and cache it
    pub fn get_or_load<F, E>(&mut self, uri: &str, load: F) -> Result<Document, E>
    where
        F: FnOnce(&str) -> Result<Document, E>,
    {
        if let Some(document) = self.get(uri) {
            return Ok(document);
        }
        let document = load(uri)?;
        self.insert(uri, document.clone());
        Ok(document)
    }

    pub fn remove(&mut self, uri: &str) -> Option<Document> {
        self.documents.pop(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains(uri)
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.documents.cap()
    }

    /// Lookup counters as `(hits, misses)`
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCache")
            .field("len", &self.documents.len())
            .field("capacity", &self.documents.cap())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Builder;
    use crate::sax::Event;

    fn doc(name: &str) -> Document {
        Builder::from_events(&[Event::start_element("", "", name), Event::end_element("", "", name)]).unwrap()
    }

    #[test]
    fn test_hit_and_miss() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut cache = DocumentCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
        let a = doc("a");
        assert!(cache.insert("urn:a", a.clone()).is_none());
        assert_eq!(cache.get("urn:a"), Some(a));
        assert_eq!(cache.get("urn:b"), None);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_eviction_order() {
        let mut cache = DocumentCache::new(NonZeroUsize::new(2).unwrap());
        cache.insert("urn:a", doc("a"));
        cache.insert("urn:b", doc("b"));
        cache.get("urn:a");
        cache.insert("urn:c", doc("c"));
        assert!(cache.contains("urn:a"));
        assert!(!cache.contains("urn:b"));
        assert!(cache.contains("urn:c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_or_load_once() {
        let mut cache = DocumentCache::default();
        let mut loads = 0;
        for _ in 0..3 {
            let result: Result<Document, String> = cache.get_or_load("urn:x", |_| {
                loads += 1;
                Ok(doc("x"))
            });
            assert_eq!(result.unwrap().root().unwrap().local_name(), Some("x"));
        }
        assert_eq!(loads, 1);

        let failed: Result<Document, String> = cache.get_or_load("urn:y", |uri| Err(format!("no {}", uri)));
        assert_eq!(failed.unwrap_err(), "no urn:y");
        assert!(!cache.contains("urn:y"));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = DocumentCache::default();
        cache.insert("urn:a", doc("a"));
        cache.insert("urn:b", doc("b"));
        assert!(cache.remove("urn:a").is_some());
        assert!(cache.remove("urn:a").is_none());
        cache.clear();
        assert!(cache.is_empty());
    }
}
