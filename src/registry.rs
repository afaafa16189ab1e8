use std::collections::HashMap;
use std::sync::Arc;

use crate::source::FileSource;

/// Directory of file sources, keyed by identifier
///
/// Built mutably during startup, then frozen behind an `Arc` and shared
/// by any number of coordinators. Lookups on the frozen registry need no
/// locking; registration after freezing is ruled out by the `&mut`
/// receiver.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn FileSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an identifier to a source. Re-registering the same identifier
    /// replaces the prior binding.
    pub fn register(&mut self, identifier: impl Into<String>, source: Arc<dyn FileSource>) {
        self.sources.insert(identifier.into(), source);
    }

    /// Look up a source by identifier
    ///
    /// An unregistered identifier is an expected condition (startup
    /// ordering, configuration typos) and reads as `None`, never an error.
    pub fn get(&self, identifier: &str) -> Option<Arc<dyn FileSource>> {
        self.sources.get(identifier).cloned()
    }

    /// Identifiers currently registered, in no particular order
    pub fn identifiers(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySource;

    #[test]
    fn lookup_returns_registered_source() {
        let mut registry = SourceRegistry::new();
        let source = Arc::new(MemorySource::new("fixtures"));
        registry.register("fixtures", source.clone());

        let found = registry.get("fixtures").expect("source should be registered");
        assert!(Arc::ptr_eq(
            &(source as Arc<dyn FileSource>),
            &found
        ));
    }

    #[test]
    fn lookup_of_unregistered_identifier_is_none() {
        let registry = SourceRegistry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn reregistering_replaces_prior_binding() {
        let mut registry = SourceRegistry::new();
        let first = Arc::new(MemorySource::new("first"));
        let second = Arc::new(MemorySource::new("second"));

        registry.register("store", first);
        registry.register("store", second.clone());

        assert_eq!(registry.len(), 1);
        let found = registry.get("store").unwrap();
        assert!(Arc::ptr_eq(&(second as Arc<dyn FileSource>), &found));
    }
}
