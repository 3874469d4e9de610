use std::collections::HashMap;

use blake3::Hash;

use crate::widget::{SlotName, WidgetIdentity};

/// Content fingerprint used to recognise identical markup.
pub fn fingerprint(markup: &str) -> Hash {
    blake3::hash(markup.as_bytes())
}

/// Markup computed for one widget identity.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub identity: WidgetIdentity,
    pub markup: String,
    hash: Hash,
}

impl CacheEntry {
    fn new(identity: WidgetIdentity, markup: String) -> Self {
        let hash = fingerprint(&markup);
        Self {
            identity,
            markup,
            hash,
        }
    }

    pub fn fingerprint(&self) -> Hash {
        self.hash
    }

    /// Entry may be served for `identity`.
    fn serves(&self, identity: &WidgetIdentity) -> bool {
        self.identity.is_complete() && self.identity == *identity
    }
}

/// At most one entry per slot. Entries never expire on their own.
#[derive(Debug, Default)]
pub struct MarkupCache {
    entries: HashMap<SlotName, CacheEntry>,
}

impl MarkupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.entries.get(slot).map(|entry| entry.markup.as_str())
    }

    /// Identity-checked read. An entry with incomplete identity fields is a
    /// forced miss.
    pub fn lookup(&self, slot: &str, identity: &WidgetIdentity) -> Option<&CacheEntry> {
        self.entries
            .get(slot)
            .filter(|entry| entry.serves(identity))
    }

    pub fn put(
        &mut self,
        slot: impl Into<SlotName>,
        identity: WidgetIdentity,
        markup: impl Into<String>,
    ) -> &CacheEntry {
        use std::collections::hash_map::Entry;

        let entry = CacheEntry::new(identity, markup.into());
        match self.entries.entry(slot.into()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(entry),
        }
    }

    pub fn invalidate(&mut self, slot: &str) -> Option<CacheEntry> {
        self.entries.remove(slot)
    }

    pub fn fingerprint(&self, slot: &str) -> Option<Hash> {
        self.entries.get(slot).map(CacheEntry::fingerprint)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.entries.contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(version: &str) -> WidgetIdentity {
        WidgetIdentity::new("nav", version)
    }

    #[test]
    fn put_overwrites_the_single_slot_entry() {
        let mut cache = MarkupCache::new();
        cache.put("header", nav("1.0.0"), "M1");
        cache.put("header", nav("1.0.1"), "M2");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("header"), Some("M2"));
        assert_eq!(cache.fingerprint("header"), Some(fingerprint("M2")));
    }

    #[test]
    fn lookup_requires_matching_identity() {
        let mut cache = MarkupCache::new();
        cache.put("header", nav("1.0.0"), "M1");

        assert_eq!(
            cache.lookup("header", &nav("1.0.0")).map(|e| e.markup.as_str()),
            Some("M1")
        );
        assert!(cache.lookup("header", &nav("1.0.1")).is_none());
        assert!(cache.lookup("footer", &nav("1.0.0")).is_none());
    }

    #[test]
    fn incomplete_identity_is_a_forced_miss() {
        let mut cache = MarkupCache::new();
        cache.put("header", WidgetIdentity::new("nav", ""), "broken");

        assert!(cache.contains("header"));
        assert!(cache.lookup("header", &WidgetIdentity::new("nav", "")).is_none());
    }

    #[test]
    fn invalidate_removes_entry() {
        let mut cache = MarkupCache::new();
        cache.put("header", nav("1.0.0"), "M1");
        cache.put("footer", nav("1.0.0"), "F1");

        let removed = cache.invalidate("header").unwrap();
        assert_eq!(removed.markup, "M1");
        assert_eq!(cache.get("header"), None);
        assert_eq!(cache.get("footer"), Some("F1"));
        assert!(cache.invalidate("header").is_none());
        assert!(!cache.is_empty());
    }
}
