//! Sorted prefix set with logarithmic starts-with lookup.

/// Answers "does this string start with any of the stored keys" in logarithmic
/// time.
///
/// Keys are kept sorted and prefix-free: inserting a key already covered by an
/// existing one is a no-op, and inserting a key that covers existing ones
/// replaces them. Because no stored key is a prefix of another, the only
/// candidate for any probe is the greatest key not larger than it.
#[derive(Debug, Clone, Default)]
pub struct PrefixSet {
    keys: Vec<String>,
}

impl PrefixSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, maintaining the sorted prefix-free invariant.
    pub fn insert(&mut self, key: &str) {
        if key.is_empty() || self.covers(key) {
            return;
        }
        // Keys that start with the new key become redundant.
        self.keys.retain(|existing| !existing.starts_with(key));
        match self.keys.binary_search_by(|existing| existing.as_str().cmp(key)) {
            Ok(_) => {}
            Err(position) => self.keys.insert(position, key.to_string()),
        }
    }

    /// True when `probe` starts with one of the stored keys.
    pub fn covers(&self, probe: &str) -> bool {
        match self
            .keys
            .binary_search_by(|existing| existing.as_str().cmp(probe))
        {
            Ok(_) => true,
            Err(0) => false,
            Err(position) => probe.starts_with(&self.keys[position - 1]),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PrefixSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key.as_ref());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_starts_with() {
        let set: PrefixSet = ["/admin/", "/install/"].into_iter().collect();

        assert!(set.covers("/admin/settings"));
        assert!(set.covers("/install/"));
        assert!(!set.covers("/administrator")); // no partial segment magic, raw prefix only
        assert!(!set.covers("/content"));
    }

    #[test]
    fn test_covered_keys_are_not_stored() {
        let mut set = PrefixSet::new();
        set.insert("/admin/");
        set.insert("/admin/users/");
        assert_eq!(set.len(), 1);
        assert!(set.covers("/admin/users/list"));
    }

    #[test]
    fn test_covering_key_replaces_existing() {
        let mut set = PrefixSet::new();
        set.insert("/admin/users/");
        set.insert("/admin/groups/");
        set.insert("/admin/");
        assert_eq!(set.len(), 1);
        assert!(set.covers("/admin/anything"));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut set = PrefixSet::new();
        set.insert("");
        assert!(set.is_empty());
        assert!(!set.covers("/anything"));
    }

    #[test]
    fn test_exact_match_counts() {
        let set: PrefixSet = ["/ping"].into_iter().collect();
        assert!(set.covers("/ping"));
        assert!(!set.covers("/pin"));
    }
}
