use std::collections::{HashMap, HashSet};

use super::normalize_title;

/// Books the user has already read.
///
/// Stores raw (trimmed) titles, unique by normalized key. When a
/// normalization-equal title arrives, the first-inserted raw form is kept
/// and the newcomer is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadSet {
    /// Normalized key -> raw title
    entries: HashMap<String, String>,
}

impl ReadSet {
    /// Creates an empty read set
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole set with the non-empty lines of `raw_text`.
    ///
    /// Import always overwrites: prior contents are discarded, never merged.
    pub fn load_or_replace(&mut self, raw_text: &str) {
        let mut entries = HashMap::new();
        for line in raw_text.lines() {
            let title = line.trim();
            if title.is_empty() {
                continue;
            }
            entries
                .entry(normalize_title(title))
                .or_insert_with(|| title.to_string());
        }
        self.entries = entries;
    }

    /// Adds a title, returning whether a new entry was inserted
    pub fn add(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }

        let key = normalize_title(title);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, title.to_string());
        true
    }

    /// Empties the set
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serializes the set as `read.txt`: raw titles sorted lexicographically,
    /// one per line with a trailing newline. Empty set gives an empty string.
    pub fn export(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut out = self.titles().join("\n");
        out.push('\n');
        out
    }

    /// Raw titles sorted lexicographically
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.entries.values().map(String::as_str).collect();
        titles.sort_unstable();
        titles
    }

    /// Owned copy of the raw titles, sorted
    pub fn snapshot(&self) -> Vec<String> {
        self.titles().into_iter().map(str::to_string).collect()
    }

    /// Normalized keys of every stored title
    pub fn normalized_keys(&self) -> HashSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Whether a normalization-equal title is present
    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(&normalize_title(title))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
