use std::collections::HashSet;
use std::hash::Hash;

/// How a raw search box value is served
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// Too short to search: show the panel's default set
    Default,
    /// Trimmed query to send to the search endpoint
    Search(String),
}

impl QueryMode {
    /// Classify `raw` against the minimum query length (in characters,
    /// after trimming)
    #[must_use]
    pub fn classify(raw: &str, min_len: usize) -> Self {
        let trimmed = raw.trim();
        if trimmed.chars().count() < min_len {
            Self::Default
        } else {
            Self::Search(trimmed.to_string())
        }
    }
}

/// Keep the first item for each key, then at most `limit` items
pub fn dedup_by_key<T, K, F>(items: Vec<T>, limit: usize, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .take(limit)
        .collect()
}
