use std::collections::BTreeMap;

/// Outcome counts keyed by reason, accumulated over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<String, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Key-wise sum, for combining per-worker histograms.
    pub fn merge(&mut self, other: &Histogram) {
        for (key, count) in &other.counts {
            *self.counts.entry(key.clone()).or_insert(0) += count;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }

    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_merge() {
        let mut left = Histogram::new();
        left.increment("valid");
        left.increment("valid");
        left.increment("No verb gov");

        let mut right = Histogram::new();
        right.increment("valid");
        right.increment("Dep N");

        let mut merged = left.clone();
        merged.merge(&right);
        assert_eq!(merged.get("valid"), 3);
        assert_eq!(merged.get("Dep N"), 1);
        assert_eq!(merged.get("no candidates"), 0);
        assert_eq!(merged.total(), 5);

        // Order of merging does not matter
        let mut other_way = right.clone();
        other_way.merge(&left);
        assert_eq!(merged, other_way);

        let keys: Vec<_> = merged.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["Dep N", "No verb gov", "valid"]);
    }
}
