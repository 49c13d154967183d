//! Display name generators for new groups and items.
//!
//! # Invariants
//! - Generated names are `<prefix><n>` with `n` strictly increasing per
//!   generator until the counter saturates at `u64::MAX`.
//! - Observed names only ever raise the counter.

use once_cell::sync::Lazy;
use regex::Regex;

static COUNTER_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)$").expect("valid counter suffix regex"));

/// Produces default names for newly created entities.
pub trait NameGenerator {
    /// Next unused name.
    fn next_name(&mut self) -> String;

    /// Records an existing name so later names continue after it.
    fn observe(&mut self, _name: &str) {}
}

/// `<prefix>1`, `<prefix>2`, ... generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialNameGenerator {
    prefix: String,
    count: u64,
}

impl SequentialNameGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            count: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of the last generated or observed name.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl NameGenerator for SequentialNameGenerator {
    fn next_name(&mut self) -> String {
        self.count = self.count.saturating_add(1);
        format!("{}{}", self.prefix, self.count)
    }

    fn observe(&mut self, name: &str) {
        let Some(suffix) = name.strip_prefix(self.prefix.as_str()) else {
            return;
        };
        let observed = COUNTER_SUFFIX_RE
            .captures(suffix)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse::<u64>().ok());
        if let Some(value) = observed {
            self.count = self.count.max(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NameGenerator, SequentialNameGenerator};

    #[test]
    fn generates_increasing_names() {
        let mut groups = SequentialNameGenerator::new("Group ");
        assert_eq!(groups.next_name(), "Group 1");
        assert_eq!(groups.next_name(), "Group 2");
    }

    #[test]
    fn observe_continues_after_loaded_names() {
        let mut items = SequentialNameGenerator::new("Item");
        items.observe("Item7");
        items.observe("Item3");
        items.observe("Itemx");
        items.observe("Group 40");
        assert_eq!(items.next_name(), "Item8");
    }

    #[test]
    fn counter_saturates_after_largest_observed_name() {
        let mut items = SequentialNameGenerator::new("Item");
        items.observe(&format!("Item{}", u64::MAX));

        assert_eq!(items.next_name(), format!("Item{}", u64::MAX));
        assert_eq!(items.count(), u64::MAX);
    }
}
