//! User-editable set of subsets that count toward "clean" generation.

use std::collections::BTreeSet;

use super::types::SubsetValues;

/// The subsets currently considered clean.
///
/// Clean totals are always derived from per-subset values on demand; the
/// set itself holds no cached sums.
///
/// # Examples
///
/// ```
/// use gridmix::mix::{CleanClassification, SubsetValues};
///
/// let values = SubsetValues::from_pairs([("wind", 100.0), ("solar", 50.0), ("coal", 200.0)]);
/// let mut clean = CleanClassification::new(["wind", "solar"]);
/// assert_eq!(clean.total(&values), 150.0);
///
/// clean.remove("solar");
/// assert_eq!(clean.total(&values), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanClassification {
    keys: BTreeSet<String>,
}

impl CleanClassification {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.keys.remove(key)
    }

    /// Adds or removes `key` according to `clean`.
    pub fn set(&mut self, key: &str, clean: bool) -> bool {
        if clean {
            self.insert(key)
        } else {
            self.remove(key)
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Sum of the values of exactly the member subsets. Members with no
    /// value contribute nothing.
    pub fn total(&self, values: &SubsetValues) -> f64 {
        values
            .iter()
            .filter(|v| self.contains(&v.key))
            .map(|v| v.gwh)
            .sum()
    }
}
