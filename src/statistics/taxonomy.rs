use super::normalizer::normalize_street;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// Flat lookup from normalized street name to the tree categories recorded
/// for that street.
///
/// The street tree survey arrives as a nested mapping of unknown depth whose
/// intermediate keys are purely structural; only the leaves carry data. This
/// index discards the nesting entirely: flattening the same survey twice
/// yields an equal index regardless of shape.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreetTreeIndex {
    streets: HashMap<String, BTreeSet<String>>,
}

impl StreetTreeIndex {
    /// Flattens a category-keyed survey into a street lookup.
    ///
    /// Each top-level key is a category label ("tall", "short", ...); its
    /// subtree is walked to unbounded depth. A key whose value is a
    /// non-negative integer is a street leaf; any other terminal value is a
    /// malformed leaf and is dropped without error.
    pub(crate) fn from_categories(categories: &Map<String, Value>) -> Self {
        let mut index = Self::default();
        for (category, subtree) in categories {
            index.collect(subtree, category);
        }
        index
    }

    fn collect(&mut self, node: &Value, category: &str) {
        if let Value::Object(entries) = node {
            for (key, value) in entries {
                match value {
                    Value::Object(_) => self.collect(value, category),
                    leaf => self.record_leaf(key, leaf, category),
                }
            }
        }
    }

    fn record_leaf(&mut self, street: &str, leaf: &Value, category: &str) {
        // Heights are non-negative integers; floats, strings, nulls, bools,
        // and arrays all mark the leaf as malformed.
        if leaf.as_u64().is_some() {
            self.streets
                .entry(normalize_street(street))
                .or_default()
                .insert(category.to_string());
        }
    }

    pub fn contains_street(&self, street: &str) -> bool {
        self.streets.contains_key(street)
    }

    pub fn has_category(&self, street: &str, category: &str) -> bool {
        self.streets
            .get(street)
            .is_some_and(|categories| categories.contains(category))
    }

    pub fn categories_for(&self, street: &str) -> Option<&BTreeSet<String>> {
        self.streets.get(street)
    }

    pub fn len(&self) -> usize {
        self.streets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }
}
