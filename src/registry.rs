// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The deduplicated set of category labels a user has ever written.
//!
//! Every write path (transactions, notebooks, assets, budgets) funnels its label
//! through [`CategoryRegistry::register`]. The set only grows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical form of a label: trimmed and lower-cased.
pub fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Whether two labels name the same category.
pub fn same_category(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRegistry {
    #[serde(default)]
    categories: BTreeSet<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the normalized label, returning whether it was new. Blank labels are ignored.
    pub fn register(&mut self, label: &str) -> bool {
        let label = normalize(label);
        if label.is_empty() {
            return false;
        }
        self.categories.insert(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.categories.contains(&normalize(label))
    }

    /// Lexicographically sorted labels.
    pub fn all(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for CategoryRegistry {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut registry = CategoryRegistry::new();
        for label in iter {
            registry.register(label);
        }
        registry
    }
}
