// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Grouped counts over categorical post fields
//!
//! Keys keep first-occurrence order and are compared by exact string
//! equality, without trimming or case folding.

use crate::posts::{Post, TextField, MISSING_TEXT};
use serde::Serialize;
use std::collections::HashMap;

/// Insertion-ordered map from category value to occurrence count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderedCounts {
    entries: Vec<(String, usize)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl OrderedCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`, appending it if unseen
    pub fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.values().sum()
    }
}

/// Count posts per value of `field`.
///
/// A post missing the field is counted under [`MISSING_TEXT`].
pub fn compute_category_counts(posts: &[Post], field: TextField) -> OrderedCounts {
    let mut counts = OrderedCounts::new();
    for post in posts {
        counts.increment(post.text_or_missing(field));
    }
    counts
}

/// Count misinformation posts per content category.
///
/// Only posts whose flag is exactly `"True"` are counted.
pub fn compute_misinfo_by_category(posts: &[Post]) -> OrderedCounts {
    let mut counts = OrderedCounts::new();
    for post in posts.iter().filter(|p| p.is_flagged()) {
        counts.increment(post.text(TextField::ContentCategory).unwrap_or(MISSING_TEXT));
    }
    counts
}
