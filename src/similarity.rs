// File: similarity.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::iter;

pub const DEFAULT_NGRAM_SIZE: usize = 8;

/// Sørensen–Dice coefficient over multisets of character n-grams.
///
/// Comparison is case sensitive and whitespace is kept as is. A non-empty
/// text shorter than the n-gram size counts as a single n-gram of its own.
/// Two empty texts score `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct SorensenDice {
    ngram_size: usize,
}

impl Default for SorensenDice {
    fn default() -> Self {
        Self {
            ngram_size: DEFAULT_NGRAM_SIZE,
        }
    }
}

impl SorensenDice {
    pub fn new(ngram_size: usize) -> Self {
        Self {
            ngram_size: ngram_size.max(1),
        }
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    pub fn compare(&self, a: &str, b: &str) -> f64 {
        let (grams_a, total_a) = ngrams(a, self.ngram_size);
        let (grams_b, total_b) = ngrams(b, self.ngram_size);
        dice(&grams_a, total_a, &grams_b, total_b)
    }

    /// Precomputes the n-gram multiset of `text` for repeated comparisons.
    pub fn profile(&self, text: &str) -> NgramProfile {
        let (grams, total) = ngrams(text, self.ngram_size);
        NgramProfile {
            ngram_size: self.ngram_size,
            grams: grams
                .into_iter()
                .map(|(gram, count)| (gram.to_string(), count))
                .collect(),
            total,
        }
    }
}

/// N-gram multiset of one text, built once and scored against many others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramProfile {
    ngram_size: usize,
    grams: HashMap<String, usize>,
    total: usize,
}

impl NgramProfile {
    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    /// Number of n-grams counted with multiplicity.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Similarity of `text` to the profiled text.
    pub fn score(&self, text: &str) -> f64 {
        let (grams, total) = ngrams(text, self.ngram_size);
        dice(&grams, total, &self.grams, self.total)
    }
}

fn dice<A, B>(a: &HashMap<A, usize>, total_a: usize, b: &HashMap<B, usize>, total_b: usize) -> f64
where
    A: Borrow<str> + Eq + Hash,
    B: Borrow<str> + Eq + Hash,
{
    let total = total_a + total_b;
    if total == 0 {
        return 0.0;
    }

    let common: usize = a
        .iter()
        .filter_map(|(gram, count)| {
            b.get(<A as Borrow<str>>::borrow(gram))
                .map(|other| (*count).min(*other))
        })
        .sum();

    (2 * common) as f64 / total as f64
}

/// Counts every contiguous `n`-char window of `text`. Returns the multiset
/// and its cardinality.
fn ngrams(text: &str, n: usize) -> (HashMap<&str, usize>, usize) {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(text.len()))
        .collect();

    let mut grams = HashMap::new();
    if text.is_empty() {
        return (grams, 0);
    }
    if bounds.len() <= n {
        grams.insert(text, 1);
        return (grams, 1);
    }
    for window in bounds.windows(n + 1) {
        *grams.entry(&text[window[0]..window[n]]).or_insert(0) += 1;
    }
    (grams, bounds.len() - n)
}

/// Similarity of two response bodies with the default 8-gram comparator.
pub fn score(a: &str, b: &str) -> f64 {
    SorensenDice::default().compare(a, b)
}

#[cfg(test)]
#[path = "similarity_tests.rs"]
mod tests;
