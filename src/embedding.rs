//! Read-only word similarity index.
//!
//! The index is trained offline and loaded once as an immutable snapshot.
//! Every stored vector is unit length, so cosine similarity reduces to a dot
//! product.
//!
//! # Snapshot format
//! word2vec text format: an optional `<count> <dim>` header line, then one
//! `word v1 v2 .. vD` entry per line.

use crate::error::IndexError;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A ranked query result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub word: &'a str,
    pub similarity: f32,
}

/// Capability consumed by the clue search. Implementations must be safe to
/// share between planner worker threads.
pub trait SimilarityIndex: Sync {
    fn dimension(&self) -> usize;

    fn contains(&self, word: &str) -> bool;

    /// Unit vector for `word`.
    fn vector(&self, word: &str) -> Option<&[f32]>;

    /// The `k` entries most similar to `query`, most similar first.
    fn nearest(&self, query: &[f32], k: usize) -> Vec<Neighbor<'_>>;

    fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        Some(dot(self.vector(a)?, self.vector(b)?))
    }
}

#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale `v` to unit length in place. Returns false for a zero vector.
pub fn normalize(v: &mut [f32]) -> bool {
    let norm = dot(v, v).sqrt();
    if norm <= f32::EPSILON || !norm.is_finite() {
        return false;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    true
}

/// Normalized mean of several unit vectors.
#[must_use]
pub fn mean_direction(vectors: &[&[f32]]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let mut mean = vec![0.0f32; first.len()];
    for v in vectors {
        for (m, x) in mean.iter_mut().zip(v.iter()) {
            *m += x;
        }
    }
    normalize(&mut mean).then_some(mean)
}

/// Dense in-memory index: one row of `dim` floats per word.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    words: Vec<String>,
    lookup: HashMap<String, usize>,
    dim: usize,
    data: Vec<f32>,
}

impl EmbeddingIndex {
    /// Build an index from `(word, vector)` pairs, normalizing each vector.
    /// Later duplicates of a word are ignored.
    pub fn from_entries<I>(entries: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut builder = Builder::default();
        for (word, vector) in entries {
            builder.push(word, vector)?;
        }
        builder.finish()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IndexError> {
        let file = File::open(path)?;
        let index = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded similarity index: {} words, {} dimensions",
            index.len(),
            index.dim
        );
        Ok(index)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, IndexError> {
        let mut builder = Builder::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let values: Result<Vec<f32>, _> = fields.map(str::parse::<f32>).collect();
            let values = values.map_err(|e| IndexError::Malformed {
                line: line_no,
                reason: e.to_string(),
            })?;
            if line_no == 1 && values.len() == 1 && word.parse::<usize>().is_ok() {
                // "<count> <dim>" header
                continue;
            }
            if values.is_empty() {
                return Err(IndexError::Malformed {
                    line: line_no,
                    reason: format!("'{word}' has no vector components"),
                });
            }
            builder.push(word.to_string(), values)?;
        }
        builder.finish()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

impl SimilarityIndex for EmbeddingIndex {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn contains(&self, word: &str) -> bool {
        self.lookup.contains_key(word)
    }

    fn vector(&self, word: &str) -> Option<&[f32]> {
        self.lookup.get(word).map(|&i| self.row(i))
    }

    fn nearest(&self, query: &[f32], k: usize) -> Vec<Neighbor<'_>> {
        if k == 0 || query.len() != self.dim {
            return Vec::new();
        }
        let mut scored: Vec<(usize, f32)> = (0..self.words.len())
            .map(|i| (i, dot(query, self.row(i))))
            .collect();
        // Descending similarity; equal scores keep index order so results are reproducible.
        let by_rank = |a: &(usize, f32), b: &(usize, f32)| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        };
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_rank);
            scored.truncate(k);
        }
        scored.sort_unstable_by(by_rank);
        scored
            .into_iter()
            .map(|(i, similarity)| Neighbor {
                word: &self.words[i],
                similarity,
            })
            .collect()
    }
}

#[derive(Default)]
struct Builder {
    words: Vec<String>,
    lookup: HashMap<String, usize>,
    dim: Option<usize>,
    data: Vec<f32>,
}

impl Builder {
    fn push(&mut self, word: String, mut vector: Vec<f32>) -> Result<(), IndexError> {
        let expected = *self.dim.get_or_insert(vector.len());
        if vector.len() != expected {
            return Err(IndexError::DimensionMismatch {
                word,
                expected,
                got: vector.len(),
            });
        }
        if self.lookup.contains_key(&word) {
            return Ok(());
        }
        if !normalize(&mut vector) {
            return Err(IndexError::ZeroVector(word));
        }
        self.lookup.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.data.extend_from_slice(&vector);
        Ok(())
    }

    fn finish(self) -> Result<EmbeddingIndex, IndexError> {
        match self.dim {
            Some(dim) if !self.words.is_empty() => Ok(EmbeddingIndex {
                words: self.words,
                lookup: self.lookup,
                dim,
                data: self.data,
            }),
            _ => Err(IndexError::Empty),
        }
    }
}
