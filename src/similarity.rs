/**
 * HybridReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::cmp;
use std::f64::NEG_INFINITY;

use scoped_pool::Pool;

use crate::error::RecoError;
use crate::types::{ItemId, MultiVector};

/// Dense all-pairs content similarity between items. Entry `(i, j)` is the late-interaction
/// score of item `i` against item `j`, the diagonal holds negative infinity so that an item is
/// never its own neighbor. Read-only once built.
#[derive(Clone, Debug)]
pub struct SimilarityMatrix {
    num_items: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {

    /// Computes the matrix from one multi-vector embedding per item, where the position in
    /// `embeddings` is the item id. Rows are filled independently on `pool_size` threads.
    pub fn build(embeddings: &[MultiVector], pool_size: usize) -> Result<Self, RecoError> {

        validate(embeddings)?;

        let num_items = embeddings.len();
        let mut scores = vec![NEG_INFINITY; num_items * num_items];

        let pool = Pool::new(cmp::max(pool_size, 1));

        pool.scoped(|scope| {
            for (item, row) in scores.chunks_mut(num_items).enumerate() {
                scope.execute(move || fill_row(item, row, embeddings));
            }
        });

        pool.shutdown();

        Ok(SimilarityMatrix { num_items, scores })
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn contains(&self, item: ItemId) -> bool {
        (item as usize) < self.num_items
    }

    /// Similarities of `item` against all items, indexed by item id.
    pub fn row(&self, item: ItemId) -> Result<&[f64], RecoError> {
        if !self.contains(item) {
            return Err(RecoError::ItemOutOfRange { item, num_items: self.num_items });
        }

        let start = item as usize * self.num_items;
        Ok(&self.scores[start..start + self.num_items])
    }

    pub fn get(&self, item: ItemId, other_item: ItemId) -> Result<f64, RecoError> {
        if !self.contains(other_item) {
            return Err(RecoError::ItemOutOfRange { item: other_item, num_items: self.num_items });
        }

        Ok(self.row(item)?[other_item as usize])
    }
}

fn validate(embeddings: &[MultiVector]) -> Result<(), RecoError> {

    let dimension = match embeddings.first().and_then(|tokens| tokens.first()) {
        Some(token) => token.len(),
        None if embeddings.is_empty() => return Err(RecoError::EmptyEmbeddings),
        None => return Err(RecoError::EmptyItem { item: 0 }),
    };

    for (item, tokens) in embeddings.iter().enumerate() {
        if tokens.is_empty() {
            return Err(RecoError::EmptyItem { item });
        }

        if let Some(token) = tokens.iter().find(|token| token.len() != dimension) {
            return Err(RecoError::DimensionMismatch { item, expected: dimension, found: token.len() });
        }
    }

    Ok(())
}

fn fill_row(item: usize, row: &mut [f64], embeddings: &[MultiVector]) {
    let tokens = &embeddings[item];

    for (other_item, other_tokens) in embeddings.iter().enumerate() {
        if other_item != item {
            row[other_item] = max_sim(tokens, other_tokens);
        }
    }
}

/// Late-interaction similarity: for every token of `query`, the best dot product against any
/// token of `document`, summed up. Not symmetric in its arguments.
pub fn max_sim(query: &[Vec<f32>], document: &[Vec<f32>]) -> f64 {
    query.iter()
        .map(|query_token| {
            document.iter()
                .map(|document_token| dot(query_token, document_token))
                .fold(NEG_INFINITY, f64::max)
        })
        .sum()
}

#[inline(always)]
fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum()
}
