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

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::RecoError;
use crate::similarity::SimilarityMatrix;
use crate::types::ItemId;

/// Result type used to find the top-n most similar items via a binary heap
#[derive(PartialEq, Debug)]
struct Neighbor {
    item: ItemId,
    similarity: f64,
}

/// Ordering for our max-heap: the "largest" neighbor is the worst one, so that it sits on top of
/// the heap and gets replaced first. Lower similarity is worse, on equal similarity the larger
/// item id is worse. We need a special implementation here as there is no total order on
/// floating point numbers.
fn cmp_worse(neighbor_a: &Neighbor, neighbor_b: &Neighbor) -> Ordering {
    match neighbor_a.similarity.partial_cmp(&neighbor_b.similarity) {
        Some(Ordering::Less) => Ordering::Greater,
        Some(Ordering::Greater) => Ordering::Less,
        _ => neighbor_a.item.cmp(&neighbor_b.item),
    }
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_worse(self, other)
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(cmp_worse(self, other))
    }
}

/// The `n` items most similar to `item`, by descending similarity, ties broken by ascending item
/// id. Never contains `item` itself, returns fewer than `n` items for small catalogs.
pub fn most_similar(
    similarities: &SimilarityMatrix,
    item: ItemId,
    n: usize,
) -> Result<Vec<ItemId>, RecoError> {

    let row = similarities.row(item)?;

    if n == 0 {
        return Ok(Vec::new());
    }

    let mut heap = BinaryHeap::with_capacity(n);

    for (other_item, similarity) in row.iter().enumerate() {

        let other_item = other_item as ItemId;

        if other_item != item {
            let neighbor = Neighbor { item: other_item, similarity: *similarity };

            if heap.len() < n {
                heap.push(neighbor);
            } else if let Some(mut top) = heap.peek_mut() {
                if neighbor < *top {
                    *top = neighbor;
                }
            }
        }
    }

    Ok(heap.into_sorted_vec().into_iter().map(|neighbor| neighbor.item).collect())
}
