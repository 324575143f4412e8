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

use fnv::{FnvHashMap, FnvHashSet};

pub type UserId = u32;
pub type ItemId = u32;

/// Ratings and scores live on the normalised `[0,1]` scale.
pub type Rating = f64;

/// One embedding vector per token of an item's text.
pub type MultiVector = Vec<Vec<f32>>;

pub type ItemSet = FnvHashSet<ItemId>;
pub type Popularity = FnvHashMap<ItemId, f64>;

/// An entry of a ranked recommendation list.
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: ItemId,
    pub score: f64,
}

impl ScoredItem {
    pub fn new(item: ItemId, score: f64) -> Self {
        ScoredItem { item, score }
    }
}

/// Descending comparison of scores. There is no total order on floating point numbers, NaNs
/// compare as equal.
pub fn cmp_descending(score_a: f64, score_b: f64) -> Ordering {
    score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
}

/// Stable descending sort, items with equal scores keep their relative order.
pub fn sort_descending(scored_items: &mut Vec<ScoredItem>) {
    scored_items.sort_by(|a, b| cmp_descending(a.score, b.score));
}

pub fn item_ids(scored_items: &[ScoredItem]) -> Vec<ItemId> {
    scored_items.iter().map(|scored_item| scored_item.item).collect()
}

pub fn new_item_set(capacity: usize) -> ItemSet {
    FnvHashSet::with_capacity_and_hasher(capacity, Default::default())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn sorting_is_descending_and_stable() {
        let mut items = vec![
            ScoredItem::new(1, 0.2),
            ScoredItem::new(2, 0.9),
            ScoredItem::new(3, 0.2),
            ScoredItem::new(4, 0.5),
        ];

        sort_descending(&mut items);

        assert_eq!(item_ids(&items), vec![2, 4, 1, 3]);
    }

    #[test]
    fn nan_does_not_panic() {
        let mut items = vec![ScoredItem::new(1, std::f64::NAN), ScoredItem::new(2, 1.0)];
        sort_descending(&mut items);
        assert_eq!(items.len(), 2);
    }
}
