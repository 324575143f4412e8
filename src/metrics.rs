/*
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

//! Top-K ranking metrics. All of them are defined for a cutoff exceeding the length of the
//! ranking (missing ranks are misses) and for empty ground truth (the metric is zero), so that a
//! single degenerate user can never abort an evaluation.

use crate::types::{self, ItemId, ItemSet, Popularity};

/// Mean absolute error, zero if there are no pairs.
pub fn mae(truth: &[f64], predicted: &[f64]) -> f64 {
    mean(truth.iter().zip(predicted.iter()).map(|(t, p)| (t - p).abs()))
}

fn top_k(predicted: &[ItemId], k: usize) -> &[ItemId] {
    &predicted[..k.min(predicted.len())]
}

fn num_hits(truth: &ItemSet, predicted: &[ItemId], k: usize) -> usize {
    let mut distinct = types::new_item_set(k.min(predicted.len()));
    distinct.extend(top_k(predicted, k).iter().cloned());

    distinct.iter().filter(|item| truth.contains(*item)).count()
}

fn mean<I: Iterator<Item=f64>>(values: I) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 { 0.0 } else { sum / count as f64 }
}

pub fn precision_at_k(truth: &ItemSet, predicted: &[ItemId], k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }

    num_hits(truth, predicted, k) as f64 / k as f64
}

pub fn recall_at_k(truth: &ItemSet, predicted: &[ItemId], k: usize) -> f64 {
    if truth.is_empty() || k == 0 {
        return 0.0;
    }

    num_hits(truth, predicted, k) as f64 / truth.len() as f64
}

/// Sum of the precision at every hit in the top-k, divided by the size of the ground truth (not
/// by the number of hits). A perfect top-k therefore scores below one whenever the ground truth
/// holds more than k items.
pub fn average_precision_at_k(truth: &ItemSet, predicted: &[ItemId], k: usize) -> f64 {
    if truth.is_empty() || k == 0 {
        return 0.0;
    }

    let mut hits = 0;
    let mut sum_of_precisions = 0.0;

    for (index, item) in top_k(predicted, k).iter().enumerate() {
        if truth.contains(item) {
            hits += 1;
            sum_of_precisions += hits as f64 / (index + 1) as f64;
        }
    }

    sum_of_precisions / truth.len() as f64
}

/// Mean average precision over users, `predicted[u]` is the ranking for ground truth `truth[u]`.
/// Users without a ranking count as empty rankings.
pub fn map_at_k(truth: &[ItemSet], predicted: &[Vec<ItemId>], k: usize) -> f64 {
    mean(truth.iter().enumerate().map(|(user, truth_of_user)| {
        let predicted_for_user = predicted.get(user).map(|p| p.as_slice()).unwrap_or(&[]);
        average_precision_at_k(truth_of_user, predicted_for_user, k)
    }))
}

#[inline(always)]
fn discount(rank: usize) -> f64 {
    if rank == 1 { 1.0 } else { 1.0 / ((rank + 1) as f64).log2() }
}

/// Discounted cumulative gain with binary relevance.
pub fn dcg_at_k(truth: &ItemSet, predicted: &[ItemId], k: usize) -> f64 {
    top_k(predicted, k).iter()
        .enumerate()
        .filter(|(_, item)| truth.contains(*item))
        .map(|(index, _)| discount(index + 1))
        .sum()
}

pub fn ndcg_at_k(truth: &ItemSet, predicted: &[ItemId], k: usize) -> f64 {
    if truth.is_empty() || k == 0 {
        return 0.0;
    }

    let ideal_dcg: f64 = (1..=truth.len().min(k)).map(discount).sum();

    if ideal_dcg > 0.0 { dcg_at_k(truth, predicted, k) / ideal_dcg } else { 0.0 }
}

/// Fraction of the catalog which appears in at least one top-k list.
pub fn diversity_at_k(predicted: &[Vec<ItemId>], num_items: usize, k: usize) -> f64 {
    if num_items == 0 {
        return 0.0;
    }

    let mut recommended = types::new_item_set(num_items);
    for predicted_for_user in predicted.iter() {
        recommended.extend(top_k(predicted_for_user, k).iter().cloned());
    }

    recommended.len() as f64 / num_items as f64
}

/// Mean of `1 - popularity` over all recommended items in all top-k lists. Items without a
/// popularity value count as never interacted with.
pub fn novelty_at_k(predicted: &[Vec<ItemId>], popularity: &Popularity, k: usize) -> f64 {
    mean(predicted.iter()
        .flat_map(|predicted_for_user| top_k(predicted_for_user, k).iter())
        .map(|item| 1.0 - popularity_of(popularity, *item)))
}

/// Relevant recommendations in the top-k, weighted by how unpopular they are, divided by k.
pub fn serendipity_at_k(
    truth: &ItemSet,
    predicted: &[ItemId],
    popularity: &Popularity,
    k: usize,
) -> f64 {
    if k == 0 {
        return 0.0;
    }

    let unexpectedness: f64 = top_k(predicted, k).iter()
        .filter(|item| truth.contains(*item))
        .map(|item| 1.0 - popularity_of(popularity, *item))
        .sum();

    unexpectedness / k as f64
}

fn popularity_of(popularity: &Popularity, item: ItemId) -> f64 {
    popularity.get(&item).cloned().unwrap_or(0.0)
}

pub(crate) fn mean_of(values: &[f64]) -> f64 {
    mean(values.iter().cloned())
}
