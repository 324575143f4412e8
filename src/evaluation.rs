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

use fnv::FnvHashMap;

use crate::dataset::{Interaction, TrainingSet};
use crate::error::RecoError;
use crate::metrics;
use crate::recommend::{self, Recommender};
use crate::types::{self, ItemId, ItemSet, Rating, ScoredItem, UserId};

/// Aggregated evaluation results. Field names in JSON are the stable metric names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub mae: f64,
    #[serde(rename = "precision@k")]
    pub precision: f64,
    #[serde(rename = "recall@k")]
    pub recall: f64,
    #[serde(rename = "map@k")]
    pub map: f64,
    #[serde(rename = "ndcg@k")]
    pub ndcg: f64,
    #[serde(rename = "diversity@k")]
    pub diversity: f64,
    #[serde(rename = "novelty@k")]
    pub novelty: f64,
    #[serde(rename = "serendipity@k")]
    pub serendipity: f64,
    /// Held-out users whose prediction failed. They take part with an empty ranking.
    #[serde(default)]
    pub failed_users: usize,
}

impl Report {

    /// Metric names and values, in report order.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("mae", self.mae),
            ("precision@k", self.precision),
            ("recall@k", self.recall),
            ("map@k", self.map),
            ("ndcg@k", self.ndcg),
            ("diversity@k", self.diversity),
            ("novelty@k", self.novelty),
            ("serendipity@k", self.serendipity),
        ]
    }
}

/// Ground truth of the held-out users, in order of first appearance.
struct GroundTruth {
    users: Vec<UserId>,
    ratings: Vec<FnvHashMap<ItemId, Rating>>,
}

impl GroundTruth {

    fn from(held_out: &[Interaction]) -> Self {
        let mut positions: FnvHashMap<UserId, usize> = FnvHashMap::default();
        let mut users = Vec::new();
        let mut ratings: Vec<FnvHashMap<ItemId, Rating>> = Vec::new();

        for interaction in held_out.iter() {
            let position = *positions.entry(interaction.user).or_insert_with(|| {
                users.push(interaction.user);
                ratings.push(FnvHashMap::default());
                users.len() - 1
            });

            ratings[position].insert(interaction.item, interaction.rating);
        }

        GroundTruth { users, ratings }
    }

    fn item_sets(&self) -> Vec<ItemSet> {
        self.ratings.iter()
            .map(|ratings_of_user| ratings_of_user.keys().cloned().collect())
            .collect()
    }
}

/// Scores the rankings of a fitted recommender against held-out interactions.
pub struct Evaluator<'a, R: ?Sized> {
    recommender: &'a R,
    num_threads: usize,
}

impl<'a, R: Recommender + Sync + ?Sized> Evaluator<'a, R> {

    pub fn new(recommender: &'a R) -> Self {
        Evaluator { recommender, num_threads: 1 }
    }

    /// Predicts for several users in parallel.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Computes all metrics at cutoff `k`. The training split provides the catalog size for
    /// diversity and the item popularity for novelty and serendipity. A user whose prediction
    /// fails counts with an empty ranking and is tallied in `Report::failed_users`.
    pub fn evaluate(
        &self,
        training: &TrainingSet,
        held_out: &[Interaction],
        k: usize,
    ) -> Result<Report, RecoError> {

        let ground_truth = GroundTruth::from(held_out);
        let truth = ground_truth.item_sets();

        let mut failed_users = 0;

        let recommendations: Vec<Vec<ScoredItem>> =
            recommend::predict_all(self.recommender, &ground_truth.users, self.num_threads)
                .into_iter()
                .map(|outcome| outcome.unwrap_or_else(|_| {
                    failed_users += 1;
                    Vec::new()
                }))
                .collect();

        // Scores of recommended items for which we know the true rating
        let mut true_ratings = Vec::new();
        let mut predicted_ratings = Vec::new();

        for (ratings_of_user, recommended) in ground_truth.ratings.iter().zip(recommendations.iter()) {
            for scored_item in recommended.iter() {
                if let Some(rating) = ratings_of_user.get(&scored_item.item) {
                    true_ratings.push(*rating);
                    predicted_ratings.push(scored_item.score);
                }
            }
        }

        let predicted: Vec<Vec<ItemId>> = recommendations.iter()
            .map(|recommended| types::item_ids(recommended))
            .collect();

        let popularity = training.popularity();

        Ok(Report {
            mae: metrics::mae(&true_ratings, &predicted_ratings),
            precision: mean_per_user(&truth, &predicted, |t, p| metrics::precision_at_k(t, p, k)),
            recall: mean_per_user(&truth, &predicted, |t, p| metrics::recall_at_k(t, p, k)),
            map: metrics::map_at_k(&truth, &predicted, k),
            ndcg: mean_per_user(&truth, &predicted, |t, p| metrics::ndcg_at_k(t, p, k)),
            diversity: metrics::diversity_at_k(&predicted, training.num_items(), k),
            novelty: metrics::novelty_at_k(&predicted, &popularity, k),
            serendipity: mean_per_user(&truth, &predicted, |t, p| {
                metrics::serendipity_at_k(t, p, &popularity, k)
            }),
            failed_users,
        })
    }
}

fn mean_per_user<F>(truth: &[ItemSet], predicted: &[Vec<ItemId>], metric: F) -> f64
    where F: Fn(&ItemSet, &[ItemId]) -> f64 {

    let values: Vec<f64> = truth.iter()
        .zip(predicted.iter())
        .map(|(truth_of_user, predicted_for_user)| metric(truth_of_user, predicted_for_user))
        .collect();

    metrics::mean_of(&values)
}
