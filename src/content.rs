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

use std::f64::NEG_INFINITY;
use std::sync::Arc;

use crate::dataset::TrainingSet;
use crate::error::RecoError;
use crate::neighbors;
use crate::profile::{UserProfile, UserProfiles};
use crate::recommend::Recommender;
use crate::similarity::SimilarityMatrix;
use crate::types::{self, ItemId, ScoredItem, UserId};

/// Union of the `num_similar` nearest neighbors of all positive items of a user, without the
/// items the user already interacted with. Candidates appear in the order in which they are first
/// encountered: positives in training order, neighbors by descending similarity.
pub fn content_candidates(
    similarities: &SimilarityMatrix,
    profile: &UserProfile,
    num_similar: usize,
) -> Result<Vec<ItemId>, RecoError> {

    let mut candidates = Vec::new();
    let mut seen = types::new_item_set(profile.positives.len() * num_similar);

    for &positive_item in profile.positives.iter() {
        for candidate in neighbors::most_similar(similarities, positive_item, num_similar)? {
            if !profile.has_interacted_with(candidate) && seen.insert(candidate) {
                candidates.push(candidate);
            }
        }
    }

    Ok(candidates)
}

/// Ranks the content candidates of a user by their highest similarity to any positive item.
pub struct ContentBasedRecommender {
    similarities: Arc<SimilarityMatrix>,
    threshold: f64,
    num_similar: usize,
    profiles: UserProfiles,
}

impl ContentBasedRecommender {

    pub fn new(similarities: Arc<SimilarityMatrix>, threshold: f64, num_similar: usize) -> Self {
        ContentBasedRecommender {
            similarities,
            threshold,
            num_similar,
            profiles: UserProfiles::default(),
        }
    }
}

impl Recommender for ContentBasedRecommender {

    fn fit(&mut self, training: &TrainingSet) {
        self.profiles = UserProfiles::build(training, self.threshold);
    }

    fn predict(&self, user: UserId) -> Result<Vec<ScoredItem>, RecoError> {

        let profile = self.profiles.of(user);
        let candidates = content_candidates(&self.similarities, profile, self.num_similar)?;

        let mut scored_items = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let mut score = NEG_INFINITY;
            for &positive_item in profile.positives.iter() {
                score = score.max(self.similarities.get(positive_item, candidate)?);
            }
            scored_items.push(ScoredItem::new(candidate, score));
        }

        types::sort_descending(&mut scored_items);

        Ok(scored_items)
    }
}
