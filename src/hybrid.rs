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

use std::sync::Arc;

use crate::collaborative::CollaborativeScorer;
use crate::content;
use crate::dataset::TrainingSet;
use crate::error::RecoError;
use crate::profile::UserProfiles;
use crate::recommend::Recommender;
use crate::similarity::SimilarityMatrix;
use crate::types::{self, ItemId, ScoredItem, UserId};

/// Fuses content similarity and collaborative scores into a single ranking.
///
/// Content similarity only selects candidates: the neighbors of the user's positive items are
/// scored by the collaborative scorer and, if they reach the threshold, ranked first. All other
/// catalog items the user has not seen follow, also scored collaboratively and filtered by the
/// same threshold. A content candidate always outranks a fallback item, whatever their scores.
pub struct HybridRecommender<S> {
    similarities: Arc<SimilarityMatrix>,
    scorer: S,
    threshold: f64,
    num_similar: usize,
    profiles: UserProfiles,
}

impl<S: CollaborativeScorer> HybridRecommender<S> {

    pub fn new(
        similarities: Arc<SimilarityMatrix>,
        scorer: S,
        threshold: f64,
        num_similar: usize,
    ) -> Self {
        HybridRecommender {
            similarities,
            scorer,
            threshold,
            num_similar,
            profiles: UserProfiles::default(),
        }
    }

    /// Collaborative scores of the given items which reach the threshold, descending. Items the
    /// scorer does not know are left out rather than scored with zero.
    fn score_and_filter<I>(&self, user: UserId, items: I) -> Result<Vec<ScoredItem>, RecoError>
        where I: IntoIterator<Item=ItemId> {

        let mut scored_items = Vec::new();

        for item in items {
            match self.scorer.predict_one(user, item) {
                Ok(score) => {
                    if score >= self.threshold {
                        scored_items.push(ScoredItem::new(item, score));
                    }
                },
                Err(RecoError::UnknownItem(_)) => {},
                Err(error) => return Err(error),
            }
        }

        types::sort_descending(&mut scored_items);

        Ok(scored_items)
    }
}

impl<S: CollaborativeScorer> Recommender for HybridRecommender<S> {

    fn fit(&mut self, training: &TrainingSet) {
        self.profiles = UserProfiles::build(training, self.threshold);
    }

    fn predict(&self, user: UserId) -> Result<Vec<ScoredItem>, RecoError> {

        let profile = self.profiles.of(user);

        let candidates =
            content::content_candidates(&self.similarities, profile, self.num_similar)?;

        let mut recommendations = self.score_and_filter(user, candidates)?;

        let mut recommended = types::new_item_set(recommendations.len());
        recommended.extend(recommendations.iter().map(|scored_item| scored_item.item));

        let remaining_items = self.scorer.catalog()
            .iter()
            .cloned()
            .filter(|item| !profile.has_interacted_with(*item) && !recommended.contains(item));

        let fallback = self.score_and_filter(user, remaining_items)?;

        recommendations.extend(fallback);

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {

    use fnv::{FnvHashMap, FnvHashSet};

    use super::*;
    use crate::dataset::Interaction;
    use crate::types::MultiVector;

    /// Scores from a fixed table. Pairs missing from the table count as unknown items.
    struct FixedScores {
        catalog: Vec<ItemId>,
        scores: FnvHashMap<(UserId, ItemId), f64>,
    }

    impl FixedScores {
        fn new(catalog: Vec<ItemId>, scores: Vec<((UserId, ItemId), f64)>) -> Self {
            FixedScores { catalog, scores: scores.into_iter().collect() }
        }
    }

    impl CollaborativeScorer for FixedScores {
        fn catalog(&self) -> &[ItemId] {
            &self.catalog
        }

        fn knows_user(&self, user: UserId) -> bool {
            self.scores.keys().any(|(known_user, _)| *known_user == user)
        }

        fn predict_one(&self, user: UserId, item: ItemId) -> Result<f64, RecoError> {
            self.scores.get(&(user, item)).cloned().ok_or(RecoError::UnknownItem(item))
        }
    }

    fn within_epsilon(value: f64, expected: f64) -> bool {
        (value - expected).abs() < std::f64::EPSILON
    }

    /// Item 1 is the unique nearest neighbor of item 0.
    fn three_items() -> Arc<SimilarityMatrix> {
        let embeddings: Vec<MultiVector> = vec![
            vec![vec![1.0, 0.0]],
            vec![vec![0.9, 0.1]],
            vec![vec![0.1, 0.9]],
        ];

        Arc::new(SimilarityMatrix::build(&embeddings, 1).unwrap())
    }

    #[test]
    fn content_candidate_above_threshold() {
        let scorer = FixedScores::new(vec![0, 1, 2], vec![
            ((5, 0), 0.8),
            ((5, 1), 0.9),
            ((5, 2), 0.1),
        ]);

        let training = TrainingSet::from_interactions(vec![Interaction::new(5, 0, 1.0)]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.5, 1);
        hybrid.fit(&training);

        let recommended = hybrid.predict(5).unwrap();

        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].item, 1);
        assert!(within_epsilon(recommended[0].score, 0.9));
    }

    #[test]
    fn content_candidates_outrank_fallback_items() {
        let scorer = FixedScores::new(vec![0, 1, 2], vec![
            ((5, 1), 0.6),
            ((5, 2), 0.95),
        ]);

        let training = TrainingSet::from_interactions(vec![Interaction::new(5, 0, 1.0)]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.5, 1);
        hybrid.fit(&training);

        let recommended = hybrid.predict(5).unwrap();

        assert_eq!(types::item_ids(&recommended), vec![1, 2]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let scorer = FixedScores::new(vec![0, 1, 2], vec![
            ((5, 1), 0.5),
            ((5, 2), 0.4999),
        ]);

        let training = TrainingSet::from_interactions(vec![Interaction::new(5, 0, 0.5)]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.5, 2);
        hybrid.fit(&training);

        assert_eq!(types::item_ids(&hybrid.predict(5).unwrap()), vec![1]);
    }

    #[test]
    fn users_without_positives_get_the_collaborative_ranking() {
        let scorer = FixedScores::new(vec![0, 1, 2], vec![
            ((5, 1), 0.6),
            ((5, 2), 0.7),
        ]);

        let training = TrainingSet::from_interactions(vec![Interaction::new(5, 0, 0.2)]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.5, 1);
        hybrid.fit(&training);

        assert_eq!(types::item_ids(&hybrid.predict(5).unwrap()), vec![2, 1]);
    }

    #[test]
    fn unknown_users_get_the_whole_catalog() {
        let scorer = FixedScores::new(vec![0, 1, 2], vec![
            ((9, 0), 0.55),
            ((9, 1), 0.65),
            ((9, 2), 0.75),
        ]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.5, 1);
        hybrid.fit(&TrainingSet::default());

        assert_eq!(types::item_ids(&hybrid.predict(9).unwrap()), vec![2, 1, 0]);
    }

    #[test]
    fn unknown_items_are_left_out() {
        // Item 2 has no score for user 5
        let scorer = FixedScores::new(vec![0, 1, 2], vec![((5, 1), 0.6)]);

        let training = TrainingSet::from_interactions(vec![Interaction::new(5, 0, 0.1)]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.0, 1);
        hybrid.fit(&training);

        assert_eq!(types::item_ids(&hybrid.predict(5).unwrap()), vec![1]);
    }

    #[test]
    fn empty_catalog_yields_empty_list() {
        let scorer = FixedScores::new(vec![], vec![]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.5, 1);
        hybrid.fit(&TrainingSet::default());

        assert!(hybrid.predict(1).unwrap().is_empty());
    }

    #[test]
    fn no_training_items_and_no_duplicates() {
        let embeddings: Vec<MultiVector> = (0..12)
            .map(|item| vec![vec![(item % 3) as f32, (item % 5) as f32 * 0.5, 1.0]])
            .collect();
        let similarities = Arc::new(SimilarityMatrix::build(&embeddings, 2).unwrap());

        let mut scores = Vec::new();
        for user in 0..4 {
            for item in 0..12 {
                scores.push(((user, item), ((user * 7 + item * 3) % 10) as f64 / 10.0));
            }
        }
        let scorer = FixedScores::new((0..12).collect(), scores);

        let training = TrainingSet::from_interactions(
            (0..4_u32).flat_map(|user| {
                (0..3_u32).map(move |offset| {
                    let item = (user * 3 + offset * 2) % 12;
                    Interaction::new(user, item, if offset == 0 { 0.9 } else { 0.3 })
                })
            }));

        let mut hybrid = HybridRecommender::new(similarities, scorer, 0.3, 3);
        hybrid.fit(&training);

        for user in 0..5 {
            let recommended = hybrid.predict(user).unwrap();

            let training_items: FnvHashSet<ItemId> =
                training.ratings_of(user).into_iter().map(|(item, _)| item).collect();
            let mut seen = FnvHashSet::default();

            for scored_item in recommended.iter() {
                assert!(!training_items.contains(&scored_item.item));
                assert!(seen.insert(scored_item.item));
                assert!(scored_item.score >= 0.3);
            }
        }
    }

    #[test]
    fn out_of_range_positives_fail() {
        let scorer = FixedScores::new(vec![0, 1, 2, 3], vec![((5, 1), 0.6)]);

        let training = TrainingSet::from_interactions(vec![Interaction::new(5, 3, 0.9)]);

        let mut hybrid = HybridRecommender::new(three_items(), scorer, 0.5, 1);
        hybrid.fit(&training);

        assert!(hybrid.predict(5).is_err());
    }
}
