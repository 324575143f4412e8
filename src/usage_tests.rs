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

#[cfg(test)]
mod tests {

    use std::sync::Arc;

    use crate::collaborative::{Factors, LatentFactors};
    use crate::split;
    use crate::{CollaborativeRecommender, ContentBasedRecommender, Evaluator, FactorModel,
        HybridRecommender, Interaction, Recommender, SimilarityMatrix, TrainingSet};

    #[test]
    fn programmatic_usage() {

        /* Every item comes with a multi-vector embedding: one vector per token of its text. In
           practice, these are produced by a late-interaction text encoder. */
        let embeddings = vec![
            vec![vec![1.0, 0.0, 0.0], vec![0.8, 0.2, 0.0]],
            vec![vec![0.9, 0.1, 0.0]],
            vec![vec![0.0, 1.0, 0.0], vec![0.1, 0.9, 0.0]],
            vec![vec![0.0, 0.8, 0.2]],
            vec![vec![0.0, 0.0, 1.0]],
            vec![vec![0.1, 0.0, 0.9], vec![0.0, 0.1, 0.9]],
        ];

        /* We compute the content similarity between all pairs of items. Each row is computed on
           its own, so we can spread the work over several threads. */
        let similarities = Arc::new(SimilarityMatrix::build(&embeddings, 2).unwrap());

        /* The collaborative scorer is a biased latent factor model, trained elsewhere. */
        let scorer = FactorModel::new(LatentFactors {
            global_mean: 0.5,
            users: (0..4)
                .map(|user| Factors { id: user, bias: 0.0, factors: vec![user as f64 * 0.1, 0.2] })
                .collect(),
            items: (0..6)
                .map(|item| Factors { id: item, bias: item as f64 * 0.02, factors: vec![0.5, 0.5] })
                .collect(),
        }).unwrap();

        /* Ratings are already normalised to [0,1]. We hold out a fifth of them for evaluation. */
        let interactions: Vec<Interaction> = (0..4_u32)
            .flat_map(|user| (0..6_u32).map(move |item| {
                Interaction::new(user, item, ((user + item) % 4) as f64 / 3.0)
            }))
            .collect();

        let (training, held_out) = split::train_test_split(interactions, 0.2, 42);

        println!(
            "Training on {} interactions of {} users with {} items, {} held out.",
            training.num_interactions(),
            training.num_users(),
            training.num_items(),
            held_out.len(),
        );

        let mut hybrid = HybridRecommender::new(similarities.clone(), scorer.clone(), 0.5, 2);
        hybrid.fit(&training);

        let mut content = ContentBasedRecommender::new(similarities, 0.5, 2);
        content.fit(&training);

        let mut collaborative = CollaborativeRecommender::new(scorer);
        collaborative.fit(&training);

        for user in 0..5 {
            let recommended = hybrid.predict(user).unwrap();
            let seen: Vec<u32> =
                training.ratings_of(user).into_iter().map(|(item, _)| item).collect();

            for scored_item in recommended.iter() {
                assert!(!seen.contains(&scored_item.item));
                assert!(scored_item.score >= 0.5);
            }

            println!("Hybrid recommendations for user {}: {:?}", user, recommended);
        }

        let report = Evaluator::new(&hybrid).with_threads(2).evaluate(&training, &held_out, 3).unwrap();

        for (name, value) in report.metrics() {
            println!("{}: {:.4}", name, value);
            assert!(value.is_finite());
            assert!(value >= 0.0);
        }

        assert!(report.diversity <= 1.0);

        /* The other strategies plug into the same evaluation. */
        Evaluator::new(&content).evaluate(&training, &held_out, 3).unwrap();
        Evaluator::new(&collaborative).evaluate(&training, &held_out, 3).unwrap();
    }

    #[test]
    fn content_candidates_reranked_by_collaborative_scores() {

        /* Item 1 is the nearest neighbor of item 0, item 2 points in another direction. */
        let embeddings = vec![
            vec![vec![1.0, 0.0]],
            vec![vec![0.95, 0.05]],
            vec![vec![0.0, 1.0]],
        ];

        let similarities = Arc::new(SimilarityMatrix::build(&embeddings, 1).unwrap());

        /* The user likes item 1 (0.9) but not item 2 (0.1). */
        let scorer = FactorModel::new(LatentFactors {
            global_mean: 0.5,
            users: vec![Factors { id: 7, bias: 0.0, factors: vec![1.0] }],
            items: vec![
                Factors { id: 0, bias: 0.0, factors: vec![0.0] },
                Factors { id: 1, bias: 0.0, factors: vec![0.4] },
                Factors { id: 2, bias: 0.0, factors: vec![-0.4] },
            ],
        }).unwrap();

        let training = TrainingSet::from_interactions(vec![Interaction::new(7, 0, 1.0)]);

        let mut hybrid = HybridRecommender::new(similarities, scorer, 0.5, 1);
        hybrid.fit(&training);

        let recommended = hybrid.predict(7).unwrap();

        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].item, 1);
        assert!((recommended[0].score - 0.9).abs() < 0.000001);
    }
}
