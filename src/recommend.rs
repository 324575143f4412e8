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

use scoped_pool::Pool;

use crate::dataset::TrainingSet;
use crate::error::RecoError;
use crate::types::{ScoredItem, UserId};

/// A recommendation strategy. Each strategy owns the state it derives from the training split.
pub trait Recommender {

    /// (Re)builds the per-user state from a training split. An empty split yields empty state.
    fn fit(&mut self, training: &TrainingSet);

    /// Ranked recommendations for a user, descending by score, free of duplicates and of items
    /// the user interacted with during training. Users unknown at fit time are not an error.
    fn predict(&self, user: UserId) -> Result<Vec<ScoredItem>, RecoError>;
}

/// Computes recommendations for many users on a pool of `pool_size` threads. The result holds
/// one list per user, in the order of `users`, and fails with the first failing user.
pub fn recommend_all<R>(
    recommender: &R,
    users: &[UserId],
    pool_size: usize,
) -> Result<Vec<Vec<ScoredItem>>, RecoError>
    where R: Recommender + Sync + ?Sized {

    predict_all(recommender, users, pool_size).into_iter().collect()
}

/// Like `recommend_all`, but keeps the outcome of every user, so that a failure for one user
/// does not discard the recommendations of the others.
pub fn predict_all<R>(
    recommender: &R,
    users: &[UserId],
    pool_size: usize,
) -> Vec<Result<Vec<ScoredItem>, RecoError>>
    where R: Recommender + Sync + ?Sized {

    if users.is_empty() {
        return Vec::new();
    }

    let mut outcomes: Vec<Option<Result<Vec<ScoredItem>, RecoError>>> =
        users.iter().map(|_| None).collect();

    let pool_size = cmp::max(pool_size, 1);
    let users_per_job = (users.len() + pool_size - 1) / pool_size;

    let pool = Pool::new(pool_size);

    pool.scoped(|scope| {
        for (users_of_job, slots) in users.chunks(users_per_job)
            .zip(outcomes.chunks_mut(users_per_job)) {

            scope.execute(move || {
                for (user, slot) in users_of_job.iter().zip(slots.iter_mut()) {
                    *slot = Some(recommender.predict(*user));
                }
            });
        }
    });

    pool.shutdown();

    outcomes.into_iter()
        .map(|slot| slot.unwrap_or_else(|| Ok(Vec::new())))
        .collect()
}
