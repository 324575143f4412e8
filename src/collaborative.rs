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

//! Collaborative preference scores. The scorer itself is trained elsewhere, this module only
//! consumes its prediction interface.

use crate::config::DEFAULT_THRESHOLD;
use crate::dataset::{IdDictionary, TrainingSet};
use crate::error::RecoError;
use crate::profile::UserProfiles;
use crate::recommend::Recommender;
use crate::types::{self, ItemId, ScoredItem, UserId};

/// Estimates how much a user will like an item.
pub trait CollaborativeScorer {

    /// Raw ids of all items known to the scorer.
    fn catalog(&self) -> &[ItemId];

    fn knows_user(&self, user: UserId) -> bool;

    /// Fails with `RecoError::UnknownItem` for items never seen during fitting, which is
    /// different from a defined score of zero.
    fn predict_one(&self, user: UserId, item: ItemId) -> Result<f64, RecoError>;

    /// Scores the whole catalog for a known user, descending.
    fn predict(&self, user: UserId) -> Result<Vec<ScoredItem>, RecoError> {
        if !self.knows_user(user) {
            return Err(RecoError::UnknownUser(user));
        }

        let mut scored_items = Vec::with_capacity(self.catalog().len());

        for &item in self.catalog() {
            scored_items.push(ScoredItem::new(item, self.predict_one(user, item)?));
        }

        types::sort_descending(&mut scored_items);

        Ok(scored_items)
    }
}

/// Bias and latent factors of a single user or item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Factors {
    pub id: u32,
    #[serde(default)]
    pub bias: f64,
    pub factors: Vec<f64>,
}

/// Persisted form of a biased latent-factor model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatentFactors {
    pub global_mean: f64,
    pub users: Vec<Factors>,
    pub items: Vec<Factors>,
}

/// Biased matrix factorization predictor: `mean + b_u + b_i + p_u . q_i`, clipped to `[0,1]`.
/// Users without factors are estimated from the global mean and the item bias alone.
#[derive(Clone, Debug)]
pub struct FactorModel {
    global_mean: f64,
    users: IdDictionary,
    items: IdDictionary,
    user_factors: Vec<Factors>,
    item_factors: Vec<Factors>,
}

impl FactorModel {

    pub fn new(latent_factors: LatentFactors) -> Result<Self, RecoError> {

        let LatentFactors { global_mean, users: user_factors, items: item_factors } = latent_factors;

        let dimension = user_factors.iter()
            .chain(item_factors.iter())
            .map(|factors| factors.factors.len())
            .next()
            .unwrap_or(0);

        for factors in user_factors.iter().chain(item_factors.iter()) {
            if factors.factors.len() != dimension {
                return Err(RecoError::InvalidConfig(format!(
                    "factors of id {} have dimension {}, expected {}",
                    factors.id, factors.factors.len(), dimension)));
            }
        }

        let mut users = IdDictionary::new();
        for factors in user_factors.iter() {
            users.insert(factors.id);
        }

        let mut items = IdDictionary::new();
        for factors in item_factors.iter() {
            items.insert(factors.id);
        }

        // Ids must be unique, otherwise inner indices and factor rows diverge
        if users.len() != user_factors.len() || items.len() != item_factors.len() {
            return Err(RecoError::InvalidConfig("duplicate ids in latent factors".to_string()));
        }

        Ok(FactorModel { global_mean, users, items, user_factors, item_factors })
    }

    pub fn num_users(&self) -> usize {
        self.users.len()
    }
}

impl CollaborativeScorer for FactorModel {

    fn catalog(&self) -> &[ItemId] {
        self.items.raw_ids()
    }

    fn knows_user(&self, user: UserId) -> bool {
        self.users.contains(user)
    }

    fn predict_one(&self, user: UserId, item: ItemId) -> Result<f64, RecoError> {

        let item_index = self.items.inner(item).ok_or(RecoError::UnknownItem(item))?;
        let item_factors = &self.item_factors[item_index as usize];

        let mut estimate = self.global_mean + item_factors.bias;

        if let Some(user_index) = self.users.inner(user) {
            let user_factors = &self.user_factors[user_index as usize];

            let interaction: f64 = user_factors.factors.iter()
                .zip(item_factors.factors.iter())
                .map(|(p, q)| p * q)
                .sum();

            estimate += user_factors.bias + interaction;
        }

        Ok(estimate.max(0.0).min(1.0))
    }
}

/// Recommends purely by collaborative score, leaving out items from the user's training history.
pub struct CollaborativeRecommender<S> {
    scorer: S,
    profiles: UserProfiles,
}

impl<S: CollaborativeScorer> CollaborativeRecommender<S> {
    pub fn new(scorer: S) -> Self {
        CollaborativeRecommender { scorer, profiles: UserProfiles::default() }
    }
}

impl<S: CollaborativeScorer> Recommender for CollaborativeRecommender<S> {

    fn fit(&mut self, training: &TrainingSet) {
        self.profiles = UserProfiles::build(training, DEFAULT_THRESHOLD);
    }

    fn predict(&self, user: UserId) -> Result<Vec<ScoredItem>, RecoError> {

        let profile = self.profiles.of(user);

        match self.scorer.predict(user) {
            Ok(scored_items) => Ok(scored_items.into_iter()
                .filter(|scored_item| !profile.has_interacted_with(scored_item.item))
                .collect()),
            Err(RecoError::UnknownUser(_)) => Ok(Vec::new()),
            Err(error) => Err(error),
        }
    }
}
