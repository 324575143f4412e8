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

use crate::config::RatingScale;
use crate::types::{ItemId, Popularity, Rating, UserId};

/// An observed rating of an item by a user.
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Interaction {
    pub user: UserId,
    pub item: ItemId,
    pub rating: Rating,
}

impl Interaction {
    pub fn new(user: UserId, item: ItemId, rating: Rating) -> Self {
        Interaction { user, item, rating }
    }
}

/// Bidirectional mapping between raw identifiers and consecutive inner indices, assigned in
/// order of first appearance.
#[derive(Clone, Debug, Default)]
pub struct IdDictionary {
    to_inner: FnvHashMap<u32, u32>,
    to_raw: Vec<u32>,
}

impl IdDictionary {

    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the inner index of `raw`, registering it if it has not been seen before.
    pub fn insert(&mut self, raw: u32) -> u32 {
        let next_index = self.to_raw.len() as u32;
        let to_raw = &mut self.to_raw;

        *self.to_inner.entry(raw).or_insert_with(|| {
            to_raw.push(raw);
            next_index
        })
    }

    pub fn inner(&self, raw: u32) -> Option<u32> {
        self.to_inner.get(&raw).cloned()
    }

    pub fn raw(&self, inner: u32) -> Option<u32> {
        self.to_raw.get(inner as usize).cloned()
    }

    pub fn contains(&self, raw: u32) -> bool {
        self.to_inner.contains_key(&raw)
    }

    /// Raw identifiers in inner index order.
    pub fn raw_ids(&self) -> &[u32] {
        &self.to_raw
    }

    pub fn len(&self) -> usize {
        self.to_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_raw.is_empty()
    }
}

/// The training split. Interactions are stored per inner user index as (inner item, rating)
/// pairs, the dictionaries translate back to the raw ids which the rest of the crate works with.
#[derive(Clone, Debug, Default)]
pub struct TrainingSet {
    users: IdDictionary,
    items: IdDictionary,
    user_ratings: Vec<Vec<(u32, Rating)>>,
    // Position of each (inner user, inner item) pair within `user_ratings`
    positions: FnvHashMap<(u32, u32), usize>,
    num_interactions: u64,
}

impl TrainingSet {

    pub fn from_interactions<I>(interactions: I) -> Self
        where I: IntoIterator<Item=Interaction> {

        let mut training = TrainingSet::default();

        for interaction in interactions {
            training.add(interaction);
        }

        training
    }

    fn add(&mut self, interaction: Interaction) {
        let user_index = self.users.insert(interaction.user);
        let item_index = self.items.insert(interaction.item);

        if user_index as usize == self.user_ratings.len() {
            self.user_ratings.push(Vec::with_capacity(10));
        }

        let ratings = &mut self.user_ratings[user_index as usize];

        // At most one rating per user and item, the last one wins
        let known_position = self.positions.get(&(user_index, item_index)).cloned();

        match known_position {
            Some(position) => ratings[position].1 = interaction.rating,
            None => {
                self.positions.insert((user_index, item_index), ratings.len());
                ratings.push((item_index, interaction.rating));
                self.num_interactions += 1;
            }
        }
    }

    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }

    pub fn users(&self) -> &IdDictionary {
        &self.users
    }

    /// Raw ids of all items in the training split.
    pub fn catalog(&self) -> &[ItemId] {
        self.items.raw_ids()
    }

    /// The raw (item, rating) pairs of a user, in the order they were observed. Unknown users
    /// have no ratings.
    pub fn ratings_of(&self, user: UserId) -> Vec<(ItemId, Rating)> {
        match self.users.inner(user) {
            Some(user_index) => self.user_ratings[user_index as usize]
                .iter()
                .filter_map(|&(item_index, rating)| {
                    self.items.raw(item_index).map(|item| (item, rating))
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Iterates over all interactions with raw ids, user by user.
    pub fn interactions<'a>(&'a self) -> impl Iterator<Item=Interaction> + 'a {
        self.user_ratings.iter()
            .enumerate()
            .flat_map(move |(user_index, ratings)| {
                let user = self.users.raw_ids()[user_index];
                ratings.iter().map(move |&(item_index, rating)| {
                    Interaction::new(user, self.items.raw_ids()[item_index as usize], rating)
                })
            })
    }

    /// Interaction count per item, divided by the largest count.
    pub fn popularity(&self) -> Popularity {
        let mut counts = vec![0_u64; self.num_items()];

        for ratings in self.user_ratings.iter() {
            for &(item_index, _) in ratings.iter() {
                counts[item_index as usize] += 1;
            }
        }

        let max_count = counts.iter().cloned().max().unwrap_or(0).max(1) as f64;

        let mut popularity =
            FnvHashMap::with_capacity_and_hasher(self.num_items(), Default::default());

        for (item_index, count) in counts.into_iter().enumerate() {
            if count > 0 {
                popularity.insert(self.items.raw_ids()[item_index], count as f64 / max_count);
            }
        }

        popularity
    }
}

/// Maps a raw rating onto `[0,1]`. Returns `None` for the missing value sentinel.
pub fn normalize_rating(raw: f64, scale: &RatingScale) -> Option<Rating> {
    if raw == scale.missing || raw.is_nan() {
        return None;
    }

    let normalized = (raw - scale.min) / (scale.max - scale.min);

    Some(normalized.max(0.0).min(1.0))
}
