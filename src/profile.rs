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

use crate::dataset::TrainingSet;
use crate::types::{self, ItemId, ItemSet, UserId};

/// What a recommender knows about a user from the training split.
#[derive(Clone, Debug, Default)]
pub struct UserProfile {
    pub interacted: ItemSet,
    /// Items rated at or above the positivity threshold, in training order
    pub positives: Vec<ItemId>,
}

impl UserProfile {
    pub fn has_interacted_with(&self, item: ItemId) -> bool {
        self.interacted.contains(&item)
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserProfiles {
    profiles: FnvHashMap<UserId, UserProfile>,
    empty: UserProfile,
}

impl UserProfiles {

    pub fn build(training: &TrainingSet, threshold: f64) -> Self {

        let mut profiles =
            FnvHashMap::with_capacity_and_hasher(training.num_users(), Default::default());

        for &user in training.users().raw_ids() {
            let ratings = training.ratings_of(user);

            let mut interacted = types::new_item_set(ratings.len());
            let mut positives = Vec::new();

            for (item, rating) in ratings.into_iter() {
                interacted.insert(item);
                if rating >= threshold {
                    positives.push(item);
                }
            }

            profiles.insert(user, UserProfile { interacted, positives });
        }

        UserProfiles { profiles, empty: UserProfile::default() }
    }

    /// The profile of a user, users unknown at fit time get an empty profile.
    pub fn of(&self, user: UserId) -> &UserProfile {
        self.profiles.get(&user).unwrap_or(&self.empty)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::dataset::Interaction;

    #[test]
    fn positives_use_an_inclusive_threshold() {
        let training = TrainingSet::from_interactions(vec![
            Interaction::new(1, 10, 0.5),
            Interaction::new(1, 11, 0.49),
            Interaction::new(1, 12, 0.8),
        ]);

        let profiles = UserProfiles::build(&training, 0.5);
        let profile = profiles.of(1);

        assert_eq!(profile.positives, vec![10, 12]);
        assert_eq!(profile.interacted.len(), 3);
        assert!(profile.has_interacted_with(11));
    }

    #[test]
    fn unknown_users_have_empty_profiles() {
        let profiles = UserProfiles::build(&TrainingSet::default(), 0.5);

        assert!(profiles.is_empty());
        assert!(profiles.of(7).interacted.is_empty());
        assert!(profiles.of(7).positives.is_empty());
    }
}
