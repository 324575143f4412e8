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

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::{Interaction, TrainingSet};

/// Randomly holds out `ceil(test_fraction * n)` interactions. The split only depends on the
/// order of the input and the seed.
pub fn train_test_split(
    mut interactions: Vec<Interaction>,
    test_fraction: f64,
    seed: u64,
) -> (TrainingSet, Vec<Interaction>) {

    let mut rng = StdRng::seed_from_u64(seed);
    interactions.shuffle(&mut rng);

    let num_test = num_held_out(interactions.len(), test_fraction);
    let training_interactions = interactions.split_off(num_test);

    (TrainingSet::from_interactions(training_interactions), interactions)
}

fn num_held_out(num_interactions: usize, test_fraction: f64) -> usize {
    let fraction = test_fraction.max(0.0).min(1.0);
    ((num_interactions as f64 * fraction).ceil() as usize).min(num_interactions)
}
