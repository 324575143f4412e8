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

//! Hybrid item recommendations: candidates come from late-interaction content similarity between
//! multi-vector item embeddings, they are reranked by a collaborative scorer and backed by a
//! collaborative ranking of the rest of the catalog. The resulting rankings are evaluated with
//! top-K ranking metrics.

extern crate csv;
extern crate fnv;
extern crate getopts;
extern crate num_cpus;
extern crate rand;
extern crate scoped_pool;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate tracing_subscriber;

pub mod types;
pub mod error;
pub mod config;
pub mod dataset;
pub mod split;
pub mod similarity;
pub mod neighbors;
pub mod profile;
pub mod recommend;
pub mod collaborative;
pub mod content;
pub mod hybrid;
pub mod metrics;
pub mod evaluation;
pub mod io;
pub mod utils;
pub mod cli;

mod usage_tests;

pub use collaborative::{CollaborativeRecommender, CollaborativeScorer, FactorModel};
pub use config::Config;
pub use content::ContentBasedRecommender;
pub use dataset::{Interaction, TrainingSet};
pub use error::RecoError;
pub use evaluation::{Evaluator, Report};
pub use hybrid::HybridRecommender;
pub use recommend::Recommender;
pub use similarity::SimilarityMatrix;
pub use types::ScoredItem;
