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

extern crate getopts;
extern crate hybridreco;
extern crate log;

use std::env;
use std::error::Error;
use std::process;
use std::sync::Arc;

use getopts::{Matches, Options};
use log::{error, info};

use hybridreco::cli;
use hybridreco::io;
use hybridreco::recommend;
use hybridreco::types::UserId;
use hybridreco::utils;
use hybridreco::{CollaborativeRecommender, Config, ContentBasedRecommender, FactorModel,
    HybridRecommender, Recommender, SimilarityMatrix, TrainingSet};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    Hybrid,
    Content,
    Collaborative,
}

impl Mode {
    fn parse(name: &str) -> Option<Mode> {
        match name {
            "hybrid" => Some(Mode::Hybrid),
            "content" => Some(Mode::Content),
            "collaborative" => Some(Mode::Collaborative),
            _ => None,
        }
    }

    fn needs_embeddings(self) -> bool {
        self != Mode::Collaborative
    }

    fn needs_factors(self) -> bool {
        self != Mode::Content
    }
}

struct Inputs {
    train_path: String,
    embeddings_path: Option<String>,
    factors_path: Option<String>,
    recommendations_path: Option<String>,
    num_items: usize,
}

fn main() {

    cli::init_logging();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("", "train", "Training split (required). One user, item and rating per line, \
        separated by tabs.", "PATH");
    opts.optopt("", "embeddings", "Item embeddings, one JSON object with the item id and its \
        token vectors per line (required for the hybrid and content modes).", "PATH");
    opts.optopt("", "factors", "Latent factor model in JSON format (required for the hybrid and \
        collaborative modes).", "PATH");
    opts.optopt("m", "mode", "Recommendation strategy: hybrid, content or collaborative \
        (optional, defaults to hybrid).", "MODE");
    opts.optopt("k", "num-items", "Number of items to recommend per user (optional, defaults to \
        20).", "NUMBER");
    opts.optopt("o", "outputfile", "Output file for the recommendations (optional, output will \
        be written to stdout by default).", "PATH");
    opts.optopt("t", "threshold", "Positivity threshold (optional, defaults to 0.5).", "NUMBER");
    opts.optopt("n", "num-similar", "Number of similar items retrieved per positively rated \
        item (optional, defaults to 10).", "NUMBER");
    cli::config_option(&mut opts);
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return cli::print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return cli::print_usage_and_exit(&program, opts, None);
    }

    let mode_name = matches.opt_str("m").unwrap_or_else(|| "hybrid".to_owned());
    let mode = match Mode::parse(&mode_name) {
        Some(mode) => mode,
        None => {
            let hint = format!("Unknown mode '{}'.", mode_name);
            return cli::print_usage_and_exit(&program, opts, Some(&hint));
        }
    };

    let config = match configure(&matches) {
        Ok(config) => config,
        Err(hint) => return cli::print_usage_and_exit(&program, opts, Some(&hint)),
    };

    let inputs = match inputs(&matches, mode, &config) {
        Ok(inputs) => inputs,
        Err(hint) => return cli::print_usage_and_exit(&program, opts, Some(&hint)),
    };

    if let Err(failure) = batch_recommend(mode, &inputs, &config) {
        error!("Computing recommendations failed: {}", failure);
        process::exit(1);
    }
}

fn configure(matches: &Matches) -> Result<Config, String> {

    let mut config = cli::load_config(matches)?;
    cli::override_with(matches, "t", &mut config.threshold)?;
    cli::override_with(matches, "n", &mut config.num_similar)?;

    config.validate().map_err(|failure| failure.to_string())?;

    Ok(config)
}

fn inputs(matches: &Matches, mode: Mode, config: &Config) -> Result<Inputs, String> {

    let train_path = matches.opt_str("train")
        .ok_or_else(|| "Please specify the training split via --train.".to_owned())?;

    let embeddings_path = matches.opt_str("embeddings");
    if mode.needs_embeddings() && embeddings_path.is_none() {
        return Err(format!("The {:?} mode requires --embeddings.", mode));
    }

    let factors_path = matches.opt_str("factors");
    if mode.needs_factors() && factors_path.is_none() {
        return Err(format!("The {:?} mode requires --factors.", mode));
    }

    let num_items = matches.opt_get_default("k", config.top_k)
        .map_err(|failure| format!("Problem with option 'k': {}", failure))?;

    Ok(Inputs {
        train_path,
        embeddings_path,
        factors_path,
        recommendations_path: matches.opt_str("o"),
        num_items,
    })
}

fn load_similarities(path: &str, config: &Config) -> Result<Arc<SimilarityMatrix>, Box<dyn Error>> {

    info!("Reading embeddings from {}", path);
    let embeddings = io::read_embeddings(path)?;

    let (similarities, duration) =
        utils::timed(|| SimilarityMatrix::build(&embeddings, config.num_threads));
    let similarities = similarities?;

    info!(
        "Computed similarities between {} items on {} threads in {}ms",
        similarities.num_items(),
        config.num_threads,
        duration,
    );

    Ok(Arc::new(similarities))
}

fn load_factors(path: &str) -> Result<FactorModel, Box<dyn Error>> {
    info!("Loading latent factor model from {}", path);
    let model = io::read_factor_model(path)?;
    info!("Loaded factors for {} users", model.num_users());

    Ok(model)
}

fn batch_recommend(mode: Mode, inputs: &Inputs, config: &Config) -> Result<(), Box<dyn Error>> {

    info!("Reading training split from {}", inputs.train_path);
    let training = TrainingSet::from_interactions(io::read_interactions(&inputs.train_path)?);

    info!(
        "Found {} interactions between {} users and {} items.",
        training.num_interactions(),
        training.num_users(),
        training.num_items(),
    );

    let similarities = match inputs.embeddings_path {
        Some(ref path) if mode.needs_embeddings() => Some(load_similarities(path, config)?),
        _ => None,
    };

    let scorer = match inputs.factors_path {
        Some(ref path) if mode.needs_factors() => Some(load_factors(path)?),
        _ => None,
    };

    let mut recommender: Box<dyn Recommender + Sync> = match (mode, similarities, scorer) {
        (Mode::Hybrid, Some(similarities), Some(scorer)) => Box::new(
            HybridRecommender::new(similarities, scorer, config.threshold, config.num_similar)),
        (Mode::Content, Some(similarities), _) => Box::new(
            ContentBasedRecommender::new(similarities, config.threshold, config.num_similar)),
        (Mode::Collaborative, _, Some(scorer)) => Box::new(CollaborativeRecommender::new(scorer)),
        (mode, _, _) => return Err(format!("Missing inputs for the {:?} mode", mode).into()),
    };

    recommender.fit(&training);

    let users: Vec<UserId> = training.users().raw_ids().to_vec();

    info!("Computing {:?} recommendations for {} users", mode, users.len());

    let (recommendations, duration) = utils::timed(|| {
        recommend::recommend_all(recommender.as_ref(), &users, config.num_threads)
    });

    let mut recommendations = recommendations?;
    for recommended_items in recommendations.iter_mut() {
        recommended_items.truncate(inputs.num_items);
    }

    info!("Recommendations computed in {}ms", duration);

    io::write_recommendations(&users, &recommendations, inputs.recommendations_path.clone())?;

    Ok(())
}
