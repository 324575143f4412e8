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
use log::{error, info, warn};

use hybridreco::cli;
use hybridreco::io;
use hybridreco::utils;
use hybridreco::{CollaborativeScorer, Config, Evaluator, HybridRecommender, Recommender,
    SimilarityMatrix, TrainingSet};

fn main() {

    cli::init_logging();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("", "train", "Training split (required). One user, item and rating per line, \
        separated by tabs.", "PATH");
    opts.optopt("", "test", "Held-out split (required), same format as the training split.",
        "PATH");
    opts.optopt("", "embeddings", "Item embeddings (required), one JSON object with the item id \
        and its token vectors per line.", "PATH");
    opts.optopt("", "factors", "Latent factor model in JSON format (required).", "PATH");
    opts.optopt("o", "outputfile", "Output file for the metrics (optional, output will be \
        written to stdout by default).", "PATH");
    opts.optopt("k", "top-k", "Cutoff for the top-K metrics (optional, defaults to 20).",
        "NUMBER");
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

    let mut paths = Vec::with_capacity(4);
    for option in ["train", "test", "embeddings", "factors"].iter() {
        match matches.opt_str(option) {
            Some(path) => paths.push(path),
            None => {
                let hint = format!("Please specify the {} file via --{}.", option, option);
                return cli::print_usage_and_exit(&program, opts, Some(&hint));
            }
        }
    }

    let config = match configure(&matches) {
        Ok(config) => config,
        Err(hint) => return cli::print_usage_and_exit(&program, opts, Some(&hint)),
    };

    let result = evaluate(
        &paths[0],
        &paths[1],
        &paths[2],
        &paths[3],
        &config,
        matches.opt_str("o"),
    );

    if let Err(failure) = result {
        error!("Evaluation failed: {}", failure);
        process::exit(1);
    }
}

fn configure(matches: &Matches) -> Result<Config, String> {

    let mut config = cli::load_config(matches)?;
    cli::override_with(matches, "k", &mut config.top_k)?;
    cli::override_with(matches, "t", &mut config.threshold)?;
    cli::override_with(matches, "n", &mut config.num_similar)?;

    config.validate().map_err(|failure| failure.to_string())?;

    Ok(config)
}

fn evaluate(
    train_path: &str,
    test_path: &str,
    embeddings_path: &str,
    factors_path: &str,
    config: &Config,
    metrics_path: Option<String>,
) -> Result<(), Box<dyn Error>> {

    info!("Reading training split from {}", train_path);
    let training = TrainingSet::from_interactions(io::read_interactions(train_path)?);

    info!(
        "Found {} interactions between {} users and {} items.",
        training.num_interactions(),
        training.num_users(),
        training.num_items(),
    );

    let held_out = io::read_interactions(test_path)?;
    info!("Read {} held-out interactions from {}", held_out.len(), test_path);

    info!("Reading embeddings from {}", embeddings_path);
    let embeddings = io::read_embeddings(embeddings_path)?;

    info!("Computing content similarities for {} items on {} threads",
        embeddings.len(), config.num_threads);
    let (similarities, duration) =
        utils::timed(|| SimilarityMatrix::build(&embeddings, config.num_threads));
    let similarities = Arc::new(similarities?);
    info!("Similarity matrix computed in {}ms", duration);

    info!("Loading latent factor model from {}", factors_path);
    let scorer = io::read_factor_model(factors_path)?;

    let num_without_embedding = scorer.catalog().iter()
        .filter(|item| !similarities.contains(**item))
        .count();
    if num_without_embedding > 0 {
        warn!("{} catalog items have no embedding", num_without_embedding);
    }

    let mut hybrid =
        HybridRecommender::new(similarities, scorer, config.threshold, config.num_similar);
    hybrid.fit(&training);

    info!("Evaluating at k={} with threshold {} and {} similar items per positive item",
        config.top_k, config.threshold, config.num_similar);

    let (report, duration) = utils::timed(|| {
        Evaluator::new(&hybrid)
            .with_threads(config.num_threads)
            .evaluate(&training, &held_out, config.top_k)
    });
    let report = report?;
    info!("Evaluation finished in {}ms", duration);

    if report.failed_users > 0 {
        warn!("Prediction failed for {} held-out users, they count with empty rankings",
            report.failed_users);
    }

    for (name, value) in report.metrics() {
        info!("{}: {:.4}", name, value);
    }

    io::write_report(&report, metrics_path)?;

    Ok(())
}
