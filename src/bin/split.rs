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
use std::fs;
use std::path::Path;
use std::process;

use getopts::{Matches, Options};
use log::{error, info};

use hybridreco::cli;
use hybridreco::io;
use hybridreco::split;
use hybridreco::Config;

fn main() {

    cli::init_logging();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Rating matrix (required). Comma separated, one row per user, \
        the first column is ignored.", "PATH");
    opts.optopt("o", "outputdir", "Directory for train.tsv and test.tsv (required).", "PATH");
    opts.optopt("", "test-size", "Fraction of ratings to hold out (optional, defaults to 0.2).",
        "NUMBER");
    opts.optopt("s", "seed", "Seed for shuffling the ratings (optional, defaults to 42).",
        "NUMBER");
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

    let ratings_path = match matches.opt_str("i") {
        Some(path) => path,
        None => return cli::print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        ),
    };

    let output_dir = match matches.opt_str("o") {
        Some(path) => path,
        None => return cli::print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an output directory via --outputdir."),
        ),
    };

    let config = match configure(&matches) {
        Ok(config) => config,
        Err(hint) => return cli::print_usage_and_exit(&program, opts, Some(&hint)),
    };

    if let Err(failure) = split_ratings(&ratings_path, &output_dir, &config) {
        error!("Splitting failed: {}", failure);
        process::exit(1);
    }
}

fn configure(matches: &Matches) -> Result<Config, String> {

    let mut config = cli::load_config(matches)?;
    cli::override_with(matches, "test-size", &mut config.test_fraction)?;
    cli::override_with(matches, "s", &mut config.seed)?;

    config.validate().map_err(|failure| failure.to_string())?;

    Ok(config)
}

fn split_ratings(
    ratings_path: &str,
    output_dir: &str,
    config: &Config,
) -> Result<(), Box<dyn Error>> {

    info!("Reading rating matrix from {}", ratings_path);
    let interactions = io::read_rating_matrix(ratings_path, &config.rating_scale)?;
    info!("Found {} ratings", interactions.len());

    let (training, held_out) =
        split::train_test_split(interactions, config.test_fraction, config.seed);

    info!(
        "Holding out {} ratings, training on {} ratings of {} users and {} items (seed {})",
        held_out.len(),
        training.num_interactions(),
        training.num_users(),
        training.num_items(),
        config.seed,
    );

    let output_dir = Path::new(output_dir);
    fs::create_dir_all(output_dir)?;

    let train_path = output_dir.join("train.tsv");
    io::write_interactions(&train_path, training.interactions())?;
    info!("Wrote training split to {}", train_path.display());

    let test_path = output_dir.join("test.tsv");
    io::write_interactions(&test_path, held_out)?;
    info!("Wrote held-out split to {}", test_path.display());

    Ok(())
}
