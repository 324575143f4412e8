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

use std::fmt::Display;
use std::process;
use std::str::FromStr;

use getopts::{Matches, Options};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Logs to stderr at level `info`, `RUST_LOG` takes precedence. Records from the `log` macros
/// are forwarded to the subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the usage, preceded by the hint if there is one. Exits with status 2 on a hint and
/// with status 0 otherwise.
pub fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) -> ! {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));

    process::exit(if hint.is_some() { 2 } else { 0 })
}

pub fn config_option(opts: &mut Options) {
    opts.optopt("c", "config", "JSON configuration file (optional). Command line options take \
        precedence.", "PATH");
}

/// The configuration file given via `--config`, or the defaults.
pub fn load_config(matches: &Matches) -> Result<Config, String> {
    match matches.opt_str("c") {
        Some(path) => Config::from_file(&path)
            .map_err(|failure| format!("Cannot read configuration {}: {}", path, failure)),
        None => Ok(Config::default()),
    }
}

/// Overwrites `target` with the value of `option`, if the option was given.
pub fn override_with<T>(matches: &Matches, option: &str, target: &mut T) -> Result<(), String>
    where T: FromStr, T::Err: Display {

    let value = matches.opt_get(option)
        .map_err(|failure| format!("Problem with option '{}': {}", option, failure))?;

    if let Some(value) = value {
        *target = value;
    }

    Ok(())
}
