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

use std::time::{Duration, Instant};

pub fn to_millis(duration: Duration) -> u64 {
    (duration.as_secs() * 1_000) + (duration.subsec_nanos() / 1_000_000) as u64
}

/// Runs `f` and returns its result together with the elapsed milliseconds.
pub fn timed<T, F: FnOnce() -> T>(f: F) -> (T, u64) {
    let start = Instant::now();
    let result = f();

    (result, to_millis(start.elapsed()))
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn millis() {
        assert_eq!(to_millis(Duration::new(2, 345_678_901)), 2_345);
        assert_eq!(to_millis(Duration::from_millis(7)), 7);
    }

    #[test]
    fn timed_returns_the_result() {
        let (value, _) = timed(|| 6 * 7);
        assert_eq!(value, 42);
    }
}
