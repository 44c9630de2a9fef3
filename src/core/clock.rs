// src/core/clock.rs

//! Timing of actions for `--bench`.

use std::process::{Command, Stdio};
use std::time::Instant;

use crate::system::dialect::Dialect;

/// Measures how long one action takes, the way the active shell would.
///
/// Shells with an in-process clock are timed with `Instant`. The others pay
/// for spawning `date` on both ends, which adds process-start noise to the
/// reading.
#[derive(Debug)]
pub enum Stopwatch {
    /// Timed in-process.
    Monotonic(Instant),
    /// Timed with `date`.
    External {
        /// Wall-clock start, in milliseconds.
        started_ms: u128,
        /// In-process start, used when `date` fails later on.
        fallback: Instant,
    },
}

impl Stopwatch {
    /// Starts timing the way `dialect` would.
    pub fn start(dialect: Dialect) -> Self {
        if dialect.has_monotonic_clock() {
            return Self::Monotonic(Instant::now());
        }
        match external_now_ms() {
            Some(started_ms) => Self::External {
                started_ms,
                fallback: Instant::now(),
            },
            None => {
                log::debug!("External time source unavailable; timing in-process.");
                Self::Monotonic(Instant::now())
            }
        }
    }

    /// Milliseconds since [`Stopwatch::start`].
    pub fn elapsed_ms(&self) -> u128 {
        match self {
            Self::Monotonic(start) => start.elapsed().as_millis(),
            Self::External {
                started_ms,
                fallback,
            } => match external_now_ms() {
                Some(now) => now.saturating_sub(*started_ms),
                None => fallback.elapsed().as_millis(),
            },
        }
    }
}

/// Current wall-clock time in milliseconds, read from `date +%s%N`.
fn external_now_ms() -> Option<u128> {
    let output = Command::new("date")
        .arg("+%s%N")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    // Some `date` implementations print `%N` literally; that fails to parse.
    let nanos: u128 = String::from_utf8_lossy(&output.stdout).trim().parse().ok()?;
    Some(nanos / 1_000_000)
}
