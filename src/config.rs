//! # Runtime configuration.
//!
//! Provides [`Config`], the centralized settings for one coordinated run.
//!
//! All timings are expressed in *time units* so a whole run can be scaled down
//! (tests use tens of milliseconds per unit) without changing the ratios
//! between hold window, supervisor tick and timeout.
//!
//! ## Sentinel values
//! - `time_unit = 0` → clamped to 1ms by the duration helpers
//! - `tick_units = 0` → clamped to 1 unit (the supervisor never busy-spins)

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Counter increment per reaped worker.
pub const COMPLETION_INCREMENT: u32 = 2;

/// Number of counted workers in a run (producer and consumer).
pub const COUNTED_WORKERS: u32 = 2;

/// Counter value that ends the coordinator's wait loop.
pub const EXPECTED_TOTAL: u32 = COMPLETION_INCREMENT * COUNTED_WORKERS;

/// Global configuration for a run.
///
/// ## Field semantics
/// - `time_unit`: length of one unit
/// - `hold_units`: how long each worker lingers after its transfer
/// - `timeout_units`: supervisor wall-clock budget
/// - `tick_units`: supervisor polling interval
/// - `poll_units`: coordinator wait-loop sleep
/// - `channel_a` / `channel_b`: FIFO paths
/// - `log_file`: append-only log collaborator path
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Length of one time unit.
    pub time_unit: Duration,

    /// Hold window of each worker after it finished its channel work.
    pub hold_units: u32,

    /// Supervisor timeout.
    ///
    /// When elapsed time reaches it, both workers are sent `SIGTERM`.
    pub timeout_units: u32,

    /// Supervisor tick interval.
    pub tick_units: u32,

    /// Coordinator wait-loop interval.
    pub poll_units: u32,

    /// Channel carrying the two inputs from the coordinator to the producer.
    pub channel_a: PathBuf,

    /// Channel carrying the result from the producer to the consumer.
    pub channel_b: PathBuf,

    /// Log file appended to by every process of the run.
    pub log_file: PathBuf,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Duration of `units` time units, saturating at [`Duration::MAX`].
    #[inline]
    pub fn units(&self, units: u32) -> Duration {
        self.time_unit
            .max(Duration::from_millis(1))
            .checked_mul(units)
            .unwrap_or(Duration::MAX)
    }

    /// Worker hold window.
    #[inline]
    pub fn hold(&self) -> Duration {
        self.units(self.hold_units)
    }

    /// Supervisor timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.units(self.timeout_units)
    }

    /// Supervisor tick, never zero.
    #[inline]
    pub fn tick(&self) -> Duration {
        self.units(self.tick_units.max(1))
    }

    /// Coordinator poll interval, never zero.
    #[inline]
    pub fn poll(&self) -> Duration {
        self.units(self.poll_units.max(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Places both channels and the log file under `dir`, keeping their file names.
    pub fn rooted_at(mut self, dir: &Path) -> Self {
        self.channel_a = dir.join(file_name_or(&self.channel_a, "fifo1"));
        self.channel_b = dir.join(file_name_or(&self.channel_b, "fifo2"));
        self.log_file = dir.join(file_name_or(&self.log_file, "logs.txt"));
        self
    }
}

fn file_name_or<'a>(path: &'a Path, fallback: &'a str) -> &'a Path {
    path.file_name().map(Path::new).unwrap_or(Path::new(fallback))
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `time_unit = 1s`
    /// - `hold = 10`, `timeout = 30`, `tick = 1`, `poll = 2` units
    /// - channels `fifo1` / `fifo2`, log `logs.txt` (relative to the working directory)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            time_unit: Duration::from_secs(1),
            hold_units: 10,
            timeout_units: 30,
            tick_units: 1,
            poll_units: 2,
            channel_a: PathBuf::from("fifo1"),
            channel_b: PathBuf::from("fifo2"),
            log_file: PathBuf::from("logs.txt"),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.hold(), Duration::from_secs(10));
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.tick(), Duration::from_secs(1));
        assert_eq!(cfg.poll(), Duration::from_secs(2));
        assert_eq!(EXPECTED_TOTAL, 4);
    }

    #[test]
    fn zero_tick_is_clamped() {
        let cfg = Config {
            time_unit: Duration::ZERO,
            tick_units: 0,
            ..Config::default()
        };
        assert_eq!(cfg.tick(), Duration::from_millis(1));
        assert_eq!(cfg.bus_capacity_clamped(), 1024);
    }

    #[test]
    fn huge_settings_saturate() {
        let cfg = Config {
            time_unit: Duration::from_millis(u64::MAX),
            hold_units: u32::MAX,
            timeout_units: u32::MAX,
            tick_units: u32::MAX,
            poll_units: u32::MAX,
            ..Config::default()
        };
        assert_eq!(cfg.timeout(), Duration::MAX);
        assert_eq!(cfg.hold(), Duration::MAX);
        assert_eq!(cfg.tick(), Duration::MAX);
        assert_eq!(cfg.poll(), Duration::MAX);
        assert_eq!(cfg.units(1), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn rooted_at_moves_paths() {
        let cfg = Config::default().rooted_at(Path::new("/tmp/run"));
        assert_eq!(cfg.channel_a, Path::new("/tmp/run/fifo1"));
        assert_eq!(cfg.channel_b, Path::new("/tmp/run/fifo2"));
        assert_eq!(cfg.log_file, Path::new("/tmp/run/logs.txt"));
    }
}
