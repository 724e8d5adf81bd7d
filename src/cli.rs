//! CLI argument parsing definitions

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pipevisor::{Config, Role};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// First integer written into channel A
    #[arg(value_name = "INT1", required_unless_present = "worker", allow_negative_numbers = true)]
    pub first: Option<i32>,

    /// Second integer written into channel A
    #[arg(value_name = "INT2", required_unless_present = "worker", allow_negative_numbers = true)]
    pub second: Option<i32>,

    /// Run as worker process (internal use)
    #[arg(long, value_name = "ROLE", hide = true, conflicts_with_all = ["first", "second"])]
    pub worker: Option<Role>,

    /// Length of one time unit in milliseconds
    #[arg(long, value_name = "MS", env = "PIPEVISOR_TIME_UNIT_MS")]
    pub time_unit_ms: Option<u64>,

    /// Units each worker lingers after its transfer
    #[arg(long, value_name = "UNITS", env = "PIPEVISOR_HOLD_UNITS")]
    pub hold_units: Option<u32>,

    /// Units before the supervisor terminates the workers
    #[arg(long, value_name = "UNITS", env = "PIPEVISOR_TIMEOUT_UNITS")]
    pub timeout_units: Option<u32>,

    /// Supervisor tick in units
    #[arg(long, value_name = "UNITS", env = "PIPEVISOR_TICK_UNITS")]
    pub tick_units: Option<u32>,

    /// Coordinator wait-loop interval in units
    #[arg(long, value_name = "UNITS", env = "PIPEVISOR_POLL_UNITS")]
    pub poll_units: Option<u32>,

    /// Path of channel A (coordinator to producer)
    #[arg(long, value_name = "PATH", env = "PIPEVISOR_CHANNEL_A")]
    pub channel_a: Option<PathBuf>,

    /// Path of channel B (producer to consumer)
    #[arg(long, value_name = "PATH", env = "PIPEVISOR_CHANNEL_B")]
    pub channel_b: Option<PathBuf>,

    /// Path of the shared log file
    #[arg(long, value_name = "PATH", env = "PIPEVISOR_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Defaults overlaid with whatever was given on the command line or in the environment.
    pub fn config(&self) -> Config {
        let mut cfg = Config::default();
        if let Some(ms) = self.time_unit_ms {
            cfg.time_unit = Duration::from_millis(ms);
        }
        if let Some(n) = self.hold_units {
            cfg.hold_units = n;
        }
        if let Some(n) = self.timeout_units {
            cfg.timeout_units = n;
        }
        if let Some(n) = self.tick_units {
            cfg.tick_units = n;
        }
        if let Some(n) = self.poll_units {
            cfg.poll_units = n;
        }
        if let Some(p) = &self.channel_a {
            cfg.channel_a = p.clone();
        }
        if let Some(p) = &self.channel_b {
            cfg.channel_b = p.clone();
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = p.clone();
        }
        cfg
    }
}

/// One-line usage reported on any argument error.
pub fn usage() -> String {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "pipevisor".to_string());
    format!("Usage: {program} <int1> <int2>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_integers_including_negatives() {
        let cli = Cli::try_parse_from(["pipevisor", "-3", "7"]).unwrap();
        assert_eq!((cli.first, cli.second), (Some(-3), Some(7)));
        assert!(cli.worker.is_none());
    }

    #[test]
    fn wrong_arity_and_garbage_are_rejected() {
        assert!(Cli::try_parse_from(["pipevisor", "3"]).is_err());
        assert!(Cli::try_parse_from(["pipevisor", "3", "7", "9"]).is_err());
        assert!(Cli::try_parse_from(["pipevisor", "3", "seven"]).is_err());
    }

    #[test]
    fn worker_mode_needs_no_integers() {
        let cli = Cli::try_parse_from([
            "pipevisor",
            "--worker",
            "producer",
            "--channel-a",
            "/tmp/x/fifo1",
            "--hold-units",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.worker, Some(Role::Producer));

        let cfg = cli.config();
        assert_eq!(cfg.channel_a, PathBuf::from("/tmp/x/fifo1"));
        assert_eq!(cfg.hold_units, 0);
        assert_eq!(cfg.channel_b, Config::default().channel_b);
    }
}
