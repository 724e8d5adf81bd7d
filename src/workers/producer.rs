//! Producer: reads two inputs from channel A and forwards the larger to channel B.

use crate::channel::Channel;
use crate::config::Config;
use crate::error::WorkerError;
use crate::journal::Journal;

use super::{Role, Worker};

/// Producer side of the pipeline.
pub struct Producer<'a> {
    input: Channel,
    output: Channel,
    journal: &'a Journal,
}

impl<'a> Producer<'a> {
    /// Binds the producer to the channels named in `cfg`.
    pub fn new(cfg: &Config, journal: &'a Journal) -> Self {
        Self {
            input: Channel::new(&cfg.channel_a),
            output: Channel::new(&cfg.channel_b),
            journal,
        }
    }

    fn read_inputs(&self) -> Result<(i32, i32), WorkerError> {
        let role = Role::Producer;
        let mut rx = self
            .input
            .open_read()
            .map_err(|source| WorkerError::Open { role, source })?;
        let first = rx
            .read_record()
            .map_err(|source| WorkerError::Transfer { role, source })?;
        let second = rx
            .read_record()
            .map_err(|source| WorkerError::Transfer { role, source })?;
        Ok((first, second))
    }
}

impl Worker for Producer<'_> {
    fn role(&self) -> Role {
        Role::Producer
    }

    fn exchange(&self) -> Result<i32, WorkerError> {
        let role = Role::Producer;
        let (first, second) = self.read_inputs()?;
        self.journal
            .record(&format!("{role}: read numbers {first} and {second}"));

        let larger = first.max(second);

        let mut tx = self
            .output
            .open_write()
            .map_err(|source| WorkerError::Open { role, source })?;
        tx.write_record(larger)
            .map_err(|source| WorkerError::Transfer { role, source })?;
        drop(tx);

        self.journal
            .record(&format!("{role}: wrote larger number {larger} to channel B"));
        Ok(larger)
    }
}
