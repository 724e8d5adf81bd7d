//! Consumer: reads the result from channel B and reports it.

use std::io::Write;

use crate::channel::Channel;
use crate::config::Config;
use crate::error::WorkerError;
use crate::journal::Journal;

use super::{Role, Worker};

/// Consumer side of the pipeline.
pub struct Consumer<'a> {
    input: Channel,
    journal: &'a Journal,
}

impl<'a> Consumer<'a> {
    /// Binds the consumer to channel B named in `cfg`.
    pub fn new(cfg: &Config, journal: &'a Journal) -> Self {
        Self {
            input: Channel::new(&cfg.channel_b),
            journal,
        }
    }
}

impl Worker for Consumer<'_> {
    fn role(&self) -> Role {
        Role::Consumer
    }

    fn exchange(&self) -> Result<i32, WorkerError> {
        let role = Role::Consumer;
        let mut rx = self
            .input
            .open_read()
            .map_err(|source| WorkerError::Open { role, source })?;
        let larger = rx
            .read_record()
            .map_err(|source| WorkerError::Transfer { role, source })?;
        drop(rx);

        self.journal
            .record(&format!("{role}: larger number is {larger}"));
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "Larger number: {larger}");
        let _ = out.flush();
        Ok(larger)
    }
}
