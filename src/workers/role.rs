//! Roles and handles of the units launched by the coordinator.

use std::fmt;
use std::str::FromStr;

use nix::unistd::Pid;

/// Role of a launched unit of execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Reads both inputs from channel A, writes the larger to channel B.
    Producer,
    /// Reads the result from channel B and reports it.
    Consumer,
    /// Time-bounded liveness monitor.
    Supervisor,
}

impl Role {
    /// Stable lowercase name, also used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Consumer => "consumer",
            Role::Supervisor => "supervisor",
        }
    }

    /// Whether termination of this role advances the completion counter.
    pub fn is_counted(self) -> bool {
        matches!(self, Role::Producer | Role::Consumer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "producer" => Ok(Role::Producer),
            "consumer" => Ok(Role::Consumer),
            "supervisor" => Ok(Role::Supervisor),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}

/// A launched unit: process id and role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerHandle {
    /// Process id.
    pub id: Pid,
    /// What the unit does.
    pub role: Role,
}

impl WorkerHandle {
    /// Creates a handle for `id`.
    pub fn new(id: Pid, role: Role) -> Self {
        Self { id, role }
    }
}
