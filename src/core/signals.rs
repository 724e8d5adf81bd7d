//! # Unix signal forwarding for the coordinator process.
//!
//! Signal handlers only forward; all real work happens in ordinary tasks.
//!
//! - `SIGCHLD` → [`Notify::notify_one`] wakes the reaper. Several deliveries
//!   before the reaper runs collapse into one stored permit, which is why the
//!   reaper drains every pending child per wakeup.
//! - `SIGUSR1` → [`ControlRequest::DiagnosticPing`]
//! - `SIGHUP`  → [`ControlRequest::Reconfigure`]
//! - `SIGTERM` → [`ControlRequest::Shutdown`]
//!
//! Both forwarders register their listeners before returning, so calling them
//! before launching workers guarantees no termination is missed.

use std::io;
use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Operator request delivered to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Diagnostic ping, only logged.
    DiagnosticPing,
    /// Log-only reconfiguration request.
    Reconfigure,
    /// Stop supervising at the next tick; workers are left alone.
    Shutdown,
}

/// Forwards `SIGCHLD` to `wakeups` until `token` is cancelled.
pub fn forward_child_exits(
    wakeups: Arc<Notify>,
    token: CancellationToken,
) -> io::Result<JoinHandle<()>> {
    let mut sigchld = signal(SignalKind::child())?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                got = sigchld.recv() => match got {
                    Some(()) => wakeups.notify_one(),
                    None => break,
                },
            }
        }
    }))
}

/// Forwards `SIGUSR1`, `SIGHUP` and `SIGTERM` to `tx` until `token` is cancelled.
///
/// Requests arriving after the receiver is gone are dropped.
pub fn forward_control_signals(
    tx: mpsc::UnboundedSender<ControlRequest>,
    token: CancellationToken,
) -> io::Result<JoinHandle<()>> {
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let req = tokio::select! {
                _ = token.cancelled() => break,
                Some(()) = sigusr1.recv() => ControlRequest::DiagnosticPing,
                Some(()) = sighup.recv() => ControlRequest::Reconfigure,
                Some(()) = sigterm.recv() => ControlRequest::Shutdown,
                else => break,
            };
            let _ = tx.send(req);
        }
    }))
}
