//! # Coordinator: one complete run, from channel setup to cleanup.
//!
//! ## Sequence
//! ```text
//! run(first, second)
//!   ├─► event listener: Bus ─► SubscriberSet ─► LogWriter (journal)
//!   ├─► recreate channel A and channel B          (failure ─► Err, nothing launched)
//!   ├─► SIGCHLD forwarder + Reaper, SIGUSR1/SIGHUP/SIGTERM forwarder
//!   ├─► launch producer, launch consumer          (registered in WorkerTable)
//!   ├─► open A for writing (blocks until the producer opens it), write first, second
//!   ├─► spawn Supervisor
//!   ├─► while counter < 4 { "Proceeding..."; sleep(poll) }
//!   ├─► await Supervisor
//!   ├─► remove both channels
//!   └─► stop background tasks, flush subscribers
//! ```
//!
//! Signal listeners are registered before the first launch, so a worker that
//! dies immediately is still observed.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::sync::{Notify, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::channel::Channel;
use crate::config::{Config, EXPECTED_TOTAL};
use crate::core::{
    CompletionCounter, ControlRequest, Launch, ProcessLauncher, Reaper, SigTerm, Supervisor,
    SupervisorOutcome, Terminate, WaitAnyChild, WorkerTable, signals,
};
use crate::error::{ChannelError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::journal::Journal;
use crate::subscribers::{LogWriter, Subscribe, SubscriberSet};
use crate::workers::{Role, WorkerHandle};

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// How the supervisor ended.
    pub outcome: SupervisorOutcome,
    /// Final value of the completion counter.
    pub counter: u32,
    /// Launched workers, producer first.
    pub workers: Vec<WorkerHandle>,
}

/// Drives a run: channels, workers, reaper, supervisor and cleanup.
pub struct Coordinator<L: Launch, T: Terminate + Clone> {
    cfg: Config,
    launcher: L,
    terminator: T,
    extra_subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Coordinator<ProcessLauncher, SigTerm> {
    /// Coordinator launching workers by re-executing the running binary.
    pub fn from_current_exe(cfg: Config) -> io::Result<Self> {
        let launcher = ProcessLauncher::current_exe(cfg.clone())?;
        Ok(Self::new(cfg, launcher, SigTerm))
    }
}

impl<L: Launch, T: Terminate + Clone> Coordinator<L, T> {
    /// Creates a coordinator with explicit process seams.
    pub fn new(cfg: Config, launcher: L, terminator: T) -> Self {
        Self {
            cfg,
            launcher,
            terminator,
            extra_subscribers: Vec::new(),
        }
    }

    /// Adds a subscriber next to the built-in [`LogWriter`].
    #[must_use]
    pub fn with_subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.extra_subscribers.push(sub);
        self
    }

    /// Runs the whole sequence with `first` and `second` as inputs.
    pub async fn run(&self, first: i32, second: i32) -> Result<RunReport, RuntimeError> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener_token = CancellationToken::new();

        let mut subs: Vec<Arc<dyn Subscribe>> =
            vec![Arc::new(LogWriter::new(Journal::new(&self.cfg.log_file)))];
        subs.extend(self.extra_subscribers.iter().cloned());
        let listener = spawn_listener(
            bus.subscribe(),
            SubscriberSet::new(subs, bus.clone()),
            listener_token.clone(),
        );

        bus.publish(Event::new(EventKind::RunStarted));
        let res = self.drive(first, second, &bus).await;

        listener_token.cancel();
        let _ = listener.await;
        res
    }

    async fn drive(&self, first: i32, second: i32, bus: &Bus) -> Result<RunReport, RuntimeError> {
        let input = Channel::new(&self.cfg.channel_a);
        let output = Channel::new(&self.cfg.channel_b);
        let channels = [&input, &output];

        if let Err(e) = input.recreate().and_then(|()| output.recreate()) {
            bus.publish(Event::new(EventKind::ChannelsFailed).with_reason(e.to_string()));
            channels.iter().for_each(|c| c.remove());
            return Err(RuntimeError::ChannelCreation(e));
        }
        bus.publish(Event::new(EventKind::ChannelsCreated));

        let table = Arc::new(WorkerTable::new());
        let counter = Arc::new(CompletionCounter::new());
        let (ctl_tx, ctl_rx) = mpsc::unbounded_channel();

        let background = match Background::start(&table, &counter, bus, ctl_tx) {
            Ok(bg) => bg,
            Err(e) => {
                channels.iter().for_each(|c| c.remove());
                return Err(RuntimeError::Signal(e));
            }
        };

        let mut workers = Vec::with_capacity(2);
        for role in [Role::Producer, Role::Consumer] {
            match table.register_with(|| self.launcher.launch(role)) {
                Ok(handle) => {
                    bus.publish(Event::new(EventKind::WorkerLaunched).with_worker(handle.id, role));
                    workers.push(handle);
                }
                Err(source) => {
                    self.abandon(&workers, &table, background, &channels).await;
                    return Err(RuntimeError::Launch { role, source });
                }
            }
        }

        if let Err(e) = self.write_inputs(&input, first, second, bus).await {
            self.abandon(&workers, &table, background, &channels).await;
            return Err(e);
        }

        let supervisor = Supervisor::new(
            &self.cfg,
            workers.clone(),
            Arc::clone(&table),
            self.terminator.clone(),
            bus.clone(),
        );
        let supervising = tokio::spawn(supervisor.run(ctl_rx));

        loop {
            let n = counter.get();
            if n >= EXPECTED_TOTAL {
                break;
            }
            stdout_line("Proceeding...");
            bus.publish(Event::new(EventKind::Proceeding).with_counter(n));
            tokio::time::sleep(self.cfg.poll()).await;
        }
        stdout_line("All child processes terminated. Exiting Program...");

        let outcome = supervising.await;
        bus.publish(Event::new(EventKind::RunFinished).with_counter(counter.get()));
        channels.iter().for_each(|c| c.remove());
        background.stop().await;

        Ok(RunReport {
            outcome: outcome.map_err(|e| RuntimeError::Join(e.to_string()))?,
            counter: counter.get(),
            workers,
        })
    }

    /// Opens channel A for writing and sends both inputs, off the async threads.
    async fn write_inputs(
        &self,
        input: &Channel,
        first: i32,
        second: i32,
        bus: &Bus,
    ) -> Result<(), RuntimeError> {
        let ch = input.clone();
        let written = tokio::task::spawn_blocking(move || -> Result<(), ChannelError> {
            let mut w = ch.open_write()?;
            w.write_record(first)?;
            w.write_record(second)
        })
        .await;

        match written {
            Ok(Ok(())) => {
                bus.publish(Event::new(EventKind::InputsWritten).with_inputs(first, second));
                Ok(())
            }
            Ok(Err(e)) => {
                bus.publish(Event::new(EventKind::InputsFailed).with_reason(e.to_string()));
                Err(RuntimeError::Channel(e))
            }
            Err(e) => {
                bus.publish(Event::new(EventKind::InputsFailed).with_reason(e.to_string()));
                Err(RuntimeError::Join(e.to_string()))
            }
        }
    }

    /// Failure path after launch: stop live workers, then clean up.
    async fn abandon(
        &self,
        workers: &[WorkerHandle],
        table: &WorkerTable,
        background: Background,
        channels: &[&Channel],
    ) {
        for w in workers.iter().filter(|w| table.is_alive(w.id)) {
            let _ = self.terminator.terminate(w.id);
        }
        channels.iter().for_each(|c| c.remove());
        background.stop().await;
    }
}

/// Reaper and signal forwarders living for the duration of a run.
struct Background {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Background {
    fn start(
        table: &Arc<WorkerTable>,
        counter: &Arc<CompletionCounter>,
        bus: &Bus,
        ctl_tx: mpsc::UnboundedSender<ControlRequest>,
    ) -> io::Result<Self> {
        let token = CancellationToken::new();
        let wakeups = Arc::new(Notify::new());

        let child_exits = signals::forward_child_exits(Arc::clone(&wakeups), token.clone())?;
        let control = match signals::forward_control_signals(ctl_tx, token.clone()) {
            Ok(h) => h,
            Err(e) => {
                token.cancel();
                return Err(e);
            }
        };
        let reaper = Reaper::new(
            WaitAnyChild,
            Arc::clone(table),
            Arc::clone(counter),
            bus.clone(),
        );
        let reaping = tokio::spawn(reaper.run(wakeups, token.clone()));

        Ok(Self {
            token,
            handles: vec![child_exits, control, reaping],
        })
    }

    async fn stop(self) {
        self.token.cancel();
        for h in self.handles {
            let _ = h.await;
        }
    }
}

/// Forwards bus events to `set` until `token` is cancelled, then drains what is left.
fn spawn_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                got = rx.recv() => match got {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = token.cancelled() => {
                    loop {
                        match rx.try_recv() {
                            Ok(ev) => set.emit(&ev),
                            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                            Err(_) => break,
                        }
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    })
}

fn stdout_line(text: &str) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{text}");
    let _ = out.flush();
}
