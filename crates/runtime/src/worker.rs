//! Async worker that owns the engine and feeds the transport.
//!
//! The host glue drives the worker with [`Command`]s (one `Tick` per frame,
//! one `Inbound` per received remote call); configuration saves arrive over
//! the [`ConfigBus`]. All engine mutation happens inside this single task,
//! which preserves the one-logical-thread ownership model; only the
//! transport sends are async.

use std::sync::{Arc, Mutex};

use stats_core::{CharacterRoster, ModTarget};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::StatsEngine;
use crate::events::ConfigEvent;
use crate::session::SessionOracle;
use crate::transport::{SyncMessage, SyncTransport};

/// Commands the host glue sends to the worker.
#[derive(Debug)]
pub enum Command {
    /// Advance one frame; `now` is the session clock in seconds.
    Tick { now: f32 },
    /// An inbound remote call arrived from the network layer.
    Inbound(SyncMessage),
    /// A configuration bundle was saved locally (equivalent to the bus
    /// event, for glue that prefers the command channel).
    ConfigSaved(ModTarget),
    /// Stop the worker.
    Shutdown,
}

/// Shared handles the worker needs to reach the rest of the process.
pub struct WorkerHandles {
    pub session: Arc<dyn SessionOracle>,
    pub roster: Arc<Mutex<dyn CharacterRoster + Send>>,
    pub transport: Arc<dyn SyncTransport>,
}

/// Owns a [`StatsEngine`] and serializes all access to it.
pub struct SyncWorker {
    engine: StatsEngine,
    handles: WorkerHandles,
}

impl SyncWorker {
    pub fn new(engine: StatsEngine, handles: WorkerHandles) -> Self {
        Self { engine, handles }
    }

    /// Spawn the worker task. Returns the command channel and the task
    /// handle; dropping the sender shuts the worker down.
    pub fn spawn(
        self,
        config_events: broadcast::Receiver<ConfigEvent>,
    ) -> (mpsc::Sender<Command>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(self.run(rx, config_events));
        (tx, handle)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        config_events: broadcast::Receiver<ConfigEvent>,
    ) {
        let mut config_events = Some(config_events);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        None | Some(Command::Shutdown) => {
                            debug!("Sync worker shutting down");
                            break;
                        }
                        Some(command) => self.dispatch(command).await,
                    }
                }
                event = recv_event(&mut config_events), if config_events.is_some() => {
                    match event {
                        Some(ConfigEvent::Saved(target)) => {
                            self.config_saved(target).await;
                        }
                        None => config_events = None,
                    }
                }
            }
        }
    }

    async fn dispatch(&mut self, command: Command) {
        let outbound = match command {
            Command::Tick { now } => {
                let mut roster = self.handles.roster.lock().unwrap();
                self.engine
                    .tick(now, self.handles.session.as_ref(), &mut *roster)
            }
            Command::Inbound(message) => {
                let mut roster = self.handles.roster.lock().unwrap();
                self.engine
                    .handle_message(message, self.handles.session.as_ref(), &mut *roster)
            }
            Command::ConfigSaved(target) => {
                self.config_saved(target).await;
                return;
            }
            Command::Shutdown => unreachable!("handled by the run loop"),
        };
        self.send_all(outbound).await;
    }

    async fn config_saved(&mut self, target: ModTarget) {
        let outbound = {
            let mut roster = self.handles.roster.lock().unwrap();
            self.engine
                .on_config_saved(target, self.handles.session.as_ref(), &mut *roster)
        };
        self.send_all(outbound).await;
    }

    async fn send_all(&self, messages: Vec<SyncMessage>) {
        for message in messages {
            if let Err(e) = self.handles.transport.send(message).await {
                // Superseded by the next needs_sync evaluation.
                warn!("Sync send failed: {e}");
            }
        }
    }
}

/// Receive the next config event, swallowing lag; `None` means the bus is
/// gone and the branch should be disabled.
async fn recv_event(
    events: &mut Option<broadcast::Receiver<ConfigEvent>>,
) -> Option<ConfigEvent> {
    let receiver = events.as_mut()?;
    loop {
        match receiver.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Config bus lagged; skipped {skipped} events");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
