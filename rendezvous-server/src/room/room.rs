use crate::room::RoomError;
use crate::room::room_command::RoomCommand;
use crate::room::room_registry::RoomHandle;
use crate::transport::HostLink;
use dashmap::DashMap;
use rendezvous_core::{RoomId, SignalPayload};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomOutcome {
    Delivered,
    Expired,
    Removed,
}

/// Single owner of one room's mutable state.
///
/// Every claim, attach and detach for the room is applied here, one at a
/// time, and the expiry deadline is raced against them in the same loop.
/// Whichever terminal event wins ends the loop, so delivery, expiry and
/// removal can never both happen.
pub(crate) struct Room {
    id: RoomId,
    generation: u64,
    deadline: Instant,
    joiner_payload: Option<SignalPayload>,
    host: Option<Box<dyn HostLink>>,
    command_rx: mpsc::Receiver<RoomCommand>,
    shutdown_rx: oneshot::Receiver<()>,
    rooms: Arc<DashMap<RoomId, RoomHandle>>,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        generation: u64,
        deadline: Instant,
        command_rx: mpsc::Receiver<RoomCommand>,
        shutdown_rx: oneshot::Receiver<()>,
        rooms: Arc<DashMap<RoomId, RoomHandle>>,
    ) -> Self {
        Self {
            id,
            generation,
            deadline,
            joiner_payload: None,
            host: None,
            command_rx,
            shutdown_rx,
            rooms,
        }
    }

    pub(crate) async fn run(mut self) {
        debug!("Room {} event loop started", self.id);

        let expiry = tokio::time::sleep_until(self.deadline);
        tokio::pin!(expiry);

        let outcome = loop {
            tokio::select! {
                biased;

                _ = &mut expiry => break RoomOutcome::Expired,

                _ = &mut self.shutdown_rx => break RoomOutcome::Removed,

                cmd = self.command_rx.recv() => match cmd {
                    Some(c) => {
                        if let Some(outcome) = self.handle_command(c) {
                            break outcome;
                        }
                    }
                    None => break RoomOutcome::Removed,
                },
            }
        };

        self.finish(outcome).await;
    }

    fn handle_command(&mut self, cmd: RoomCommand) -> Option<RoomOutcome> {
        match cmd {
            RoomCommand::ProbeAttach { reply } => {
                let _ = reply.send(self.check_attachable());
                None
            }

            RoomCommand::Attach { link, reply } => {
                if let Err(e) = self.check_attachable() {
                    let _ = reply.send(Err(e));
                    return None;
                }

                info!(
                    "Publisher connection {} attached to room {}",
                    link.connection_id(),
                    self.id
                );
                self.host = Some(link);
                let _ = reply.send(Ok(()));
                self.deliverable()
            }

            RoomCommand::Detach { connection_id } => {
                let attached = self
                    .host
                    .as_ref()
                    .is_some_and(|host| host.connection_id() == connection_id);
                if attached {
                    info!(
                        "Publisher connection {} left room {} before delivery",
                        connection_id, self.id
                    );
                    self.host = None;
                }
                None
            }

            RoomCommand::Claim { payload, reply } => {
                if self.joiner_payload.is_some() {
                    let _ = reply.send(Err(RoomError::AlreadyClaimed));
                    return None;
                }

                info!("Room {} claimed", self.id);
                self.joiner_payload = Some(payload);
                let _ = reply.send(Ok(()));
                self.deliverable()
            }
        }
    }

    fn check_attachable(&self) -> Result<(), RoomError> {
        match self.host {
            Some(_) => Err(RoomError::AlreadyAttached),
            None => Ok(()),
        }
    }

    fn deliverable(&self) -> Option<RoomOutcome> {
        (self.joiner_payload.is_some() && self.host.is_some()).then_some(RoomOutcome::Delivered)
    }

    async fn finish(mut self, outcome: RoomOutcome) {
        // A newer room may already own this id if we were removed explicitly.
        let generation = self.generation;
        self.rooms
            .remove_if(&self.id, |_, handle| handle.generation == generation);
        self.command_rx.close();

        let host = self.host.take();
        match (outcome, self.joiner_payload.take()) {
            (RoomOutcome::Delivered, Some(payload)) => {
                if let Some(host) = &host {
                    host.deliver(payload).await;
                }
                info!("Room {} delivered", self.id);
            }
            (RoomOutcome::Expired, _) => info!("Room {} expired", self.id),
            _ => info!("Room {} removed", self.id),
        }

        if let Some(host) = host {
            host.close().await;
        }
    }
}
