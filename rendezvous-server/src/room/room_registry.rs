use crate::config::{ConfigError, RegistryConfig};
use crate::room::room::Room;
use crate::room::room_command::RoomCommand;
use crate::room::{IdGenerator, RoomError};
use crate::transport::{ConnectionId, HostLink};
use chrono::{TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rendezvous_core::{RoomId, RoomTicket, SignalPayload};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info};

const ROOM_COMMAND_CAPACITY: usize = 32;

/// Registry-side view of a live room. Dropping it stops the room.
pub(crate) struct RoomHandle {
    pub(crate) generation: u64,
    publisher_payload: SignalPayload,
    deadline: Instant,
    command_tx: mpsc::Sender<RoomCommand>,
    _shutdown_tx: oneshot::Sender<()>,
}

impl RoomHandle {
    fn is_live(&self) -> bool {
        !self.command_tx.is_closed() && Instant::now() < self.deadline
    }
}

/// Live rendezvous rooms keyed by their short id.
///
/// Each room runs its own event loop (see `Room`) which serializes claim,
/// attach and detach for that room and owns its expiry timer. The registry
/// only routes requests to the right loop, so rooms never wait on each other.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, RoomHandle>>,
    ids: Arc<IdGenerator>,
    config: Arc<RegistryConfig>,
    ttl: TimeDelta,
    next_generation: Arc<AtomicU64>,
    runtime: Handle,
}

impl RoomRegistry {
    /// Builds a registry whose rooms run on the current tokio runtime.
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        config.validate()?;
        let ids = IdGenerator::new(&config.id_alphabet, config.id_length)?;
        let ttl = TimeDelta::from_std(config.room_ttl)
            .map_err(|_| ConfigError::TtlOutOfRange(config.room_ttl))?;

        Ok(Self {
            rooms: Arc::new(DashMap::new()),
            ids: Arc::new(ids),
            config: Arc::new(config),
            ttl,
            next_generation: Arc::new(AtomicU64::new(0)),
            runtime,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Opens a room for `payload` and starts its expiry countdown.
    pub fn create(&self, payload: SignalPayload) -> Result<RoomTicket, RoomError> {
        if let Some(capacity) = self.ids.capacity()
            && self.rooms.len() >= capacity
        {
            error!("All {} room ids are in use", capacity);
            return Err(RoomError::IdSpaceExhausted);
        }

        for _ in 0..self.config.max_id_attempts {
            let id = self.ids.generate();

            let slot = match self.rooms.entry(id.clone()) {
                Entry::Occupied(_) => {
                    debug!("Room id {} is taken, drawing another", id);
                    continue;
                }
                Entry::Vacant(slot) => slot,
            };

            let deadline = Instant::now() + self.config.room_ttl;
            let expires_at = Utc::now() + self.ttl;
            let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
            let (command_tx, command_rx) = mpsc::channel(ROOM_COMMAND_CAPACITY);
            let (shutdown_tx, shutdown_rx) = oneshot::channel();

            slot.insert(RoomHandle {
                generation,
                publisher_payload: payload,
                deadline,
                command_tx,
                _shutdown_tx: shutdown_tx,
            });

            let room = Room::new(
                id.clone(),
                generation,
                deadline,
                command_rx,
                shutdown_rx,
                self.rooms.clone(),
            );
            self.runtime.spawn(room.run());

            info!("Room {} created, expires at {}", id, expires_at);
            return Ok(RoomTicket { id, expires_at });
        }

        error!(
            "Gave up drawing a room id after {} attempts",
            self.config.max_id_attempts
        );
        Err(RoomError::IdSpaceExhausted)
    }

    /// Publisher payload of a live room.
    pub fn lookup(&self, id: &RoomId) -> Result<SignalPayload, RoomError> {
        self.rooms
            .get(id)
            .filter(|handle| handle.is_live())
            .map(|handle| handle.publisher_payload.clone())
            .ok_or(RoomError::NotFound)
    }

    /// Records the joiner's payload. Delivers it right away if the publisher
    /// is already connected, otherwise as soon as it connects.
    pub async fn claim(&self, id: &RoomId, payload: SignalPayload) -> Result<(), RoomError> {
        self.request(id, |reply| RoomCommand::Claim { payload, reply })
            .await
    }

    /// Checks whether `attach_connection` would currently be accepted.
    pub async fn probe_attach(&self, id: &RoomId) -> Result<(), RoomError> {
        self.request(id, |reply| RoomCommand::ProbeAttach { reply })
            .await
    }

    /// Binds the publisher's persistent connection to the room.
    ///
    /// A rejected link is dropped without being closed; the caller still owns
    /// the underlying transport.
    pub async fn attach_connection(
        &self,
        id: &RoomId,
        link: Box<dyn HostLink>,
    ) -> Result<(), RoomError> {
        self.request(id, |reply| RoomCommand::Attach { link, reply })
            .await
    }

    /// Forgets the publisher connection if it is still the one attached.
    pub async fn detach_connection(&self, id: &RoomId, connection_id: ConnectionId) {
        let Some(command_tx) = self.command_sender(id) else {
            return;
        };
        let _ = command_tx.send(RoomCommand::Detach { connection_id }).await;
    }

    /// Drops the room, stopping its timer and closing any attached
    /// connection. Unknown or already finished rooms are ignored.
    pub fn remove(&self, id: &RoomId) {
        if self.rooms.remove(id).is_some() {
            debug!("Room {} removal requested", id);
        }
    }

    pub fn live_rooms(&self) -> usize {
        self.rooms.len()
    }

    fn command_sender(&self, id: &RoomId) -> Option<mpsc::Sender<RoomCommand>> {
        self.rooms
            .get(id)
            .filter(|handle| handle.is_live())
            .map(|handle| handle.command_tx.clone())
    }

    async fn request<F>(&self, id: &RoomId, make: F) -> Result<(), RoomError>
    where
        F: FnOnce(oneshot::Sender<Result<(), RoomError>>) -> RoomCommand,
    {
        let command_tx = self.command_sender(id).ok_or(RoomError::NotFound)?;
        let (reply, response) = oneshot::channel();

        command_tx
            .send(make(reply))
            .await
            .map_err(|_| RoomError::NotFound)?;

        // The room finished before it got to us.
        response.await.unwrap_or(Err(RoomError::NotFound))
    }
}
