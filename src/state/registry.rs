//! The RoomRegistry - process-wide directory of room actors.
//!
//! Maps room ids to actor handles in a concurrent map accessible from
//! any async task. Rooms are created on first reference: an explicit
//! `create` call and a join to an unknown id both land here, so
//! UnknownRoom is never an error path.

use crate::state::actor::{RoomActor, RoomEvent};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Unique room identifier (opaque URL-safe token).
pub type RoomId = String;

/// Process-wide directory mapping room ids to room actors.
pub struct RoomRegistry {
    /// All rooms, indexed by id. Each room has an actor
    /// (mpsc::Sender) that processes RoomEvents.
    rooms: DashMap<RoomId, mpsc::Sender<RoomEvent>>,
}

impl RoomRegistry {
    /// Create an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rooms: DashMap::new(),
        })
    }

    /// Create a fresh room with a generated id and return the id.
    pub fn create(self: &Arc<Self>) -> RoomId {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.get_or_create(&id);
        id
    }

    /// Get the actor handle for `room_id`, spawning an empty room if
    /// absent.
    ///
    /// The entry API holds the shard lock for the duration, so a
    /// concurrent `remove` of the same id cannot interleave with the
    /// spawn: callers never observe a half-removed room. They can still
    /// receive a handle to a room that is draining; joining it yields
    /// `RoomError::RoomClosed` and the caller retries.
    pub fn get_or_create(self: &Arc<Self>, room_id: &str) -> mpsc::Sender<RoomEvent> {
        let entry = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(|| {
                crate::metrics::inc_active_rooms();
                tracing::debug!(room = %room_id, "Room created");
                RoomActor::spawn(room_id.to_string(), Arc::downgrade(self))
            });
        entry.value().clone()
    }

    /// Remove a room. Invoked by a room actor tearing itself down after
    /// its member set became empty.
    pub(crate) fn remove(&self, room_id: &str) -> bool {
        let removed = self.rooms.remove(room_id).is_some();
        if removed {
            crate::metrics::dec_active_rooms();
            tracing::debug!(room = %room_id, "Room removed");
        }
        removed
    }

    /// Number of rooms currently registered.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the registry holds no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
