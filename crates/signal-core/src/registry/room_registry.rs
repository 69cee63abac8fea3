//! Room registry
//!
//! A single owned registry guarded by one mutex. Every membership mutation and its
//! fan-out computation happen in one critical section, so concurrent joins and
//! disconnects on the same room cannot leave phantom members or delete a room twice.

use super::room::MemberInsert;
use super::{ChatFanout, Departure, JoinOutcome, Room};
use crate::error::DomainError;
use crate::value_objects::{ConnectionId, ParticipantId, RoomId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
struct RegistryState {
    /// Active rooms. A room is present only while it has members.
    rooms: HashMap<RoomId, Room>,
    /// Live connections and the memberships each one holds
    memberships: HashMap<ConnectionId, BTreeSet<(RoomId, ParticipantId)>>,
}

impl RegistryState {
    /// Remove one membership held by `connection` and compute who to tell
    fn remove_member(
        &mut self,
        room_id: &RoomId,
        participant: &ParticipantId,
        connection: &ConnectionId,
    ) -> Option<Departure> {
        let room = self.rooms.get_mut(room_id)?;
        if !room.remove_bound(participant, connection) {
            return None;
        }

        let notify = room.connections_except(connection, None);
        let room_deleted = room.is_empty();
        if room_deleted {
            self.rooms.remove(room_id);
            tracing::debug!(room_id = %room_id, "Room deleted");
        }

        Some(Departure {
            room_id: room_id.clone(),
            participant_id: participant.clone(),
            notify,
            room_deleted,
        })
    }
}

/// Registry of rooms and live connections
#[derive(Debug, Default)]
pub struct RoomRegistry {
    state: Mutex<RegistryState>,
}

impl RoomRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a connection as live so it may join rooms
    pub fn register_connection(&self, connection: ConnectionId) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        if state.memberships.contains_key(&connection) {
            return Err(DomainError::ConnectionAlreadyRegistered(connection));
        }
        state.memberships.insert(connection, BTreeSet::new());
        Ok(())
    }

    /// Add a participant to a room, creating the room if needed
    ///
    /// Rejoining is not an error; the outcome still carries the notification list and the
    /// peer snapshot. The snapshot is taken after insertion and excludes the joiner by value.
    pub fn join(
        &self,
        room_id: RoomId,
        participant: ParticipantId,
        connection: ConnectionId,
    ) -> Result<JoinOutcome, DomainError> {
        let mut state = self.state.lock();
        if !state.memberships.contains_key(&connection) {
            return Err(DomainError::ConnectionNotRegistered(connection));
        }

        let room_created = !state.rooms.contains_key(&room_id);
        let room = state
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone()));

        let insert = room.insert(participant.clone(), connection.clone());
        let notify = room.connections_except(&connection, Some(&participant));
        let peers = room.peers_excluding(&participant);

        let key = (room_id.clone(), participant.clone());
        if let Some(held) = state.memberships.get_mut(&connection) {
            held.insert(key.clone());
        }

        let rejoined = insert != MemberInsert::Added;
        let displaced = match insert {
            MemberInsert::Rebound(previous) => {
                if let Some(held) = state.memberships.get_mut(&previous) {
                    held.remove(&key);
                }
                Some(previous)
            }
            MemberInsert::Added | MemberInsert::Unchanged => None,
        };

        if room_created {
            tracing::debug!(room_id = %room_id, "Room created");
        }

        Ok(JoinOutcome {
            room_id,
            participant_id: participant,
            room_created,
            rejoined,
            displaced,
            notify,
            peers,
        })
    }

    /// Remove a participant from a room on explicit request
    ///
    /// Only removes the membership if it is held by `connection`. Returns `None` when
    /// there was nothing to remove.
    pub fn leave(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        connection: &ConnectionId,
    ) -> Option<Departure> {
        let mut state = self.state.lock();
        let key = (room_id.clone(), participant.clone());
        let held = state.memberships.get_mut(connection)?;
        if !held.remove(&key) {
            return None;
        }
        state.remove_member(room_id, participant, connection)
    }

    /// Unregister a connection and remove every membership it held
    ///
    /// Idempotent: once a connection is unregistered, further calls return nothing and
    /// late joins from it are rejected.
    pub fn disconnect(&self, connection: &ConnectionId) -> Vec<Departure> {
        let mut state = self.state.lock();
        let Some(held) = state.memberships.remove(connection) else {
            return Vec::new();
        };

        held.into_iter()
            .filter_map(|(room_id, participant)| {
                state.remove_member(&room_id, &participant, connection)
            })
            .collect()
    }

    /// Stamp a chat message and list the connections it goes to
    ///
    /// Returns `None` when the room does not exist.
    pub fn chat(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        now: DateTime<Utc>,
    ) -> Option<ChatFanout> {
        let mut state = self.state.lock();
        let room = state.rooms.get_mut(room_id)?;
        let timestamp = room.stamp_message(now);
        let recipients = room.connections_except(sender, None);
        Some(ChatFanout {
            timestamp,
            recipients,
        })
    }

    /// Connections of all members of a room except `exclude`
    pub fn room_recipients(&self, room_id: &RoomId, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.state
            .lock()
            .rooms
            .get(room_id)
            .map(|room| room.connections_except(exclude, None))
            .unwrap_or_default()
    }

    /// Member ids of a room in join order, or `None` if the room does not exist
    pub fn members(&self, room_id: &RoomId) -> Option<Vec<ParticipantId>> {
        self.state.lock().rooms.get(room_id).map(Room::participants)
    }

    /// Check if a room exists
    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.state.lock().rooms.contains_key(room_id)
    }

    /// Number of active rooms
    pub fn room_count(&self) -> usize {
        self.state.lock().rooms.len()
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.state.lock().memberships.len()
    }
}
