//! Results of registry mutations
//!
//! Each mutation returns the set of connections that must be told about it.
//! Fan-out is computed under the registry lock and delivered after it is released.

use crate::value_objects::{ConnectionId, ParticipantId, RoomId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A room member as seen by other members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub user_id: ParticipantId,
    pub connection_id: ConnectionId,
}

/// Outcome of a join
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    pub participant_id: ParticipantId,
    /// The room did not exist before this join
    pub room_created: bool,
    /// The participant was already a member of the room
    pub rejoined: bool,
    /// Connection the participant was bound to before, if the join moved it
    pub displaced: Option<ConnectionId>,
    /// Connections of the other members, to receive `user-connected`
    pub notify: Vec<ConnectionId>,
    /// Members other than the joiner, in join order
    pub peers: Vec<Peer>,
}

impl JoinOutcome {
    /// Participant ids of the other members, in join order
    pub fn peer_ids(&self) -> Vec<ParticipantId> {
        self.peers.iter().map(|p| p.user_id.clone()).collect()
    }
}

/// A participant leaving a room (explicit leave or disconnect)
#[derive(Debug, Clone)]
pub struct Departure {
    pub room_id: RoomId,
    pub participant_id: ParticipantId,
    /// Connections of the remaining members, to receive `user-disconnected`
    pub notify: Vec<ConnectionId>,
    /// The room became empty and was removed
    pub room_deleted: bool,
}

/// Recipients and server timestamp of a chat message
#[derive(Debug, Clone)]
pub struct ChatFanout {
    pub timestamp: DateTime<Utc>,
    pub recipients: Vec<ConnectionId>,
}
