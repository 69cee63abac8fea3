//! A single room and its members

use super::Peer;
use crate::value_objects::{ConnectionId, ParticipantId, RoomId};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
struct Member {
    connection: ConnectionId,
    /// Join order within the room
    seq: u64,
}

/// Result of adding a participant to a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MemberInsert {
    /// Newly added
    Added,
    /// Already a member on the same connection
    Unchanged,
    /// Already a member; now bound to the new connection instead of this one
    Rebound(ConnectionId),
}

/// A room: a set of participants, each bound to the connection it joined from
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    members: HashMap<ParticipantId, Member>,
    next_seq: u64,
    last_message_at: Option<DateTime<Utc>>,
}

impl Room {
    pub(crate) fn new(id: RoomId) -> Self {
        Self {
            id,
            members: HashMap::new(),
            next_seq: 0,
            last_message_at: None,
        }
    }

    /// Get the room id
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the room has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check if a participant is a member
    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains_key(participant)
    }

    /// Connection a member is bound to
    pub fn connection_of(&self, participant: &ParticipantId) -> Option<&ConnectionId> {
        self.members.get(participant).map(|m| &m.connection)
    }

    /// Member ids in join order
    pub fn participants(&self) -> Vec<ParticipantId> {
        self.ordered().into_iter().map(|(p, _)| p.clone()).collect()
    }

    pub(crate) fn insert(
        &mut self,
        participant: ParticipantId,
        connection: ConnectionId,
    ) -> MemberInsert {
        if let Some(member) = self.members.get_mut(&participant) {
            if member.connection == connection {
                return MemberInsert::Unchanged;
            }
            let previous = std::mem::replace(&mut member.connection, connection);
            return MemberInsert::Rebound(previous);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.members.insert(participant, Member { connection, seq });
        MemberInsert::Added
    }

    /// Remove a member, but only while it is still bound to `connection`
    pub(crate) fn remove_bound(
        &mut self,
        participant: &ParticipantId,
        connection: &ConnectionId,
    ) -> bool {
        match self.members.get(participant) {
            Some(member) if &member.connection == connection => {
                self.members.remove(participant);
                true
            }
            _ => false,
        }
    }

    /// Members other than `participant`, compared by value, in join order
    pub(crate) fn peers_excluding(&self, participant: &ParticipantId) -> Vec<Peer> {
        self.ordered()
            .into_iter()
            .filter(|(p, _)| *p != participant)
            .map(|(p, m)| Peer {
                user_id: p.clone(),
                connection_id: m.connection.clone(),
            })
            .collect()
    }

    /// Distinct member connections, skipping `exclude` and optionally one participant's entry
    pub(crate) fn connections_except(
        &self,
        exclude: &ConnectionId,
        exclude_participant: Option<&ParticipantId>,
    ) -> Vec<ConnectionId> {
        let distinct: BTreeSet<&ConnectionId> = self
            .members
            .iter()
            .filter(|(p, _)| Some(*p) != exclude_participant)
            .map(|(_, m)| &m.connection)
            .filter(|c| *c != exclude)
            .collect();

        distinct.into_iter().cloned().collect()
    }

    /// Issue a chat timestamp that never goes backwards for this room
    pub(crate) fn stamp_message(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let timestamp = match self.last_message_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_message_at = Some(timestamp);
        timestamp
    }

    fn ordered(&self) -> Vec<(&ParticipantId, &Member)> {
        let mut members: Vec<_> = self.members.iter().collect();
        members.sort_by_key(|(_, m)| m.seq);
        members
    }
}
