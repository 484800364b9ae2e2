//! Canonical association storage.
//!
//! Each relationship kind owns exactly one [`EdgeSet`]. An edge is the pair
//! `(left, right)` oriented by [`RelationKind::endpoints`]; both navigation
//! directions are answered by lookup indices that are only mutated together
//! with the edge set itself, so the two directions cannot drift apart.

use std::collections::{HashMap, HashSet};

use crate::models::{EntityId, EntityKind, EntityRef, RelationKind, Side};

/// A set of undirected edges between two entity kinds.
#[derive(Debug, Default, Clone)]
pub struct EdgeSet {
    edges: HashSet<(EntityId, EntityId)>,
    // Lookup indices, insertion ordered per endpoint.
    by_left: HashMap<EntityId, Vec<EntityId>>,
    by_right: HashMap<EntityId, Vec<EntityId>>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Returns `false` if it was already present.
    pub fn insert(&mut self, left: EntityId, right: EntityId) -> bool {
        if !self.edges.insert((left.clone(), right.clone())) {
            return false;
        }
        self.by_left
            .entry(left.clone())
            .or_default()
            .push(right.clone());
        self.by_right.entry(right).or_default().push(left);
        true
    }

    /// Remove an edge. Returns `false` if it was not present.
    pub fn remove(&mut self, left: &EntityId, right: &EntityId) -> bool {
        if !self.edges.remove(&(left.clone(), right.clone())) {
            return false;
        }
        drop_from_index(&mut self.by_left, left, right);
        drop_from_index(&mut self.by_right, right, left);
        true
    }

    pub fn contains(&self, left: &EntityId, right: &EntityId) -> bool {
        self.edges.contains(&(left.clone(), right.clone()))
    }

    /// Peers of `id`, where `id` sits on `side`.
    pub fn peers(&self, side: Side, id: &EntityId) -> &[EntityId] {
        let index = match side {
            Side::Left => &self.by_left,
            Side::Right => &self.by_right,
        };
        index.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove every edge touching `id` on `side`. Returns the number removed.
    pub fn detach(&mut self, side: Side, id: &EntityId) -> usize {
        let peers = self.peers(side, id).to_vec();
        for peer in &peers {
            match side {
                Side::Left => self.remove(id, peer),
                Side::Right => self.remove(peer, id),
            };
        }
        peers.len()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn drop_from_index(index: &mut HashMap<EntityId, Vec<EntityId>>, key: &EntityId, peer: &EntityId) {
    if let Some(peers) = index.get_mut(key) {
        peers.retain(|p| p != peer);
        if peers.is_empty() {
            index.remove(key);
        }
    }
}

/// All edge sets of the store, one per relationship kind.
#[derive(Debug, Default, Clone)]
pub struct Associations {
    calendar_meeting: EdgeSet,
    meeting_participant: EdgeSet,
    meeting_attachment: EdgeSet,
}

impl Associations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self, relation: RelationKind) -> &EdgeSet {
        match relation {
            RelationKind::CalendarMeeting => &self.calendar_meeting,
            RelationKind::MeetingParticipant => &self.meeting_participant,
            RelationKind::MeetingAttachment => &self.meeting_attachment,
        }
    }

    fn edges_mut(&mut self, relation: RelationKind) -> &mut EdgeSet {
        match relation {
            RelationKind::CalendarMeeting => &mut self.calendar_meeting,
            RelationKind::MeetingParticipant => &mut self.meeting_participant,
            RelationKind::MeetingAttachment => &mut self.meeting_attachment,
        }
    }

    /// Link two entities of related kinds, in either order.
    ///
    /// Returns `None` if the kinds have no relationship, otherwise whether a
    /// new edge was added.
    pub fn link(&mut self, a: &EntityRef, b: &EntityRef) -> Option<bool> {
        let (relation, left, right) = orient(a, b)?;
        Some(self.edges_mut(relation).insert(left.clone(), right.clone()))
    }

    /// Unlink two entities of related kinds, in either order.
    ///
    /// Returns `None` if the kinds have no relationship, otherwise whether an
    /// edge was removed.
    pub fn unlink(&mut self, a: &EntityRef, b: &EntityRef) -> Option<bool> {
        let (relation, left, right) = orient(a, b)?;
        Some(self.edges_mut(relation).remove(left, right))
    }

    pub fn is_linked(&self, a: &EntityRef, b: &EntityRef) -> bool {
        orient(a, b)
            .map(|(relation, left, right)| self.edges(relation).contains(left, right))
            .unwrap_or(false)
    }

    /// Ids of `peer_kind` entities linked to `entity`.
    pub fn peers_of(&self, entity: &EntityRef, peer_kind: EntityKind) -> &[EntityId] {
        let Some(relation) = RelationKind::between(entity.kind, peer_kind) else {
            return &[];
        };
        match relation.side_of(entity.kind) {
            Some(side) => self.edges(relation).peers(side, &entity.id),
            None => &[],
        }
    }

    /// Cascading unlink: drop every edge touching `entity`.
    pub fn detach_all(&mut self, entity: &EntityRef) -> usize {
        let mut removed = 0;
        for relation in RelationKind::involving(entity.kind) {
            if let Some(side) = relation.side_of(entity.kind) {
                removed += self.edges_mut(relation).detach(side, &entity.id);
            }
        }
        removed
    }

    /// Total number of edges across all relationships.
    pub fn len(&self) -> usize {
        RelationKind::ALL
            .into_iter()
            .map(|relation| self.edges(relation).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve the relationship and canonical `(left, right)` ids for a pair.
fn orient<'a>(
    a: &'a EntityRef,
    b: &'a EntityRef,
) -> Option<(RelationKind, &'a EntityId, &'a EntityId)> {
    let relation = RelationKind::between(a.kind, b.kind)?;
    match relation.side_of(a.kind)? {
        Side::Left => Some((relation, &a.id, &b.id)),
        Side::Right => Some((relation, &b.id, &a.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(id: &str) -> EntityRef {
        EntityRef::new(EntityKind::Meeting, id)
    }

    fn participant(id: &str) -> EntityRef {
        EntityRef::new(EntityKind::Participant, id)
    }

    fn calendar(id: &str) -> EntityRef {
        EntityRef::new(EntityKind::Calendar, id)
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut edges = EdgeSet::new();
        assert!(edges.insert("m1".into(), "p1".into()));
        assert!(!edges.insert("m1".into(), "p1".into()));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges.peers(Side::Left, &"m1".into()).len(), 1);
        assert_eq!(edges.peers(Side::Right, &"p1".into()).len(), 1);
    }

    #[test]
    fn test_remove_updates_both_directions() {
        let mut edges = EdgeSet::new();
        edges.insert("m1".into(), "p1".into());
        edges.insert("m1".into(), "p2".into());

        assert!(edges.remove(&"m1".into(), &"p1".into()));
        assert!(!edges.remove(&"m1".into(), &"p1".into()));
        assert_eq!(edges.peers(Side::Left, &"m1".into()), &[EntityId::from("p2")]);
        assert!(edges.peers(Side::Right, &"p1".into()).is_empty());
    }

    #[test]
    fn test_peers_keep_insertion_order() {
        let mut edges = EdgeSet::new();
        edges.insert("c1".into(), "m3".into());
        edges.insert("c1".into(), "m1".into());
        edges.insert("c1".into(), "m2".into());

        let peers: Vec<&str> = edges
            .peers(Side::Left, &"c1".into())
            .iter()
            .map(EntityId::as_str)
            .collect();
        assert_eq!(peers, vec!["m3", "m1", "m2"]);
    }

    #[test]
    fn test_link_from_either_end_is_the_same_edge() {
        let mut assoc = Associations::new();
        assert_eq!(assoc.link(&meeting("m1"), &calendar("c1")), Some(true));
        assert_eq!(assoc.link(&calendar("c1"), &meeting("m1")), Some(false));
        assert_eq!(assoc.len(), 1);

        assert_eq!(
            assoc.peers_of(&calendar("c1"), EntityKind::Meeting),
            &[EntityId::from("m1")]
        );
        assert_eq!(
            assoc.peers_of(&meeting("m1"), EntityKind::Calendar),
            &[EntityId::from("c1")]
        );
    }

    #[test]
    fn test_link_rejects_unrelated_kinds() {
        let mut assoc = Associations::new();
        let attachment = EntityRef::new(EntityKind::Attachment, "a1");
        assert_eq!(assoc.link(&participant("p1"), &attachment), None);
        assert!(assoc.is_empty());
    }

    #[test]
    fn test_detach_all_removes_every_edge_of_entity() {
        let mut assoc = Associations::new();
        assoc.link(&meeting("m1"), &participant("p1"));
        assoc.link(&meeting("m1"), &calendar("c1"));
        assoc.link(&meeting("m2"), &participant("p1"));

        assert_eq!(assoc.detach_all(&meeting("m1")), 2);
        assert_eq!(assoc.len(), 1);
        assert!(assoc.peers_of(&calendar("c1"), EntityKind::Meeting).is_empty());
        assert_eq!(
            assoc.peers_of(&participant("p1"), EntityKind::Meeting),
            &[EntityId::from("m2")]
        );
    }
}
