//! Identifiers, entity kinds and the relationship kinds that connect them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque entity identifier.
///
/// Callers may supply their own ids on create; otherwise the store assigns a
/// UUID v4 string. Ids are compared as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        EntityId(value.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        EntityId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(v: String) -> Self {
        EntityId(v)
    }
}

impl From<&str> for EntityId {
    fn from(v: &str) -> Self {
        EntityId(v.to_string())
    }
}

impl From<EntityId> for String {
    fn from(v: EntityId) -> Self {
        v.0
    }
}

/// The four entity collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Meeting,
    Calendar,
    Participant,
    Attachment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Meeting,
        EntityKind::Calendar,
        EntityKind::Participant,
        EntityKind::Attachment,
    ];

    /// Collection name as used in URL paths (`meetings`, `calendars`, ...).
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Meeting => "meetings",
            EntityKind::Calendar => "calendars",
            EntityKind::Participant => "participants",
            EntityKind::Attachment => "attachments",
        }
    }

    /// Singular lowercase label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Meeting => "meeting",
            EntityKind::Calendar => "calendar",
            EntityKind::Participant => "participant",
            EntityKind::Attachment => "attachment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Parse either the collection name or the singular label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meetings" | "meeting" => Ok(Self::Meeting),
            "calendars" | "calendar" => Ok(Self::Calendar),
            "participants" | "participant" => Ok(Self::Participant),
            "attachments" | "attachment" => Ok(Self::Attachment),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

/// Which end of a canonically oriented edge an entity sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// The allowed many-to-many relationships.
///
/// Each relationship has a fixed orientation `(left, right)` used to key its
/// edge set. Links can be requested from either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Calendar holds Meeting.
    CalendarMeeting,
    MeetingParticipant,
    MeetingAttachment,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [
        RelationKind::CalendarMeeting,
        RelationKind::MeetingParticipant,
        RelationKind::MeetingAttachment,
    ];

    /// Canonical `(left, right)` endpoint kinds.
    pub fn endpoints(self) -> (EntityKind, EntityKind) {
        match self {
            RelationKind::CalendarMeeting => (EntityKind::Calendar, EntityKind::Meeting),
            RelationKind::MeetingParticipant => (EntityKind::Meeting, EntityKind::Participant),
            RelationKind::MeetingAttachment => (EntityKind::Meeting, EntityKind::Attachment),
        }
    }

    /// The relationship connecting two kinds, in either order.
    pub fn between(a: EntityKind, b: EntityKind) -> Option<Self> {
        Self::ALL.into_iter().find(|relation| {
            let (left, right) = relation.endpoints();
            (left == a && right == b) || (left == b && right == a)
        })
    }

    /// Side occupied by `kind`, or `None` if the kind is not an endpoint.
    pub fn side_of(self, kind: EntityKind) -> Option<Side> {
        let (left, right) = self.endpoints();
        if kind == left {
            Some(Side::Left)
        } else if kind == right {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// All relationships in which `kind` participates.
    pub fn involving(kind: EntityKind) -> impl Iterator<Item = RelationKind> {
        Self::ALL
            .into_iter()
            .filter(move |relation| relation.side_of(kind).is_some())
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = self.endpoints();
        write!(f, "{}-{}", left, right)
    }
}

/// A typed reference to one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<EntityId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_between_is_order_independent() {
        assert_eq!(
            RelationKind::between(EntityKind::Meeting, EntityKind::Calendar),
            Some(RelationKind::CalendarMeeting)
        );
        assert_eq!(
            RelationKind::between(EntityKind::Calendar, EntityKind::Meeting),
            Some(RelationKind::CalendarMeeting)
        );
        assert_eq!(
            RelationKind::between(EntityKind::Attachment, EntityKind::Meeting),
            Some(RelationKind::MeetingAttachment)
        );
    }

    #[test]
    fn test_disallowed_pairs_have_no_relation() {
        assert_eq!(
            RelationKind::between(EntityKind::Participant, EntityKind::Attachment),
            None
        );
        assert_eq!(
            RelationKind::between(EntityKind::Calendar, EntityKind::Participant),
            None
        );
        assert_eq!(
            RelationKind::between(EntityKind::Meeting, EntityKind::Meeting),
            None
        );
    }

    #[test]
    fn test_meeting_participates_in_every_relation() {
        let relations: Vec<_> = RelationKind::involving(EntityKind::Meeting).collect();
        assert_eq!(relations.len(), 3);

        let relations: Vec<_> = RelationKind::involving(EntityKind::Participant).collect();
        assert_eq!(relations, vec![RelationKind::MeetingParticipant]);
    }

    #[test]
    fn test_entity_kind_from_collection_name() {
        assert_eq!("meetings".parse::<EntityKind>().unwrap(), EntityKind::Meeting);
        assert_eq!("Calendar".parse::<EntityKind>().unwrap(), EntityKind::Calendar);
        assert!("rooms".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
