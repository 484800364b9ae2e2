//! Entity records, create/update payloads and embedded read views.
//!
//! Records hold scalar fields only. Associations are never stored on a
//! record; they are resolved from the store's edge sets when a view is built.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::kinds::{EntityId, EntityKind};

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: EntityId,
    pub title: String,
    pub details: String,
    /// Free-form calendar timestamp, stored verbatim.
    pub datetime: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: EntityId,
    pub title: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: EntityId,
    pub url: String,
}

// =============================================================================
// Create payloads
// =============================================================================

/// Fields for a new meeting. A missing or empty `id` lets the store pick one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingDraft {
    pub id: Option<EntityId>,
    pub title: String,
    pub details: String,
    pub datetime: String,
    pub location: String,
}

impl MeetingDraft {
    pub fn into_record(self, id: EntityId) -> Meeting {
        Meeting {
            id,
            title: self.title,
            details: self.details,
            datetime: self.datetime,
            location: self.location,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarDraft {
    pub id: Option<EntityId>,
    pub title: String,
    pub details: String,
}

impl CalendarDraft {
    pub fn into_record(self, id: EntityId) -> Calendar {
        Calendar {
            id,
            title: self.title,
            details: self.details,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantDraft {
    pub id: Option<EntityId>,
    pub name: String,
    pub email: String,
}

impl ParticipantDraft {
    pub fn into_record(self, id: EntityId) -> Participant {
        Participant {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentDraft {
    pub id: Option<EntityId>,
    pub url: String,
}

impl AttachmentDraft {
    pub fn into_record(self, id: EntityId) -> Attachment {
        Attachment { id, url: self.url }
    }
}

/// A create request for any entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewEntity {
    Meeting(MeetingDraft),
    Calendar(CalendarDraft),
    Participant(ParticipantDraft),
    Attachment(AttachmentDraft),
}

impl NewEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            NewEntity::Meeting(_) => EntityKind::Meeting,
            NewEntity::Calendar(_) => EntityKind::Calendar,
            NewEntity::Participant(_) => EntityKind::Participant,
            NewEntity::Attachment(_) => EntityKind::Attachment,
        }
    }

    /// The caller-supplied id, ignoring blank strings.
    pub fn requested_id(&self) -> Option<&EntityId> {
        let id = match self {
            NewEntity::Meeting(draft) => draft.id.as_ref(),
            NewEntity::Calendar(draft) => draft.id.as_ref(),
            NewEntity::Participant(draft) => draft.id.as_ref(),
            NewEntity::Attachment(draft) => draft.id.as_ref(),
        };
        id.filter(|id| !id.is_empty())
    }
}

// =============================================================================
// Update payloads
// =============================================================================

/// Partial meeting update. `None` keeps the current value; an `id` in the
/// request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub details: Option<String>,
    pub datetime: Option<String>,
    pub location: Option<String>,
}

impl MeetingPatch {
    pub fn apply(self, meeting: &mut Meeting) {
        if let Some(title) = self.title {
            meeting.title = title;
        }
        if let Some(details) = self.details {
            meeting.details = details;
        }
        if let Some(datetime) = self.datetime {
            meeting.datetime = datetime;
        }
        if let Some(location) = self.location {
            meeting.location = location;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarPatch {
    pub title: Option<String>,
    pub details: Option<String>,
}

impl CalendarPatch {
    pub fn apply(self, calendar: &mut Calendar) {
        if let Some(title) = self.title {
            calendar.title = title;
        }
        if let Some(details) = self.details {
            calendar.details = details;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ParticipantPatch {
    pub fn apply(self, participant: &mut Participant) {
        if let Some(name) = self.name {
            participant.name = name;
        }
        if let Some(email) = self.email {
            participant.email = email;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentPatch {
    pub url: Option<String>,
}

impl AttachmentPatch {
    pub fn apply(self, attachment: &mut Attachment) {
        if let Some(url) = self.url {
            attachment.url = url;
        }
    }
}

/// An update request for any entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityPatch {
    Meeting(MeetingPatch),
    Calendar(CalendarPatch),
    Participant(ParticipantPatch),
    Attachment(AttachmentPatch),
}

impl EntityPatch {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityPatch::Meeting(_) => EntityKind::Meeting,
            EntityPatch::Calendar(_) => EntityKind::Calendar,
            EntityPatch::Participant(_) => EntityKind::Participant,
            EntityPatch::Attachment(_) => EntityKind::Attachment,
        }
    }
}

// =============================================================================
// Read views
// =============================================================================

/// A meeting with every associated calendar, participant and attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingView {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub calendars: Vec<Calendar>,
    pub participants: Vec<Participant>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarView {
    #[serde(flatten)]
    pub calendar: Calendar,
    pub meetings: Vec<Meeting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    #[serde(flatten)]
    pub participant: Participant,
    pub meetings: Vec<Meeting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentView {
    #[serde(flatten)]
    pub attachment: Attachment,
    pub meetings: Vec<Meeting>,
}

/// A read result for any entity kind. Serializes as the inner view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntityView {
    Meeting(MeetingView),
    Calendar(CalendarView),
    Participant(ParticipantView),
    Attachment(AttachmentView),
}

impl EntityView {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityView::Meeting(_) => EntityKind::Meeting,
            EntityView::Calendar(_) => EntityKind::Calendar,
            EntityView::Participant(_) => EntityKind::Participant,
            EntityView::Attachment(_) => EntityKind::Attachment,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            EntityView::Meeting(view) => &view.meeting.id,
            EntityView::Calendar(view) => &view.calendar.id,
            EntityView::Participant(view) => &view.participant.id,
            EntityView::Attachment(view) => &view.attachment.id,
        }
    }

    /// Ids of the embedded peers of the given kind, in embedding order.
    pub fn linked_ids(&self, peer: EntityKind) -> Vec<&EntityId> {
        match (self, peer) {
            (EntityView::Meeting(view), EntityKind::Calendar) => {
                view.calendars.iter().map(|c| &c.id).collect()
            }
            (EntityView::Meeting(view), EntityKind::Participant) => {
                view.participants.iter().map(|p| &p.id).collect()
            }
            (EntityView::Meeting(view), EntityKind::Attachment) => {
                view.attachments.iter().map(|a| &a.id).collect()
            }
            (EntityView::Calendar(view), EntityKind::Meeting) => {
                view.meetings.iter().map(|m| &m.id).collect()
            }
            (EntityView::Participant(view), EntityKind::Meeting) => {
                view.meetings.iter().map(|m| &m.id).collect()
            }
            (EntityView::Attachment(view), EntityKind::Meeting) => {
                view.meetings.iter().map(|m| &m.id).collect()
            }
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Typed entity bindings
// =============================================================================

/// Ties an entity record to its kind and payload types so that services
/// and HTTP handlers can be written once for all four collections.
pub trait EntityType: Send + Sync + 'static {
    const KIND: EntityKind;

    type Draft: DeserializeOwned + Send + 'static;
    type Patch: DeserializeOwned + Send + 'static;
    type View: Serialize + Send + 'static;

    fn new_entity(draft: Self::Draft) -> NewEntity;
    fn patch(patch: Self::Patch) -> EntityPatch;
    fn view(view: EntityView) -> Option<Self::View>;
}

impl EntityType for Meeting {
    const KIND: EntityKind = EntityKind::Meeting;

    type Draft = MeetingDraft;
    type Patch = MeetingPatch;
    type View = MeetingView;

    fn new_entity(draft: MeetingDraft) -> NewEntity {
        NewEntity::Meeting(draft)
    }

    fn patch(patch: MeetingPatch) -> EntityPatch {
        EntityPatch::Meeting(patch)
    }

    fn view(view: EntityView) -> Option<MeetingView> {
        match view {
            EntityView::Meeting(view) => Some(view),
            _ => None,
        }
    }
}

impl EntityType for Calendar {
    const KIND: EntityKind = EntityKind::Calendar;

    type Draft = CalendarDraft;
    type Patch = CalendarPatch;
    type View = CalendarView;

    fn new_entity(draft: CalendarDraft) -> NewEntity {
        NewEntity::Calendar(draft)
    }

    fn patch(patch: CalendarPatch) -> EntityPatch {
        EntityPatch::Calendar(patch)
    }

    fn view(view: EntityView) -> Option<CalendarView> {
        match view {
            EntityView::Calendar(view) => Some(view),
            _ => None,
        }
    }
}

impl EntityType for Participant {
    const KIND: EntityKind = EntityKind::Participant;

    type Draft = ParticipantDraft;
    type Patch = ParticipantPatch;
    type View = ParticipantView;

    fn new_entity(draft: ParticipantDraft) -> NewEntity {
        NewEntity::Participant(draft)
    }

    fn patch(patch: ParticipantPatch) -> EntityPatch {
        EntityPatch::Participant(patch)
    }

    fn view(view: EntityView) -> Option<ParticipantView> {
        match view {
            EntityView::Participant(view) => Some(view),
            _ => None,
        }
    }
}

impl EntityType for Attachment {
    const KIND: EntityKind = EntityKind::Attachment;

    type Draft = AttachmentDraft;
    type Patch = AttachmentPatch;
    type View = AttachmentView;

    fn new_entity(draft: AttachmentDraft) -> NewEntity {
        NewEntity::Attachment(draft)
    }

    fn patch(patch: AttachmentPatch) -> EntityPatch {
        EntityPatch::Attachment(patch)
    }

    fn view(view: EntityView) -> Option<AttachmentView> {
        match view {
            EntityView::Attachment(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_view_serializes_flat_with_embedded_peers() {
        let view = MeetingView {
            meeting: Meeting {
                id: EntityId::new("m1"),
                title: "Standup".to_string(),
                details: String::new(),
                datetime: "2024-05-01 09:00 AM".to_string(),
                location: "Room 4".to_string(),
            },
            calendars: vec![],
            participants: vec![Participant {
                id: EntityId::new("p1"),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            }],
            attachments: vec![],
        };

        let json = serde_json::to_value(EntityView::Meeting(view)).unwrap();
        assert_eq!(json["id"], "m1");
        assert_eq!(json["location"], "Room 4");
        assert_eq!(json["participants"][0]["email"], "ada@example.com");
        assert!(json["calendars"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_patch_ignores_id_and_keeps_missing_fields() {
        let patch: MeetingPatch =
            serde_json::from_str(r#"{"id": "other", "title": "Retro"}"#).unwrap();
        let mut meeting = Meeting {
            id: EntityId::new("m1"),
            title: "Standup".to_string(),
            details: "daily".to_string(),
            datetime: String::new(),
            location: String::new(),
        };
        patch.apply(&mut meeting);

        assert_eq!(meeting.id.as_str(), "m1");
        assert_eq!(meeting.title, "Retro");
        assert_eq!(meeting.details, "daily");
    }

    #[test]
    fn test_blank_requested_id_is_treated_as_absent() {
        let draft = NewEntity::Calendar(CalendarDraft {
            id: Some(EntityId::new("  ")),
            ..Default::default()
        });
        assert!(draft.requested_id().is_none());
    }
}
