//! In-memory local repository implementation.
//!
//! All entity tables and edge sets live behind a single `RwLock`. Every
//! mutation validates and applies under one write guard, and every read
//! builds its embedded views under one read guard, so callers never observe
//! a half-applied link or a partially cascaded delete.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::db::edges::Associations;
use crate::db::repository::*;
use crate::db::validation;
use crate::models::*;

/// In-memory local repository.
///
/// # Example
/// ```
/// use rockets_backend::db::repositories::LocalRepository;
/// use rockets_backend::db::repository::{EntityRepository, ListWindow};
/// use rockets_backend::models::{EntityKind, MeetingDraft, NewEntity};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// repo.create(NewEntity::Meeting(MeetingDraft::default())).await.unwrap();
/// assert_eq!(repo.list(EntityKind::Meeting, ListWindow::default()).await.unwrap().len(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

/// Insertion-ordered table for one entity kind.
struct Table<T> {
    rows: HashMap<EntityId, T>,
    order: Vec<EntityId>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    fn contains(&self, id: &EntityId) -> bool {
        self.rows.contains_key(id)
    }

    fn get(&self, id: &EntityId) -> Option<&T> {
        self.rows.get(id)
    }

    fn insert(&mut self, id: EntityId, row: T) {
        if self.rows.insert(id.clone(), row).is_none() {
            self.order.push(id);
        }
    }

    fn replace(&mut self, id: &EntityId, row: T) {
        if let Some(slot) = self.rows.get_mut(id) {
            *slot = row;
        }
    }

    fn remove(&mut self, id: &EntityId) -> Option<T> {
        let row = self.rows.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(row)
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.rows.get(id))
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

struct LocalData {
    meetings: Table<Meeting>,
    calendars: Table<Calendar>,
    participants: Table<Participant>,
    attachments: Table<Attachment>,

    // The only place associations are stored
    associations: Associations,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            meetings: Table::default(),
            calendars: Table::default(),
            participants: Table::default(),
            attachments: Table::default(),
            associations: Associations::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing store failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of stored entities of a kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.data.read().count(kind)
    }

    /// Total number of association edges.
    pub fn link_count(&self) -> usize {
        self.data.read().associations.len()
    }

    /// Check whether two entities are linked.
    pub fn is_linked(&self, a: &EntityRef, b: &EntityRef) -> bool {
        self.data.read().associations.is_linked(a, b)
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve embedded peers of `entity` from `table`.
fn embed<T: Clone>(
    associations: &Associations,
    table: &Table<T>,
    entity: &EntityRef,
    peer_kind: EntityKind,
) -> Vec<T> {
    associations
        .peers_of(entity, peer_kind)
        .iter()
        .filter_map(|id| table.get(id).cloned())
        .collect()
}

fn rejected(
    err: RepositoryError,
    operation: &str,
    kind: EntityKind,
    id: &EntityId,
) -> RepositoryError {
    err.with_operation(operation).with_entity_if_missing(kind, id)
}

fn ensure_related(operation: &str, owner: &EntityRef, peer_kind: EntityKind) -> RepositoryResult<()> {
    if RelationKind::between(owner.kind, peer_kind).is_none() {
        return Err(RepositoryError::invalid_argument_with_context(
            format!("A {} cannot be linked to a {}", owner.kind, peer_kind),
            ErrorContext::new(operation).with_ref(owner),
        ));
    }
    Ok(())
}

impl LocalData {
    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.is_healthy {
            return Err(RepositoryError::internal("Store is not healthy"));
        }
        Ok(())
    }

    fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Meeting => self.meetings.len(),
            EntityKind::Calendar => self.calendars.len(),
            EntityKind::Participant => self.participants.len(),
            EntityKind::Attachment => self.attachments.len(),
        }
    }

    fn contains(&self, entity: &EntityRef) -> bool {
        match entity.kind {
            EntityKind::Meeting => self.meetings.contains(&entity.id),
            EntityKind::Calendar => self.calendars.contains(&entity.id),
            EntityKind::Participant => self.participants.contains(&entity.id),
            EntityKind::Attachment => self.attachments.contains(&entity.id),
        }
    }

    fn require(&self, operation: &str, entity: &EntityRef) -> RepositoryResult<()> {
        if self.contains(entity) {
            Ok(())
        } else {
            Err(RepositoryError::missing_entity(operation, entity))
        }
    }

    fn fresh_id(&self, kind: EntityKind) -> EntityId {
        loop {
            let id = EntityId::generate();
            if !self.contains(&EntityRef::new(kind, id.clone())) {
                return id;
            }
        }
    }

    // ==================== Views ====================

    fn meeting_view(&self, meeting: &Meeting) -> MeetingView {
        let entity = EntityRef::new(EntityKind::Meeting, meeting.id.clone());
        MeetingView {
            meeting: meeting.clone(),
            calendars: embed(&self.associations, &self.calendars, &entity, EntityKind::Calendar),
            participants: embed(
                &self.associations,
                &self.participants,
                &entity,
                EntityKind::Participant,
            ),
            attachments: embed(
                &self.associations,
                &self.attachments,
                &entity,
                EntityKind::Attachment,
            ),
        }
    }

    fn calendar_view(&self, calendar: &Calendar) -> CalendarView {
        let entity = EntityRef::new(EntityKind::Calendar, calendar.id.clone());
        CalendarView {
            calendar: calendar.clone(),
            meetings: embed(&self.associations, &self.meetings, &entity, EntityKind::Meeting),
        }
    }

    fn participant_view(&self, participant: &Participant) -> ParticipantView {
        let entity = EntityRef::new(EntityKind::Participant, participant.id.clone());
        ParticipantView {
            participant: participant.clone(),
            meetings: embed(&self.associations, &self.meetings, &entity, EntityKind::Meeting),
        }
    }

    fn attachment_view(&self, attachment: &Attachment) -> AttachmentView {
        let entity = EntityRef::new(EntityKind::Attachment, attachment.id.clone());
        AttachmentView {
            attachment: attachment.clone(),
            meetings: embed(&self.associations, &self.meetings, &entity, EntityKind::Meeting),
        }
    }

    fn view(&self, kind: EntityKind, id: &EntityId) -> Option<EntityView> {
        match kind {
            EntityKind::Meeting => self
                .meetings
                .get(id)
                .map(|m| EntityView::Meeting(self.meeting_view(m))),
            EntityKind::Calendar => self
                .calendars
                .get(id)
                .map(|c| EntityView::Calendar(self.calendar_view(c))),
            EntityKind::Participant => self
                .participants
                .get(id)
                .map(|p| EntityView::Participant(self.participant_view(p))),
            EntityKind::Attachment => self
                .attachments
                .get(id)
                .map(|a| EntityView::Attachment(self.attachment_view(a))),
        }
    }

    fn view_of(&self, operation: &str, entity: &EntityRef) -> RepositoryResult<EntityView> {
        self.view(entity.kind, &entity.id)
            .ok_or_else(|| RepositoryError::missing_entity(operation, entity))
    }

    fn list(&self, kind: EntityKind, window: ListWindow) -> Vec<EntityView> {
        match kind {
            EntityKind::Meeting => window
                .apply(self.meetings.iter())
                .map(|m| EntityView::Meeting(self.meeting_view(m)))
                .collect(),
            EntityKind::Calendar => window
                .apply(self.calendars.iter())
                .map(|c| EntityView::Calendar(self.calendar_view(c)))
                .collect(),
            EntityKind::Participant => window
                .apply(self.participants.iter())
                .map(|p| EntityView::Participant(self.participant_view(p)))
                .collect(),
            EntityKind::Attachment => window
                .apply(self.attachments.iter())
                .map(|a| EntityView::Attachment(self.attachment_view(a)))
                .collect(),
        }
    }

    fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> Vec<EntityView> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.view(kind, id))
            .collect()
    }

    // ==================== Writes ====================

    fn create(&mut self, entity: NewEntity) -> RepositoryResult<EntityView> {
        let kind = entity.kind();
        let id = match entity.requested_id() {
            Some(requested) => {
                let target = EntityRef::new(kind, requested.clone());
                if self.contains(&target) {
                    return Err(RepositoryError::conflict_with_context(
                        format!("{} id {} is already in use", kind, requested),
                        ErrorContext::new("create").with_ref(&target),
                    ));
                }
                requested.clone()
            }
            None => self.fresh_id(kind),
        };
        let target = EntityRef::new(kind, id.clone());

        match entity {
            NewEntity::Meeting(draft) => {
                let record = draft.into_record(id.clone());
                validation::validate_meeting(&record)
                    .map_err(|e| rejected(e, "create", kind, &id))?;
                self.meetings.insert(id, record);
            }
            NewEntity::Calendar(draft) => {
                let record = draft.into_record(id.clone());
                validation::validate_calendar(&record)
                    .map_err(|e| rejected(e, "create", kind, &id))?;
                self.calendars.insert(id, record);
            }
            NewEntity::Participant(draft) => {
                let record = draft.into_record(id.clone());
                validation::validate_participant(&record)
                    .map_err(|e| rejected(e, "create", kind, &id))?;
                self.participants.insert(id, record);
            }
            NewEntity::Attachment(draft) => {
                let record = draft.into_record(id.clone());
                validation::validate_attachment(&record)
                    .map_err(|e| rejected(e, "create", kind, &id))?;
                self.attachments.insert(id, record);
            }
        }

        self.view_of("create", &target)
    }

    fn update(&mut self, id: &EntityId, patch: EntityPatch) -> RepositoryResult<EntityView> {
        let kind = patch.kind();
        let target = EntityRef::new(kind, id.clone());
        let missing = || RepositoryError::missing_entity("update", &target);

        match patch {
            EntityPatch::Meeting(patch) => {
                let mut next = self.meetings.get(id).cloned().ok_or_else(missing)?;
                patch.apply(&mut next);
                validation::validate_meeting(&next).map_err(|e| rejected(e, "update", kind, id))?;
                self.meetings.replace(id, next);
            }
            EntityPatch::Calendar(patch) => {
                let mut next = self.calendars.get(id).cloned().ok_or_else(missing)?;
                patch.apply(&mut next);
                validation::validate_calendar(&next)
                    .map_err(|e| rejected(e, "update", kind, id))?;
                self.calendars.replace(id, next);
            }
            EntityPatch::Participant(patch) => {
                let mut next = self.participants.get(id).cloned().ok_or_else(missing)?;
                patch.apply(&mut next);
                validation::validate_participant(&next)
                    .map_err(|e| rejected(e, "update", kind, id))?;
                self.participants.replace(id, next);
            }
            EntityPatch::Attachment(patch) => {
                let mut next = self.attachments.get(id).cloned().ok_or_else(missing)?;
                patch.apply(&mut next);
                validation::validate_attachment(&next)
                    .map_err(|e| rejected(e, "update", kind, id))?;
                self.attachments.replace(id, next);
            }
        }

        self.view_of("update", &target)
    }

    /// Remove an entity and cascade-unlink it. Returns the number of edges dropped.
    fn delete(&mut self, kind: EntityKind, id: &EntityId) -> RepositoryResult<usize> {
        let target = EntityRef::new(kind, id.clone());
        let removed = match kind {
            EntityKind::Meeting => self.meetings.remove(id).is_some(),
            EntityKind::Calendar => self.calendars.remove(id).is_some(),
            EntityKind::Participant => self.participants.remove(id).is_some(),
            EntityKind::Attachment => self.attachments.remove(id).is_some(),
        };
        if !removed {
            return Err(RepositoryError::missing_entity("delete", &target));
        }
        Ok(self.associations.detach_all(&target))
    }

    fn link_all(
        &mut self,
        operation: &str,
        owner: &EntityRef,
        peer_kind: EntityKind,
        peer_ids: &[EntityId],
        add: bool,
    ) -> RepositoryResult<EntityView> {
        ensure_related(operation, owner, peer_kind)?;
        self.require(operation, owner)?;

        let peers: Vec<EntityRef> = peer_ids
            .iter()
            .map(|id| EntityRef::new(peer_kind, id.clone()))
            .collect();
        // Every endpoint is checked before the first edge changes
        for peer in &peers {
            self.require(operation, peer)?;
        }

        for peer in &peers {
            if add {
                self.associations.link(owner, peer);
            } else {
                self.associations.unlink(owner, peer);
            }
        }

        self.view_of(operation, owner)
    }
}

#[async_trait]
impl EntityRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read();
        Ok(data.is_healthy)
    }

    async fn create(&self, entity: NewEntity) -> RepositoryResult<EntityView> {
        let mut data = self.data.write();
        data.check_health()?;
        data.create(entity)
    }

    async fn get(&self, kind: EntityKind, id: &EntityId) -> RepositoryResult<EntityView> {
        let data = self.data.read();
        data.check_health()?;
        data.view_of("get", &EntityRef::new(kind, id.clone()))
    }

    async fn get_many(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
    ) -> RepositoryResult<Vec<EntityView>> {
        let data = self.data.read();
        data.check_health()?;
        Ok(data.get_many(kind, ids))
    }

    async fn list(
        &self,
        kind: EntityKind,
        window: ListWindow,
    ) -> RepositoryResult<Vec<EntityView>> {
        let data = self.data.read();
        data.check_health()?;
        Ok(data.list(kind, window))
    }

    async fn update(&self, id: &EntityId, patch: EntityPatch) -> RepositoryResult<EntityView> {
        let mut data = self.data.write();
        data.check_health()?;
        data.update(id, patch)
    }

    async fn delete(&self, kind: EntityKind, id: &EntityId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        data.check_health()?;
        data.delete(kind, id).map(|_| ())
    }
}

#[async_trait]
impl LinkRepository for LocalRepository {
    async fn link(&self, owner: &EntityRef, peer: &EntityRef) -> RepositoryResult<EntityView> {
        let mut data = self.data.write();
        data.check_health()?;
        data.link_all("link", owner, peer.kind, std::slice::from_ref(&peer.id), true)
    }

    async fn unlink(&self, owner: &EntityRef, peer: &EntityRef) -> RepositoryResult<EntityView> {
        let mut data = self.data.write();
        data.check_health()?;
        data.link_all("unlink", owner, peer.kind, std::slice::from_ref(&peer.id), false)
    }

    async fn link_many(
        &self,
        owner: &EntityRef,
        peer_kind: EntityKind,
        peer_ids: &[EntityId],
    ) -> RepositoryResult<EntityView> {
        let mut data = self.data.write();
        data.check_health()?;
        if peer_ids.is_empty() {
            return Err(RepositoryError::invalid_argument_with_context(
                format!("No {} ids provided to link", peer_kind),
                ErrorContext::new("link").with_ref(owner),
            ));
        }
        data.link_all("link", owner, peer_kind, peer_ids, true)
    }

    async fn unlink_many(
        &self,
        owner: &EntityRef,
        peer_kind: EntityKind,
        peer_ids: &[EntityId],
    ) -> RepositoryResult<EntityView> {
        let mut data = self.data.write();
        data.check_health()?;
        if peer_ids.is_empty() {
            return Err(RepositoryError::invalid_argument_with_context(
                format!("No {} ids provided to unlink", peer_kind),
                ErrorContext::new("unlink").with_ref(owner),
            ));
        }
        data.link_all("unlink", owner, peer_kind, peer_ids, false)
    }
}
