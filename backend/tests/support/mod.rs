#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use rockets_backend::db::repository::EntityRepository;
use rockets_backend::db::LocalRepository;
use rockets_backend::models::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment, since integration tests run on parallel threads.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Store fixtures
// =============================================================================

pub async fn add_meeting(repo: &LocalRepository, id: &str, title: &str) -> EntityRef {
    let draft = MeetingDraft {
        id: Some(id.into()),
        title: title.to_string(),
        datetime: "2024-05-01 09:00 AM".to_string(),
        location: "Room 4".to_string(),
        ..Default::default()
    };
    repo.create(NewEntity::Meeting(draft)).await.unwrap();
    EntityRef::new(EntityKind::Meeting, id)
}

pub async fn add_calendar(repo: &LocalRepository, id: &str, title: &str) -> EntityRef {
    let draft = CalendarDraft {
        id: Some(id.into()),
        title: title.to_string(),
        ..Default::default()
    };
    repo.create(NewEntity::Calendar(draft)).await.unwrap();
    EntityRef::new(EntityKind::Calendar, id)
}

pub async fn add_participant(repo: &LocalRepository, id: &str) -> EntityRef {
    let draft = ParticipantDraft {
        id: Some(id.into()),
        name: format!("Participant {}", id),
        email: format!("{}@example.com", id),
    };
    repo.create(NewEntity::Participant(draft)).await.unwrap();
    EntityRef::new(EntityKind::Participant, id)
}

pub async fn add_attachment(repo: &LocalRepository, id: &str) -> EntityRef {
    let draft = AttachmentDraft {
        id: Some(id.into()),
        url: format!("https://files.example.com/{}.pdf", id),
    };
    repo.create(NewEntity::Attachment(draft)).await.unwrap();
    EntityRef::new(EntityKind::Attachment, id)
}

/// Create an entity of any kind with default fixture fields.
pub async fn add_entity(repo: &LocalRepository, kind: EntityKind, id: &str) -> EntityRef {
    match kind {
        EntityKind::Meeting => add_meeting(repo, id, "Sync").await,
        EntityKind::Calendar => add_calendar(repo, id, "Team").await,
        EntityKind::Participant => add_participant(repo, id).await,
        EntityKind::Attachment => add_attachment(repo, id).await,
    }
}

/// Ids embedded in `entity`'s view under `peer_kind`.
pub async fn linked_ids(
    repo: &LocalRepository,
    entity: &EntityRef,
    peer_kind: EntityKind,
) -> Vec<String> {
    let view = repo.get(entity.kind, &entity.id).await.unwrap();
    view.linked_ids(peer_kind)
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}
