use super::repositories::LocalRepository;
use super::repository::RepositoryError;
use super::services;
use crate::models::*;

fn participant_draft(name: &str, email: &str) -> ParticipantDraft {
    ParticipantDraft {
        name: name.to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_returns_typed_view() {
    let repo = LocalRepository::new();
    let view = services::create::<Participant, _>(&repo, participant_draft("Ada", "ada@example.com"))
        .await
        .unwrap();

    assert_eq!(view.participant.name, "Ada");
    assert!(!view.participant.id.is_empty());
    assert!(view.meetings.is_empty());
}

#[tokio::test]
async fn test_get_of_wrong_collection_is_not_found() {
    let repo = LocalRepository::new();
    let calendar = services::create::<Calendar, _>(&repo, CalendarDraft::default())
        .await
        .unwrap();

    let err = services::get::<Meeting, _>(&repo, &calendar.calendar.id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_link_many_then_unlink_many() {
    let repo = LocalRepository::new();
    let meeting = services::create::<Meeting, _>(&repo, MeetingDraft::default())
        .await
        .unwrap();
    let mut ids = Vec::new();
    for (name, email) in [("Ada", "ada@example.com"), ("Alan", "alan@example.com")] {
        let p = services::create::<Participant, _>(&repo, participant_draft(name, email))
            .await
            .unwrap();
        ids.push(p.participant.id);
    }

    let linked = services::link_many::<Meeting, _>(
        &repo,
        &meeting.meeting.id,
        EntityKind::Participant,
        &ids,
    )
    .await
    .unwrap();
    assert_eq!(linked.participants.len(), 2);

    let unlinked = services::unlink_many::<Meeting, _>(
        &repo,
        &meeting.meeting.id,
        EntityKind::Participant,
        &ids[..1],
    )
    .await
    .unwrap();
    assert_eq!(unlinked.participants.len(), 1);
    assert_eq!(unlinked.participants[0].id, ids[1]);
}

#[tokio::test]
async fn test_update_with_invalid_email_leaves_record_unchanged() {
    let repo = LocalRepository::new();
    let created = services::create::<Participant, _>(&repo, participant_draft("Ada", "ada@example.com"))
        .await
        .unwrap();
    let id = created.participant.id.clone();

    let patch = ParticipantPatch {
        email: Some("not-an-email".to_string()),
        ..Default::default()
    };
    let err = services::update::<Participant, _>(&repo, &id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidArgument { .. }));
    assert_eq!(err.context().entity_id.as_deref(), Some(id.as_str()));

    let current = services::get::<Participant, _>(&repo, &id).await.unwrap();
    assert_eq!(current.participant.email, "ada@example.com");
}

#[tokio::test]
async fn test_delete_cascades_through_service() {
    let repo = LocalRepository::new();
    let meeting = services::create::<Meeting, _>(&repo, MeetingDraft::default())
        .await
        .unwrap();
    let calendar = services::create::<Calendar, _>(&repo, CalendarDraft::default())
        .await
        .unwrap();
    let calendar_ref = EntityRef::new(EntityKind::Calendar, calendar.calendar.id.clone());

    services::link::<Meeting, _>(&repo, &meeting.meeting.id, &calendar_ref)
        .await
        .unwrap();
    services::delete::<Meeting, _>(&repo, &meeting.meeting.id)
        .await
        .unwrap();

    let calendar = services::get::<Calendar, _>(&repo, &calendar.calendar.id)
        .await
        .unwrap();
    assert!(calendar.meetings.is_empty());
    assert_eq!(repo.link_count(), 0);
}

#[tokio::test]
async fn test_health_check_reflects_store_state() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
    repo.set_healthy(false);
    assert!(!services::health_check(&repo).await.unwrap());
}
