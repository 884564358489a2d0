//! Request create, update and delete workflows against SQLite.

#![allow(clippy::similar_names)]

mod common;

use chrono::NaiveDate;
use hwf_core::request::{DraftError, RequestStatus};
use hwf_db::entities::{
    delivery_assignments, request_items, request_teams, request_volunteers, requests,
};
use hwf_db::repositories::{
    AssignVolunteerInput, AssignmentRepository, ClientError, ClientRepository, InventoryError,
    InventoryRepository, RequestError, RequestFilter, RequestRepository, TeamRepository,
};
use hwf_shared::types::PageRequest;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use common::{seed, setup_db};

async fn team_rows(db: &DatabaseConnection, request_id: i32) -> Vec<i32> {
    let mut ids: Vec<i32> = request_teams::Entity::find()
        .filter(request_teams::Column::RequestId.eq(request_id))
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.team_id)
        .collect();
    ids.sort_unstable();
    ids
}

async fn item_count(db: &DatabaseConnection, request_id: i32) -> u64 {
    request_items::Entity::find()
        .filter(request_items::Column::RequestId.eq(request_id))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_empty_request_writes_only_the_request_row() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let saved = repo.create_request(fx.draft()).await.unwrap();

    assert_eq!(requests::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(request_teams::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(request_items::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(request_volunteers::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(saved.request.request.status, "new");
    assert_eq!(saved.request.request.priority, "medium");
    assert_eq!(saved.request.request.team_id, None);
    assert!(saved.stock_warnings.is_empty());
}

#[tokio::test]
async fn test_create_with_two_teams_writes_two_links() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let draft = fx.draft_with(&fx.team_ids[..2], &[]);
    let saved = repo.create_request(draft).await.unwrap();
    let id = saved.request.request.id;

    assert_eq!(team_rows(&db, id).await, vec![fx.team_ids[0], fx.team_ids[1]]);
    assert_eq!(saved.request.team_ids, vec![fx.team_ids[0], fx.team_ids[1]]);
    assert_eq!(saved.request.request.team_id, Some(fx.team_ids[0]));
}

#[tokio::test]
async fn test_duplicate_team_ids_are_not_deduplicated() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let team = fx.team_ids[0];
    let saved = repo
        .create_request(fx.draft_with(&[team, team], &[]))
        .await
        .unwrap();

    assert_eq!(team_rows(&db, saved.request.request.id).await, vec![team, team]);
}

#[tokio::test]
async fn test_update_replaces_team_set() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());
    let [t1, t2, t3] = [fx.team_ids[0], fx.team_ids[1], fx.team_ids[2]];

    let saved = repo
        .create_request(fx.draft_with(&[t1, t2], &[]))
        .await
        .unwrap();
    let id = saved.request.request.id;

    let updated = repo
        .update_request(id, fx.draft_with(&[t2, t3], &[]))
        .await
        .unwrap();

    assert_eq!(team_rows(&db, id).await, vec![t2, t3]);
    assert_eq!(updated.request.request.team_id, Some(t2));
}

#[tokio::test]
async fn test_update_with_no_teams_or_products_clears_links() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let saved = repo
        .create_request(fx.draft_with(&fx.team_ids, &[(fx.item_id, 2)]))
        .await
        .unwrap();
    let id = saved.request.request.id;

    let updated = repo.update_request(id, fx.draft()).await.unwrap();

    assert!(team_rows(&db, id).await.is_empty());
    assert_eq!(item_count(&db, id).await, 0);
    assert_eq!(updated.request.request.team_id, None);
}

#[tokio::test]
async fn test_update_reinserts_items_even_when_unchanged() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());
    let draft = fx.draft_with(&[], &[(fx.item_id, 3)]);

    let saved = repo.create_request(draft.clone()).await.unwrap();
    let id = saved.request.request.id;
    let first_item_id = saved.request.items[0].item.id;

    let updated = repo.update_request(id, draft).await.unwrap();

    assert_eq!(updated.request.items.len(), 1);
    assert_ne!(updated.request.items[0].item.id, first_item_id);
    assert_eq!(updated.request.items[0].item.quantity, 3);
}

#[tokio::test]
async fn test_items_are_written_with_requested_status() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let saved = repo
        .create_request(fx.draft_with(&[], &[(fx.item_id, 4), (fx.scarce_item_id, 1)]))
        .await
        .unwrap();

    let items = &saved.request.items;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.item.status == "requested"));
    assert_eq!(items[0].item_name.as_deref(), Some("Single bed frame"));
    assert_eq!(items[0].available_quantity, Some(10));
}

#[tokio::test]
async fn test_over_stock_quantity_is_accepted_with_warning() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let saved = repo
        .create_request(fx.draft_with(&[], &[(fx.scarce_item_id, 5)]))
        .await
        .unwrap();

    assert_eq!(saved.request.items.len(), 1);
    assert_eq!(saved.request.items[0].item.quantity, 5);
    assert_eq!(saved.stock_warnings.len(), 1);
    assert_eq!(saved.stock_warnings[0].inventory_item_id, fx.scarce_item_id);
    assert_eq!(saved.stock_warnings[0].available, 2);

    // Stock on hand is not reserved or decremented.
    let item = InventoryRepository::new(db.clone())
        .find_by_id(fx.scarce_item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.quantity, 2);
}

#[tokio::test]
async fn test_volunteer_link_is_idempotent_across_saves() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());
    let mut draft = fx.draft();
    draft.volunteer_id = Some(fx.volunteer_id);

    let saved = repo.create_request(draft.clone()).await.unwrap();
    let id = saved.request.request.id;
    repo.update_request(id, draft.clone()).await.unwrap();
    let updated = repo.update_request(id, draft).await.unwrap();

    assert_eq!(updated.request.volunteer_ids, vec![fx.volunteer_id]);
    assert_eq!(request_volunteers::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_reference_rolls_back_everything() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let err = repo
        .create_request(fx.draft_with(&fx.team_ids[..1], &[(fx.item_id, 1), (9999, 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::InventoryItemNotFound(9999)));
    assert_eq!(requests::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(request_teams::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(request_items::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_update_keeps_previous_teams_and_items() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let saved = repo
        .create_request(fx.draft_with(&fx.team_ids[..2], &[(fx.item_id, 3)]))
        .await
        .unwrap();
    let id = saved.request.request.id;

    let mut draft = fx.draft_with(&fx.team_ids[2..], &[(9999, 1)]);
    draft.status = RequestStatus::Completed;
    let err = repo.update_request(id, draft).await.unwrap_err();
    assert!(matches!(err, RequestError::InventoryItemNotFound(9999)));

    assert_eq!(team_rows(&db, id).await, fx.team_ids[..2].to_vec());
    assert_eq!(item_count(&db, id).await, 1);
    let stored = requests::Entity::find_by_id(id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.team_id, Some(fx.team_ids[0]));
    assert_eq!(stored.status, "new");
}

#[tokio::test]
async fn test_deleting_a_team_drops_its_request_links() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let saved = repo
        .create_request(fx.draft_with(&fx.team_ids[..2], &[]))
        .await
        .unwrap();
    let id = saved.request.request.id;

    TeamRepository::new(db.clone())
        .delete(fx.team_ids[1])
        .await
        .unwrap();

    assert_eq!(team_rows(&db, id).await, vec![fx.team_ids[0]]);
    let details = repo.get_request(id).await.unwrap().unwrap();
    assert_eq!(details.request.team_id, Some(fx.team_ids[0]));
}

#[tokio::test]
async fn test_deleting_the_first_team_moves_or_clears_legacy_team_id() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let single = repo
        .create_request(fx.draft_with(&fx.team_ids[..1], &[]))
        .await
        .unwrap()
        .request
        .request
        .id;
    let pair = repo
        .create_request(fx.draft_with(&[fx.team_ids[0], fx.team_ids[2]], &[]))
        .await
        .unwrap()
        .request
        .request
        .id;

    TeamRepository::new(db.clone())
        .delete(fx.team_ids[0])
        .await
        .unwrap();

    let single = repo.get_request(single).await.unwrap().unwrap();
    assert!(single.team_ids.is_empty());
    assert_eq!(single.request.team_id, None);

    let pair = repo.get_request(pair).await.unwrap().unwrap();
    assert_eq!(pair.team_ids, vec![fx.team_ids[2]]);
    assert_eq!(pair.request.team_id, Some(fx.team_ids[2]));

    let by_deleted = repo
        .list_requests(
            RequestFilter {
                team_id: Some(fx.team_ids[0]),
                ..RequestFilter::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_deleted.meta.total, 0);
}

#[tokio::test]
async fn test_unknown_client_and_team_are_rejected() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let mut draft = fx.draft();
    draft.client_id = 4242;
    assert!(matches!(
        repo.create_request(draft).await,
        Err(RequestError::ClientNotFound(4242))
    ));

    assert!(matches!(
        repo.create_request(fx.draft_with(&[777], &[])).await,
        Err(RequestError::TeamNotFound(777))
    ));
}

#[tokio::test]
async fn test_update_missing_request_is_not_found() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    assert!(matches!(
        repo.update_request(55, fx.draft()).await,
        Err(RequestError::NotFound(55))
    ));
    assert!(matches!(
        repo.delete_request(55).await,
        Err(RequestError::NotFound(55))
    ));
}

#[tokio::test]
async fn test_delete_leaves_volunteer_links_behind() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());
    let mut draft = fx.draft_with(&fx.team_ids[..2], &[(fx.item_id, 1)]);
    draft.volunteer_id = Some(fx.volunteer_id);

    let saved = repo.create_request(draft).await.unwrap();
    let id = saved.request.request.id;
    AssignmentRepository::new(db.clone())
        .assign_volunteer(
            id,
            AssignVolunteerInput {
                volunteer_id: fx.volunteer_id,
                scheduled_date: NaiveDate::from_ymd_opt(2025, 4, 2),
                notes: None,
            },
        )
        .await
        .unwrap();

    repo.delete_request(id).await.unwrap();

    assert!(repo.get_request(id).await.unwrap().is_none());
    assert_eq!(item_count(&db, id).await, 0);
    assert!(team_rows(&db, id).await.is_empty());
    let assignments = delivery_assignments::Entity::find()
        .filter(delivery_assignments::Column::RequestId.eq(id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(assignments, 0);

    let dangling = request_volunteers::Entity::find()
        .filter(request_volunteers::Column::RequestId.eq(id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].volunteer_id, fx.volunteer_id);
}

#[tokio::test]
async fn test_concurrent_updates_both_succeed_last_write_wins() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let saved = repo.create_request(fx.draft()).await.unwrap();
    let id = saved.request.request.id;

    let mut first = fx.draft_with(&fx.team_ids[..1], &[]);
    first.status = RequestStatus::InProgress;
    let mut second = fx.draft_with(&fx.team_ids[1..3], &[]);
    second.status = RequestStatus::Completed;

    let repo_a = repo.clone();
    let repo_b = repo.clone();
    let (a, b) = tokio::join!(
        repo_a.update_request(id, first),
        repo_b.update_request(id, second)
    );
    a.unwrap();
    b.unwrap();

    // No merge: the stored row carries exactly one writer's status and teams.
    let stored = repo.get_request(id).await.unwrap().unwrap();
    match stored.request.status.as_str() {
        "in_progress" => assert_eq!(stored.team_ids, vec![fx.team_ids[0]]),
        "completed" => assert_eq!(stored.team_ids, vec![fx.team_ids[1], fx.team_ids[2]]),
        other => panic!("unexpected status {other}"),
    }
}

#[tokio::test]
async fn test_sequential_updates_keep_the_last_status() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());
    let id = repo.create_request(fx.draft()).await.unwrap().request.request.id;

    let mut first = fx.draft();
    first.status = RequestStatus::Scheduled;
    let mut second = fx.draft();
    second.status = RequestStatus::Cancelled;
    repo.update_request(id, first).await.unwrap();
    repo.update_request(id, second).await.unwrap();

    let stored = repo.get_request(id).await.unwrap().unwrap();
    assert_eq!(stored.request.status, "cancelled");
}

#[tokio::test]
async fn test_list_requests_filters_by_status_and_team() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = RequestRepository::new(db.clone());

    let mut scheduled_draft = fx.draft_with(&fx.team_ids[1..2], &[]);
    scheduled_draft.status = RequestStatus::Scheduled;
    repo.create_request(scheduled_draft).await.unwrap();
    repo.create_request(fx.draft()).await.unwrap();
    repo.create_request(fx.draft()).await.unwrap();

    let all = repo
        .list_requests(RequestFilter::default(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.meta.total, 3);

    let scheduled = repo
        .list_requests(
            RequestFilter {
                status: Some(RequestStatus::Scheduled),
                ..RequestFilter::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(scheduled.data.len(), 1);

    let by_team = repo
        .list_requests(
            RequestFilter {
                team_id: Some(fx.team_ids[1]),
                ..RequestFilter::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_team.data.len(), 1);

    let paged = repo
        .list_requests(
            RequestFilter::default(),
            &PageRequest {
                page: 2,
                per_page: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(paged.data.len(), 1);
    assert_eq!(paged.meta.total_pages, 2);
}

#[tokio::test]
async fn test_client_and_inventory_with_requests_cannot_be_deleted() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    RequestRepository::new(db.clone())
        .create_request(fx.draft_with(&[], &[(fx.item_id, 1)]))
        .await
        .unwrap();

    assert!(matches!(
        ClientRepository::new(db.clone()).delete(fx.client_id).await,
        Err(ClientError::HasRequests(1))
    ));
    assert!(matches!(
        InventoryRepository::new(db.clone()).delete(fx.item_id).await,
        Err(InventoryError::InUse(1))
    ));
}

#[test]
fn test_draft_errors_surface_as_request_errors() {
    let err: RequestError = DraftError::ClientRequired.into();
    assert_eq!(err.to_string(), "A client is required");
}
