//! Lifecycle tests against an in-memory store, covering batch reporting,
//! transition legality, and bulk processing of pending assignments.

use async_trait::async_trait;
use chrono::Utc;
use lms_models::{
    AssignBatch, Assignment, AssignmentStatus, NewAssignment, ResourceType, StatusAction,
};
use lms_permissions::{AssignmentLifecycle, AssignmentStore, PermissionError};
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory stand-in for the Postgres store. Mirrors the partial unique
/// index: a second live assignment for the same (teacher, type, resource)
/// fails the insert. Failure sets simulate upstream errors per record.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<Assignment>>,
    failing_resources: Mutex<HashSet<Uuid>>,
    failing_updates: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
    fn fail_inserts_for(&self, resource_id: Uuid) {
        self.failing_resources.lock().unwrap().insert(resource_id);
    }

    fn fail_updates_for(&self, assignment_id: Uuid) {
        self.failing_updates.lock().unwrap().insert(assignment_id);
    }

    fn seed(&self, assignment: Assignment) -> Uuid {
        let id = assignment.id;
        self.rows.lock().unwrap().push(assignment);
        id
    }
}

fn row(
    teacher_id: Uuid,
    resource_id: Uuid,
    status: AssignmentStatus,
) -> Assignment {
    Assignment {
        id: Uuid::new_v4(),
        teacher_id,
        resource_type: ResourceType::Course,
        resource_id,
        status,
        start_at: None,
        end_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn insert(
        &self,
        assignment: NewAssignment,
    ) -> lms_permissions::Result<Assignment> {
        if self
            .failing_resources
            .lock()
            .unwrap()
            .contains(&assignment.resource_id)
        {
            return Err(PermissionError::Internal("simulated insert failure".into()));
        }

        let mut rows = self.rows.lock().unwrap();
        let duplicate = rows.iter().any(|r| {
            r.teacher_id == assignment.teacher_id
                && r.resource_type == assignment.resource_type
                && r.resource_id == assignment.resource_id
                && r.status != AssignmentStatus::Revoked
        });
        if duplicate {
            return Err(PermissionError::Internal(
                "unique constraint violation".into(),
            ));
        }

        let created = Assignment {
            id: Uuid::new_v4(),
            teacher_id: assignment.teacher_id,
            resource_type: assignment.resource_type,
            resource_id: assignment.resource_id,
            status: assignment.status,
            start_at: assignment.start_at,
            end_at: assignment.end_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list(
        &self,
        status: Option<AssignmentStatus>,
    ) -> lms_permissions::Result<Vec<Assignment>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> lms_permissions::Result<Option<Assignment>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
    ) -> lms_permissions::Result<Assignment> {
        if self.failing_updates.lock().unwrap().contains(&id) {
            return Err(PermissionError::Internal("simulated update failure".into()));
        }

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PermissionError::NotFound(format!("assignment {}", id)))?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

fn batch(teacher_id: Uuid, course_ids: Vec<Uuid>) -> AssignBatch {
    AssignBatch {
        teacher_id,
        course_ids,
        start_at: None,
        end_at: None,
    }
}

#[tokio::test]
async fn batch_creation_reports_partial_success() {
    let store = MemoryStore::default();
    let teacher = Uuid::new_v4();
    let courses: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
    store.fail_inserts_for(courses[1]);
    store.fail_inserts_for(courses[3]);

    let lifecycle = AssignmentLifecycle::new(store);
    let report = lifecycle
        .assign_batch(batch(teacher, courses))
        .await
        .unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.attempted, 5);
    assert!(!report.is_complete());

    // Exactly the successful inserts landed.
    let created = lifecycle.list(None).await.unwrap();
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|a| a.status == AssignmentStatus::Active));
}

#[tokio::test]
async fn empty_course_selection_is_rejected_before_any_store_call() {
    let store = MemoryStore::default();
    let lifecycle = AssignmentLifecycle::new(store);

    let err = lifecycle
        .assign_batch(batch(Uuid::new_v4(), vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, PermissionError::Validation(_)));
    assert!(lifecycle.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn inverted_window_is_rejected_locally() {
    let store = MemoryStore::default();
    let lifecycle = AssignmentLifecycle::new(store);

    let mut request = batch(Uuid::new_v4(), vec![Uuid::new_v4()]);
    request.start_at = chrono::NaiveDate::from_ymd_opt(2025, 9, 1);
    request.end_at = chrono::NaiveDate::from_ymd_opt(2025, 8, 1);

    let err = lifecycle.assign_batch(request).await.unwrap_err();
    assert!(matches!(err, PermissionError::Validation(_)));
}

#[tokio::test]
async fn duplicate_live_assignment_fails_only_that_insert() {
    let store = MemoryStore::default();
    let teacher = Uuid::new_v4();
    let taken = Uuid::new_v4();
    let fresh = Uuid::new_v4();
    store.seed(row(teacher, taken, AssignmentStatus::Active));

    let lifecycle = AssignmentLifecycle::new(store);
    let report = lifecycle
        .assign_batch(batch(teacher, vec![taken, fresh]))
        .await
        .unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.attempted, 2);
}

#[tokio::test]
async fn revoked_assignments_cannot_be_reactivated() {
    let store = MemoryStore::default();
    let id = store.seed(row(Uuid::new_v4(), Uuid::new_v4(), AssignmentStatus::Revoked));

    let lifecycle = AssignmentLifecycle::new(store);
    let err = lifecycle
        .update_status(id, StatusAction::Active)
        .await
        .unwrap_err();

    assert!(matches!(err, PermissionError::IllegalTransition { .. }));
    let unchanged = lifecycle.find(id).await.unwrap();
    assert_eq!(unchanged.status, AssignmentStatus::Revoked);
}

#[tokio::test]
async fn pending_assignments_can_be_approved_and_revoked() {
    let store = MemoryStore::default();
    let approve_id = store.seed(row(Uuid::new_v4(), Uuid::new_v4(), AssignmentStatus::Pending));
    let revoke_id = store.seed(row(Uuid::new_v4(), Uuid::new_v4(), AssignmentStatus::Pending));

    let lifecycle = AssignmentLifecycle::new(store);

    let approved = lifecycle
        .update_status(approve_id, StatusAction::Active)
        .await
        .unwrap();
    assert_eq!(approved.status, AssignmentStatus::Active);

    let revoked = lifecycle
        .update_status(revoke_id, StatusAction::Revoked)
        .await
        .unwrap();
    assert_eq!(revoked.status, AssignmentStatus::Revoked);
}

#[tokio::test]
async fn missing_assignment_update_is_not_found() {
    let store = MemoryStore::default();
    let lifecycle = AssignmentLifecycle::new(store);

    let err = lifecycle
        .update_status(Uuid::new_v4(), StatusAction::Active)
        .await
        .unwrap_err();

    assert!(matches!(err, PermissionError::NotFound(_)));
}

#[tokio::test]
async fn bulk_approval_leaves_failed_records_pending() {
    let store = MemoryStore::default();
    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(store.seed(row(Uuid::new_v4(), Uuid::new_v4(), AssignmentStatus::Pending)));
    }
    let failing = ids[2];
    store.fail_updates_for(failing);

    let lifecycle = AssignmentLifecycle::new(store);
    let report = lifecycle
        .process_pending(StatusAction::Active)
        .await
        .unwrap();

    assert_eq!(report.succeeded, 4);
    assert_eq!(report.attempted, 5);

    // The refreshed pending subset holds exactly the record whose update
    // failed; everything else moved to active.
    let still_pending = lifecycle
        .list(Some(AssignmentStatus::Pending))
        .await
        .unwrap();
    assert_eq!(still_pending.len(), 1);
    assert_eq!(still_pending[0].id, failing);

    let active = lifecycle
        .list(Some(AssignmentStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 4);
}

#[tokio::test]
async fn bulk_rejection_revokes_all_pending() {
    let store = MemoryStore::default();
    for _ in 0..3 {
        store.seed(row(Uuid::new_v4(), Uuid::new_v4(), AssignmentStatus::Pending));
    }

    let lifecycle = AssignmentLifecycle::new(store);
    let report = lifecycle
        .process_pending(StatusAction::Revoked)
        .await
        .unwrap();

    assert_eq!(report.succeeded, 3);
    assert!(report.is_complete());
    assert!(lifecycle
        .list(Some(AssignmentStatus::Pending))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn single_create_forces_active_status() {
    let store = MemoryStore::default();
    let lifecycle = AssignmentLifecycle::new(store);

    let created = lifecycle
        .create(NewAssignment {
            teacher_id: Uuid::new_v4(),
            resource_type: ResourceType::Course,
            resource_id: Uuid::new_v4(),
            status: AssignmentStatus::Pending,
            start_at: None,
            end_at: None,
        })
        .await
        .unwrap();

    assert_eq!(created.status, AssignmentStatus::Active);
}
