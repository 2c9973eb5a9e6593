use crate::error::{PermissionError, Result};
use crate::store::AssignmentStore;
use futures::future::join_all;
use lms_models::{
    AssignBatch, Assignment, AssignmentStatus, NewAssignment, ResourceType, StatusAction,
};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

/// Outcome of a best-effort batch. Constituent calls fail independently;
/// the report carries how many landed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub attempted: usize,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.attempted
    }
}

/// Mediates every state change to assignment records.
pub struct AssignmentLifecycle<S> {
    store: S,
}

impl<S: AssignmentStore> AssignmentLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self, status: Option<AssignmentStatus>) -> Result<Vec<Assignment>> {
        self.store.list(status).await
    }

    pub async fn find(&self, id: Uuid) -> Result<Assignment> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| PermissionError::NotFound(format!("assignment {}", id)))
    }

    /// Create a single assignment directly. Admin-created records start
    /// active, skipping the pending stage.
    pub async fn create(&self, mut assignment: NewAssignment) -> Result<Assignment> {
        if !window_is_ordered(&assignment) {
            return Err(PermissionError::Validation(
                "end date precedes start date".to_string(),
            ));
        }
        assignment.status = AssignmentStatus::Active;
        self.store.insert(assignment).await
    }

    /// Create one course assignment per selected course. Inserts are
    /// issued concurrently and are not transactional: failures do not roll
    /// back siblings, and the report carries the partial-success count.
    pub async fn assign_batch(&self, batch: AssignBatch) -> Result<BatchReport> {
        batch
            .validate()
            .map_err(|e| PermissionError::Validation(e.to_string()))?;
        if !batch.window_is_ordered() {
            return Err(PermissionError::Validation(
                "end date precedes start date".to_string(),
            ));
        }

        let attempted = batch.course_ids.len();
        let inserts = batch.course_ids.iter().map(|&course_id| {
            self.store.insert(NewAssignment {
                teacher_id: batch.teacher_id,
                resource_type: ResourceType::Course,
                resource_id: course_id,
                status: AssignmentStatus::Active,
                start_at: batch.start_at,
                end_at: batch.end_at,
            })
        });

        let succeeded = join_all(inserts)
            .await
            .into_iter()
            .filter(|result| match result {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Assignment insert failed: {}", e);
                    false
                }
            })
            .count();

        Ok(BatchReport {
            succeeded,
            attempted,
        })
    }

    /// Patch one assignment to a new status. The current row is fetched
    /// first and the transition validated: revoked is terminal, and only
    /// pending -> active, pending -> revoked, active -> revoked are legal.
    pub async fn update_status(&self, id: Uuid, action: StatusAction) -> Result<Assignment> {
        let current = self.find(id).await?;
        let target = AssignmentStatus::from(action);

        if !current.status.can_transition_to(target) {
            return Err(PermissionError::IllegalTransition {
                from: current.status,
                to: target,
            });
        }

        self.store.set_status(id, target).await
    }

    /// Apply one status action to every pending assignment. Updates are
    /// issued concurrently, unordered, with no cap and no cancellation;
    /// each failure is independent. Callers re-fetch the lists afterwards
    /// regardless of partial failure.
    pub async fn process_pending(&self, action: StatusAction) -> Result<BatchReport> {
        let pending = self.store.list(Some(AssignmentStatus::Pending)).await?;
        let target = AssignmentStatus::from(action);

        let attempted = pending.len();
        let updates = pending
            .iter()
            .map(|assignment| self.store.set_status(assignment.id, target));

        let succeeded = join_all(updates)
            .await
            .into_iter()
            .filter(|result| match result {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Bulk status update failed: {}", e);
                    false
                }
            })
            .count();

        Ok(BatchReport {
            succeeded,
            attempted,
        })
    }
}

/// Course ids a teacher already holds in a live (active or pending)
/// course assignment. The picker greys these out. An assignment being
/// edited never disables its own course.
pub fn assigned_course_ids(
    assignments: &[Assignment],
    teacher_id: Uuid,
    exclude: Option<Uuid>,
) -> HashSet<Uuid> {
    assignments
        .iter()
        .filter(|a| a.teacher_id == teacher_id)
        .filter(|a| a.resource_type == ResourceType::Course)
        .filter(|a| a.status.occupies_resource())
        .filter(|a| Some(a.id) != exclude)
        .map(|a| a.resource_id)
        .collect()
}

fn window_is_ordered(assignment: &NewAssignment) -> bool {
    match (assignment.start_at, assignment.end_at) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lms_models::ResourceType;

    fn assignment(
        teacher_id: Uuid,
        resource_type: ResourceType,
        resource_id: Uuid,
        status: AssignmentStatus,
    ) -> Assignment {
        Assignment {
            id: Uuid::new_v4(),
            teacher_id,
            resource_type,
            resource_id,
            status,
            start_at: None,
            end_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn assigned_courses_cover_active_and_pending_only() {
        let teacher = Uuid::new_v4();
        let active = Uuid::new_v4();
        let pending = Uuid::new_v4();
        let revoked = Uuid::new_v4();

        let assignments = vec![
            assignment(teacher, ResourceType::Course, active, AssignmentStatus::Active),
            assignment(teacher, ResourceType::Course, pending, AssignmentStatus::Pending),
            assignment(teacher, ResourceType::Course, revoked, AssignmentStatus::Revoked),
        ];

        let assigned = assigned_course_ids(&assignments, teacher, None);

        assert!(assigned.contains(&active));
        assert!(assigned.contains(&pending));
        assert!(!assigned.contains(&revoked));
    }

    #[test]
    fn program_assignments_never_disable_courses() {
        let teacher = Uuid::new_v4();
        let program = Uuid::new_v4();

        let assignments = vec![assignment(
            teacher,
            ResourceType::Program,
            program,
            AssignmentStatus::Active,
        )];

        let assigned = assigned_course_ids(&assignments, teacher, None);

        assert!(assigned.is_empty());
    }

    #[test]
    fn other_teachers_assignments_are_ignored() {
        let teacher = Uuid::new_v4();
        let other = Uuid::new_v4();
        let course = Uuid::new_v4();

        let assignments = vec![assignment(
            other,
            ResourceType::Course,
            course,
            AssignmentStatus::Active,
        )];

        let assigned = assigned_course_ids(&assignments, teacher, None);

        assert!(assigned.is_empty());
    }

    #[test]
    fn edited_assignment_does_not_disable_its_own_course() {
        let teacher = Uuid::new_v4();
        let course = Uuid::new_v4();
        let edited = assignment(teacher, ResourceType::Course, course, AssignmentStatus::Active);
        let edited_id = edited.id;

        let assignments = vec![edited];

        let without_exclusion = assigned_course_ids(&assignments, teacher, None);
        let with_exclusion = assigned_course_ids(&assignments, teacher, Some(edited_id));

        assert!(without_exclusion.contains(&course));
        assert!(!with_exclusion.contains(&course));
    }
}
