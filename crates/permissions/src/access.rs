use crate::error::Result;
use crate::store::AccessStore;
use lms_models::UserRole;
use uuid::Uuid;

/// Outcome of a lesson access check. The two denials stay distinguishable:
/// a missing lesson is a broken reference, a missing assignment is a
/// permission problem, and each implies a different remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    LessonNotFound,
    NotAssigned,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

/// Gates a teacher's read access to a lesson through the lesson's parent
/// course.
pub struct LessonAccess<S> {
    store: S,
}

impl<S: AccessStore> LessonAccess<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Admins bypass the assignment check entirely. For everyone else the
    /// lesson's parent course must be covered by an active assignment.
    /// The validity window is not consulted: an assignment is active or
    /// it is not.
    pub async fn check(
        &self,
        user_id: Uuid,
        role: UserRole,
        lesson_id: Uuid,
    ) -> Result<AccessDecision> {
        if role.is_admin() {
            return Ok(AccessDecision::Granted);
        }

        let Some(course_id) = self.store.lesson_course(lesson_id).await? else {
            return Ok(AccessDecision::LessonNotFound);
        };

        if self
            .store
            .has_active_course_assignment(user_id, course_id)
            .await?
        {
            Ok(AccessDecision::Granted)
        } else {
            Ok(AccessDecision::NotAssigned)
        }
    }
}
