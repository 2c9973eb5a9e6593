//! Access-control decision tests: the two denial outcomes stay
//! distinguishable, and admins always pass.

use async_trait::async_trait;
use lms_models::UserRole;
use lms_permissions::{AccessDecision, AccessStore, LessonAccess};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Default)]
struct MemoryAccessStore {
    lessons: HashMap<Uuid, Uuid>,
    active_assignments: HashSet<(Uuid, Uuid)>,
}

#[async_trait]
impl AccessStore for MemoryAccessStore {
    async fn lesson_course(&self, lesson_id: Uuid) -> lms_permissions::Result<Option<Uuid>> {
        Ok(self.lessons.get(&lesson_id).copied())
    }

    async fn has_active_course_assignment(
        &self,
        teacher_id: Uuid,
        course_id: Uuid,
    ) -> lms_permissions::Result<bool> {
        Ok(self.active_assignments.contains(&(teacher_id, course_id)))
    }
}

#[tokio::test]
async fn assigned_teacher_is_granted() {
    let teacher = Uuid::new_v4();
    let course = Uuid::new_v4();
    let lesson = Uuid::new_v4();

    let mut store = MemoryAccessStore::default();
    store.lessons.insert(lesson, course);
    store.active_assignments.insert((teacher, course));

    let access = LessonAccess::new(store);
    let decision = access
        .check(teacher, UserRole::Teacher, lesson)
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::Granted);
}

#[tokio::test]
async fn missing_lesson_is_not_found() {
    let access = LessonAccess::new(MemoryAccessStore::default());

    let decision = access
        .check(Uuid::new_v4(), UserRole::Teacher, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::LessonNotFound);
}

#[tokio::test]
async fn unassigned_teacher_is_forbidden_not_not_found() {
    let course = Uuid::new_v4();
    let lesson = Uuid::new_v4();

    let mut store = MemoryAccessStore::default();
    store.lessons.insert(lesson, course);

    let access = LessonAccess::new(store);
    let decision = access
        .check(Uuid::new_v4(), UserRole::Teacher, lesson)
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::NotAssigned);
}

#[tokio::test]
async fn admin_passes_regardless_of_assignment_state() {
    let course = Uuid::new_v4();
    let lesson = Uuid::new_v4();

    let mut store = MemoryAccessStore::default();
    store.lessons.insert(lesson, course);

    let access = LessonAccess::new(store);
    let decision = access
        .check(Uuid::new_v4(), UserRole::Admin, lesson)
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::Granted);
}

#[tokio::test]
async fn admin_bypass_covers_unknown_lessons_too() {
    let access = LessonAccess::new(MemoryAccessStore::default());

    let decision = access
        .check(Uuid::new_v4(), UserRole::Admin, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::Granted);
}
