use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Kind of resource an assignment grants access to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Course,
    Program,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Course => "course",
            ResourceType::Program => "program",
        }
    }
}

impl std::convert::TryFrom<String> for ResourceType {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "course" => Ok(ResourceType::Course),
            "program" => Ok(ResourceType::Program),
            _ => Err(format!("Invalid resource type: {}", s)),
        }
    }
}

/// Lifecycle state of an assignment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Active,
    Revoked,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Active => "active",
            AssignmentStatus::Revoked => "revoked",
        }
    }

    /// Legal transitions: pending -> active, pending -> revoked,
    /// active -> revoked. Revoked is terminal.
    pub fn can_transition_to(self, target: AssignmentStatus) -> bool {
        matches!(
            (self, target),
            (AssignmentStatus::Pending, AssignmentStatus::Active)
                | (AssignmentStatus::Pending, AssignmentStatus::Revoked)
                | (AssignmentStatus::Active, AssignmentStatus::Revoked)
        )
    }

    /// True for states that make a course show up as already assigned
    /// in the course picker.
    pub fn occupies_resource(self) -> bool {
        matches!(
            self,
            AssignmentStatus::Active | AssignmentStatus::Pending
        )
    }
}

impl std::convert::TryFrom<String> for AssignmentStatus {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AssignmentStatus::Pending),
            "active" => Ok(AssignmentStatus::Active),
            "revoked" => Ok(AssignmentStatus::Revoked),
            _ => Err(format!("Invalid assignment status: {}", s)),
        }
    }
}

/// Admin decision applied to an existing assignment. Restricting the
/// payload to these two variants keeps "pending" unreachable as a patch
/// target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Active,
    Revoked,
}

impl From<StatusAction> for AssignmentStatus {
    fn from(action: StatusAction) -> Self {
        match action {
            StatusAction::Active => AssignmentStatus::Active,
            StatusAction::Revoked => AssignmentStatus::Revoked,
        }
    }
}

/// A grant of access from a teacher to a course or program
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub teacher_id: Uuid,
    #[sqlx(try_from = "String")]
    pub resource_type: ResourceType,
    pub resource_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: AssignmentStatus,
    pub start_at: Option<NaiveDate>,
    pub end_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
    pub teacher_id: Uuid,
    pub resource_type: ResourceType,
    pub resource_id: Uuid,
    pub status: AssignmentStatus,
    pub start_at: Option<NaiveDate>,
    pub end_at: Option<NaiveDate>,
}

/// Batch creation request: one assignment per selected course
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignBatch {
    pub teacher_id: Uuid,

    #[validate(length(min = 1, message = "at least one course must be selected"))]
    pub course_ids: Vec<Uuid>,

    pub start_at: Option<NaiveDate>,
    pub end_at: Option<NaiveDate>,
}

impl AssignBatch {
    /// The validity window is optional on both ends but may not be inverted.
    pub fn window_is_ordered(&self) -> bool {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAssignmentStatus {
    pub status: StatusAction,
}
