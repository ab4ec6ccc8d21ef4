//! Course types and courses: the two independent lookup tables that
//! offerings pair together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Id, Name, entity::impl_entity};

/// The default course types seeded on first run.
pub const DEFAULT_COURSE_TYPES: [&str; 3] = ["Individual", "Group", "Special"];

/// The default courses seeded on first run.
pub const DEFAULT_COURSES: [&str; 3] = ["English", "Hindi", "Urdu"];

/// A way a course can be delivered, such as "Individual" or "Group".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseType {
    pub(crate) id: Id,
    pub(crate) name: Name,
    pub(crate) created_at: DateTime<Utc>,
}

impl CourseType {
    pub(crate) const fn new(id: Id, name: Name, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    /// The course type's display name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }
}

impl_entity!(CourseType, CourseType, created_at);

/// A subject that can be taught, such as "English".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub(crate) id: Id,
    pub(crate) name: Name,
    pub(crate) created_at: DateTime<Utc>,
}

impl Course {
    pub(crate) const fn new(id: Id, name: Name, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    /// The course's display name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }
}

impl_entity!(Course, Course, created_at);
