use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Course, CourseType, Id, Name, entity::impl_entity};

/// A course delivered as a particular course type, which students register
/// for.
///
/// The course and course-type names are copied in when the offering is
/// created (or re-paired by an edit). Renaming the course or course type
/// afterwards does not change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOffering {
    pub(crate) id: Id,
    pub(crate) course_id: Id,
    pub(crate) course_type_id: Id,
    pub(crate) course_name: Name,
    pub(crate) course_type_name: Name,
    pub(crate) created_at: DateTime<Utc>,
}

impl CourseOffering {
    /// Pairs a course with a course type, copying both names.
    pub(crate) fn resolve(
        id: Id,
        course: &Course,
        course_type: &CourseType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            course_id: course.id.clone(),
            course_type_id: course_type.id.clone(),
            course_name: course.name.clone(),
            course_type_name: course_type.name.clone(),
            created_at,
        }
    }

    /// Re-points the offering at a new pairing and refreshes its names.
    pub(crate) fn repair(&mut self, course: &Course, course_type: &CourseType) {
        self.course_id = course.id.clone();
        self.course_type_id = course_type.id.clone();
        self.course_name = course.name.clone();
        self.course_type_name = course_type.name.clone();
    }

    /// The id of the course this offering was created from.
    #[must_use]
    pub const fn course_id(&self) -> &Id {
        &self.course_id
    }

    /// The id of the course type this offering was created from.
    #[must_use]
    pub const fn course_type_id(&self) -> &Id {
        &self.course_type_id
    }

    /// The course's name at the time of pairing.
    #[must_use]
    pub const fn course_name(&self) -> &Name {
        &self.course_name
    }

    /// The course type's name at the time of pairing.
    #[must_use]
    pub const fn course_type_name(&self) -> &Name {
        &self.course_type_name
    }

    /// Human-readable label, e.g. `Group - English`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CourseOffering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.course_type_name, self.course_name)
    }
}

impl_entity!(CourseOffering, CourseOffering, created_at);

/// The caller-supplied part of a new offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingDraft {
    /// The course to offer.
    pub course_id: Id,
    /// How the course is delivered.
    pub course_type_id: Id,
}

impl OfferingDraft {
    /// A draft pairing the given course and course type.
    #[must_use]
    pub fn new(course_id: impl Into<Id>, course_type_id: impl Into<Id>) -> Self {
        Self {
            course_id: course_id.into(),
            course_type_id: course_type_id.into(),
        }
    }
}

/// Fields to change on an existing offering. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferingPatch {
    /// The new course.
    pub course_id: Option<Id>,
    /// The new course type.
    pub course_type_id: Option<Id>,
}
