use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CourseOffering, Id, Student, StudentDraft, entity::impl_entity};

/// A student's enrolment in a course offering.
///
/// The student and offering are copied in full when the registration is
/// made, so the registration keeps describing what the student signed up for
/// even if either row is later edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub(crate) id: Id,
    pub(crate) student_id: Id,
    pub(crate) course_offering_id: Id,
    pub(crate) student: Student,
    pub(crate) course_offering: CourseOffering,
    pub(crate) registration_date: DateTime<Utc>,
}

impl Registration {
    /// Registers `student` for `course_offering`, snapshotting both.
    pub(crate) fn resolve(
        id: Id,
        student: &Student,
        course_offering: &CourseOffering,
        registration_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            student_id: student.id.clone(),
            course_offering_id: course_offering.id.clone(),
            student: student.clone(),
            course_offering: course_offering.clone(),
            registration_date,
        }
    }

    /// The id of the registered student.
    #[must_use]
    pub const fn student_id(&self) -> &Id {
        &self.student_id
    }

    /// The id of the offering registered for.
    #[must_use]
    pub const fn course_offering_id(&self) -> &Id {
        &self.course_offering_id
    }

    /// The student as they were when they registered.
    #[must_use]
    pub const fn student(&self) -> &Student {
        &self.student
    }

    /// The offering as it was when the student registered.
    #[must_use]
    pub const fn course_offering(&self) -> &CourseOffering {
        &self.course_offering
    }

    /// When the registration was made.
    #[must_use]
    pub const fn registration_date(&self) -> DateTime<Utc> {
        self.registration_date
    }

    /// Whether this registration links the given student and offering.
    #[must_use]
    pub fn links(&self, student_id: &Id, course_offering_id: &Id) -> bool {
        &self.student_id == student_id && &self.course_offering_id == course_offering_id
    }
}

impl_entity!(Registration, Registration, registration_date);

/// Who is being registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentRef {
    /// A student that is already stored.
    Existing(Id),
    /// A student to create as part of the registration.
    New(StudentDraft),
}

impl From<Id> for StudentRef {
    fn from(id: Id) -> Self {
        Self::Existing(id)
    }
}

impl From<StudentDraft> for StudentRef {
    fn from(draft: StudentDraft) -> Self {
        Self::New(draft)
    }
}

/// The caller-supplied part of a new registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    /// The student to register.
    pub student: StudentRef,
    /// The offering to register for.
    pub course_offering_id: Id,
}

impl RegistrationDraft {
    /// Registers an already stored student.
    #[must_use]
    pub fn existing(student_id: impl Into<Id>, course_offering_id: impl Into<Id>) -> Self {
        Self {
            student: StudentRef::Existing(student_id.into()),
            course_offering_id: course_offering_id.into(),
        }
    }

    /// Creates the student and registers them in one step.
    #[must_use]
    pub fn new_student(student: StudentDraft, course_offering_id: impl Into<Id>) -> Self {
        Self {
            student: StudentRef::New(student),
            course_offering_id: course_offering_id.into(),
        }
    }
}
