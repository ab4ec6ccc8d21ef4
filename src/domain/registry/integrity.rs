//! Referential and uniqueness checks run before any mutation commits.

use super::{Table, Tables};
use crate::domain::{
    Course, CourseOffering, CourseType, Id, Student, StudentRef,
    violation::{Field, Violation, Violations},
};

impl Tables {
    /// Resolves a foreign key held in `field`.
    ///
    /// A blank id is a missing required field rather than a dangling
    /// reference.
    pub(super) fn reference<T: Table>(&self, field: Field, id: &Id) -> Result<&T, Violation> {
        if id.is_blank() {
            return Err(Violation::Required { field });
        }
        T::repository(self)
            .find(id)
            .ok_or_else(|| Violation::DanglingReference {
                field,
                kind: T::KIND,
                id: id.clone(),
            })
    }

    /// Whether the student is already registered for the offering.
    pub(super) fn is_registered(&self, student_id: &Id, course_offering_id: &Id) -> bool {
        self.registrations
            .iter()
            .any(|r| r.links(student_id, course_offering_id))
    }

    pub(super) fn check_offering(
        &self,
        course_id: &Id,
        course_type_id: &Id,
    ) -> Result<(), Violations> {
        let found = [
            self.reference::<Course>(Field::Course, course_id).err(),
            self.reference::<CourseType>(Field::CourseType, course_type_id)
                .err(),
        ];
        Violations::check(found.into_iter().flatten().collect())
    }

    pub(super) fn check_registration(
        &self,
        student: &StudentRef,
        course_offering_id: &Id,
    ) -> Result<(), Violations> {
        let mut found = Vec::new();
        found.extend(
            self.reference::<CourseOffering>(Field::CourseOffering, course_offering_id)
                .err(),
        );

        match student {
            StudentRef::Existing(student_id) => {
                found.extend(self.reference::<Student>(Field::Student, student_id).err());
                if self.is_registered(student_id, course_offering_id) {
                    found.push(Violation::DuplicateRegistration {
                        student_id: student_id.clone(),
                        course_offering_id: course_offering_id.clone(),
                    });
                }
            }
            // A student that does not exist yet has no registrations to
            // collide with.
            StudentRef::New(draft) => draft.check(&mut found),
        }

        Violations::check(found)
    }
}
