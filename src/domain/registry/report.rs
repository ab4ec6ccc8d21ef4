//! Read-only views over a registry: filters, dashboard counts, and the
//! orphaned-reference report.

use std::fmt;

use super::Registry;
use crate::domain::{
    Course, CourseOffering, CourseType, Entity, EntityKind, Id, Registration, Student,
    violation::Field,
};

/// Row counts for each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of course types.
    pub course_types: usize,
    /// Number of courses.
    pub courses: usize,
    /// Number of course offerings.
    pub course_offerings: usize,
    /// Number of students.
    pub students: usize,
    /// Number of registrations.
    pub registrations: usize,
}

/// A foreign key that no longer resolves because the row it pointed at was
/// removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    /// The kind of the row holding the reference.
    pub kind: EntityKind,
    /// The id of the row holding the reference.
    pub id: Id,
    /// The field holding the reference.
    pub field: Field,
    /// The kind of row that was referenced.
    pub target: EntityKind,
    /// The id that no longer resolves.
    pub missing: Id,
}

impl fmt::Display for Orphan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} refers to missing {} {}",
            self.kind, self.id, self.target, self.missing
        )
    }
}

impl<G> Registry<G> {
    /// Offerings of the given course type, in insertion order.
    pub fn offerings_of_type<'a>(
        &'a self,
        course_type_id: &'a Id,
    ) -> impl Iterator<Item = &'a CourseOffering> + 'a {
        self.tables
            .course_offerings
            .iter()
            .filter(move |o| &o.course_type_id == course_type_id)
    }

    /// Registrations for the given offering, in insertion order.
    pub fn registrations_for<'a>(
        &'a self,
        course_offering_id: &'a Id,
    ) -> impl Iterator<Item = &'a Registration> + 'a {
        self.tables
            .registrations
            .iter()
            .filter(move |r| &r.course_offering_id == course_offering_id)
    }

    /// The `n` most recent registrations, newest first.
    pub fn recent_registrations(&self, n: usize) -> impl Iterator<Item = &Registration> {
        self.tables.registrations.list().iter().rev().take(n)
    }

    /// Row counts for each collection.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats {
            course_types: self.tables.course_types.len(),
            courses: self.tables.courses.len(),
            course_offerings: self.tables.course_offerings.len(),
            students: self.tables.students.len(),
            registrations: self.tables.registrations.len(),
        }
    }

    /// Every foreign key that no longer resolves.
    ///
    /// Offerings are listed before registrations, each in insertion order.
    #[must_use]
    pub fn orphans(&self) -> Vec<Orphan> {
        let tables = &self.tables;
        let mut orphans = Vec::new();

        for offering in &tables.course_offerings {
            if !tables.courses.contains(&offering.course_id) {
                orphans.push(orphan(offering, Field::Course, Course::KIND, &offering.course_id));
            }
            if !tables.course_types.contains(&offering.course_type_id) {
                orphans.push(orphan(
                    offering,
                    Field::CourseType,
                    CourseType::KIND,
                    &offering.course_type_id,
                ));
            }
        }

        for registration in &tables.registrations {
            if !tables.students.contains(&registration.student_id) {
                orphans.push(orphan(
                    registration,
                    Field::Student,
                    Student::KIND,
                    &registration.student_id,
                ));
            }
            if !tables
                .course_offerings
                .contains(&registration.course_offering_id)
            {
                orphans.push(orphan(
                    registration,
                    Field::CourseOffering,
                    CourseOffering::KIND,
                    &registration.course_offering_id,
                ));
            }
        }

        if !orphans.is_empty() {
            tracing::debug!("Found {} orphaned references", orphans.len());
        }
        orphans
    }
}

fn orphan<T: Entity>(row: &T, field: Field, target: EntityKind, missing: &Id) -> Orphan {
    Orphan {
        kind: T::KIND,
        id: row.id().clone(),
        field,
        target,
        missing: missing.clone(),
    }
}
