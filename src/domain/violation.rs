//! Field-keyed integrity violations.
//!
//! Validation never stops at the first problem. Every check appends to a
//! list, and the list is turned into a [`Violations`] error only if it is
//! non-empty, so a caller can show every problem in one pass.

use std::fmt;

use nonempty::NonEmpty;

use crate::domain::{EntityKind, Id};

/// The input field a violation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// A course-type, course or student name.
    Name,
    /// A student's email address.
    Email,
    /// A student's phone number.
    Phone,
    /// The course an offering refers to.
    Course,
    /// The course type an offering refers to.
    CourseType,
    /// The offering a registration refers to.
    CourseOffering,
    /// The existing student a registration refers to.
    Student,
    /// The registration as a whole.
    Registration,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Course => "course",
            Self::CourseType => "course type",
            Self::CourseOffering => "course offering",
            Self::Student => "student",
            Self::Registration => "registration",
        })
    }
}

/// A single rule broken by a proposed mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A required value was missing or blank.
    #[error("{field} is required")]
    Required {
        /// The missing field.
        field: Field,
    },
    /// A value was shorter than allowed after trimming.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// The offending field.
        field: Field,
        /// Minimum number of characters.
        min: usize,
    },
    /// A value did not have the expected shape.
    #[error("{field} is invalid")]
    Malformed {
        /// The offending field.
        field: Field,
    },
    /// A foreign key did not resolve to a row.
    #[error("{kind} {id} does not exist")]
    DanglingReference {
        /// The field holding the reference.
        field: Field,
        /// The kind of row that was expected.
        kind: EntityKind,
        /// The unresolved identifier.
        id: Id,
    },
    /// The student is already registered for the offering.
    #[error("student {student_id} is already registered for course offering {course_offering_id}")]
    DuplicateRegistration {
        /// The student being registered.
        student_id: Id,
        /// The offering being registered for.
        course_offering_id: Id,
    },
}

impl Violation {
    /// The field this violation should be displayed against.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Required { field }
            | Self::TooShort { field, .. }
            | Self::Malformed { field }
            | Self::DanglingReference { field, .. } => *field,
            Self::DuplicateRegistration { .. } => Field::Registration,
        }
    }
}

/// The complete, non-empty set of violations found for one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(NonEmpty<Violation>);

impl Violations {
    /// Turns collected violations into an error, or `Ok` if there were none.
    ///
    /// # Errors
    ///
    /// Returns the violations if `found` is non-empty.
    pub fn check(found: Vec<Violation>) -> Result<(), Self> {
        NonEmpty::from_vec(found).map_or(Ok(()), |v| Err(Self(v)))
    }

    /// Iterates over the violations in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// The number of violations (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The violations attached to the given field.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &Violation> {
        self.iter().filter(move |v| v.field() == field)
    }

    /// Whether any violation is a dangling reference.
    #[must_use]
    pub fn has_dangling_reference(&self) -> bool {
        self.iter()
            .any(|v| matches!(v, Violation::DanglingReference { .. }))
    }

    /// Whether any violation is a duplicate registration.
    #[must_use]
    pub fn has_duplicate_registration(&self) -> bool {
        self.iter()
            .any(|v| matches!(v, Violation::DuplicateRegistration { .. }))
    }
}

impl From<Violation> for Violations {
    fn from(violation: Violation) -> Self {
        Self(NonEmpty::new(violation))
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = <NonEmpty<Violation> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}
