use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::Id;

/// The five kinds of row held by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// A [`CourseType`](crate::CourseType).
    CourseType,
    /// A [`Course`](crate::Course).
    Course,
    /// A [`CourseOffering`](crate::CourseOffering).
    CourseOffering,
    /// A [`Student`](crate::Student).
    Student,
    /// A [`Registration`](crate::Registration).
    Registration,
}

impl EntityKind {
    /// Every kind, in dependency order (parents before the rows that refer to
    /// them).
    pub const ALL: [Self; 5] = [
        Self::CourseType,
        Self::Course,
        Self::CourseOffering,
        Self::Student,
        Self::Registration,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CourseType => "course type",
            Self::Course => "course",
            Self::CourseOffering => "course offering",
            Self::Student => "student",
            Self::Registration => "registration",
        })
    }
}

/// A stored row: identified, timestamped, and immutable in both.
pub trait Entity {
    /// Which collection rows of this type live in.
    const KIND: EntityKind;

    /// The row's unique identifier, assigned when it was added.
    fn id(&self) -> &Id;

    /// When the row was added.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Implements [`Entity`] for a struct with `id` and a timestamp field.
macro_rules! impl_entity {
    ($ty:ty, $kind:ident, $created:ident) => {
        impl $crate::domain::Entity for $ty {
            const KIND: $crate::domain::EntityKind = $crate::domain::EntityKind::$kind;

            fn id(&self) -> &$crate::domain::Id {
                &self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.$created
            }
        }
    };
}

pub(crate) use impl_entity;
