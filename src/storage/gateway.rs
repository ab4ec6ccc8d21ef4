//! The boundary between the registry and durable storage.
//!
//! A [`Gateway`] supplies the initial contents of every collection when a
//! registry is opened, and receives the full contents of a collection after
//! each successful mutation of it. How and where the rows are written is up
//! to the gateway.

use std::path::PathBuf;

use crate::domain::{Course, CourseOffering, CourseType, EntityKind, Registration, Student};

/// The stored contents of every collection.
///
/// `None` means the collection has never been stored, which is different
/// from having been stored empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Stored course types.
    pub course_types: Option<Vec<CourseType>>,
    /// Stored courses.
    pub courses: Option<Vec<Course>>,
    /// Stored course offerings.
    pub course_offerings: Option<Vec<CourseOffering>>,
    /// Stored students.
    pub students: Option<Vec<Student>>,
    /// Stored registrations.
    pub registrations: Option<Vec<Registration>>,
}

/// The full contents of one collection, handed to a gateway for storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection<'a> {
    /// Every course type.
    CourseTypes(&'a [CourseType]),
    /// Every course.
    Courses(&'a [Course]),
    /// Every course offering.
    CourseOfferings(&'a [CourseOffering]),
    /// Every student.
    Students(&'a [Student]),
    /// Every registration.
    Registrations(&'a [Registration]),
}

impl Collection<'_> {
    /// The kind of row in this collection.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::CourseTypes(_) => EntityKind::CourseType,
            Self::Courses(_) => EntityKind::Course,
            Self::CourseOfferings(_) => EntityKind::CourseOffering,
            Self::Students(_) => EntityKind::Student,
            Self::Registrations(_) => EntityKind::Registration,
        }
    }

    /// The number of rows in this collection.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::CourseTypes(rows) => rows.len(),
            Self::Courses(rows) => rows.len(),
            Self::CourseOfferings(rows) => rows.len(),
            Self::Students(rows) => rows.len(),
            Self::Registrations(rows) => rows.len(),
        }
    }

    /// Whether this collection has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Errors raised by a gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// A stored collection could not be decoded.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// A collection could not be encoded.
    #[error("failed to encode {kind} collection: {source}")]
    Encode {
        /// The collection being encoded.
        kind: EntityKind,
        /// The underlying error.
        source: serde_json::Error,
    },
}

/// Durable storage for the five collections.
pub trait Gateway {
    /// Reads every collection.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be read.
    fn load(&mut self) -> Result<Snapshot, GatewayError>;

    /// Replaces the stored contents of one collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    fn store(&mut self, collection: Collection<'_>) -> Result<(), GatewayError>;
}

/// A gateway that keeps collections in memory.
///
/// Useful for tests and for embedding a registry without touching the
/// filesystem. Whatever was last stored is returned by the next
/// [`Gateway::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryGateway {
    snapshot: Snapshot,
    writes: usize,
}

impl MemoryGateway {
    /// An empty gateway, as on first run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that will load the given snapshot.
    #[must_use]
    pub const fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            writes: 0,
        }
    }

    /// Everything stored so far.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// How many times [`Gateway::store`] has been called.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl Gateway for MemoryGateway {
    fn load(&mut self) -> Result<Snapshot, GatewayError> {
        Ok(self.snapshot.clone())
    }

    fn store(&mut self, collection: Collection<'_>) -> Result<(), GatewayError> {
        self.writes += 1;
        match collection {
            Collection::CourseTypes(rows) => self.snapshot.course_types = Some(rows.to_vec()),
            Collection::Courses(rows) => self.snapshot.courses = Some(rows.to_vec()),
            Collection::CourseOfferings(rows) => {
                self.snapshot.course_offerings = Some(rows.to_vec());
            }
            Collection::Students(rows) => self.snapshot.students = Some(rows.to_vec()),
            Collection::Registrations(rows) => self.snapshot.registrations = Some(rows.to_vec()),
        }
        Ok(())
    }
}

impl<G: Gateway + ?Sized> Gateway for &mut G {
    fn load(&mut self) -> Result<Snapshot, GatewayError> {
        (**self).load()
    }

    fn store(&mut self, collection: Collection<'_>) -> Result<(), GatewayError> {
        (**self).store(collection)
    }
}
