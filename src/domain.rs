//! Domain models for course registration.
//!
//! This module contains the five entity kinds, the validated value types
//! they are built from, and the [`Registry`] that enforces the integrity
//! rules between them.

mod catalogue;
pub use catalogue::{Course, CourseType, DEFAULT_COURSE_TYPES, DEFAULT_COURSES};

mod config;
pub use config::{Config, IdStrategy};

mod entity;
pub use entity::{Entity, EntityKind};

/// Row identifiers and their generators.
pub mod id;
pub use id::{Id, IdGenerator, RandomIds, SequentialIds};

mod offering;
pub use offering::{CourseOffering, OfferingDraft, OfferingPatch};

mod registration;
pub use registration::{Registration, RegistrationDraft, StudentRef};

/// The registry and its integrity rules.
pub mod registry;
pub use registry::{Error, Orphan, Registry, Stats, Table};

mod repository;
pub use repository::Repository;

mod student;
pub use student::{Student, StudentDraft, StudentPatch};

mod text;
pub use text::{Email, InvalidTextError, MIN_NAME_LEN, Name, Text};

/// Field-keyed integrity violations.
pub mod violation;
pub use violation::{Field, Violation, Violations};
