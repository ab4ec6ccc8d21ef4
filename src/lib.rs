//! Course Registration Store
//!
//! Course types, courses, course offerings, students and registrations, held
//! in memory with their referential integrity enforced, and persisted
//! through a pluggable gateway.

pub mod domain;
pub use domain::{
    Config, Course, CourseOffering, CourseType, Entity, EntityKind, Error, Field, Id,
    OfferingDraft, OfferingPatch, Orphan, Registration, RegistrationDraft, Registry, Stats,
    Student, StudentDraft, StudentPatch, StudentRef, Violation, Violations,
};

/// Durable storage behind a registry.
pub mod storage;
pub use storage::{Gateway, JsonDirectory, MemoryGateway};
