//! The course registration store.
//!
//! A [`Registry`] owns one [`Repository`] per entity kind, the id generator,
//! and the [`Gateway`] rows are persisted through. Every mutation runs the
//! same pipeline:
//!
//! 1. validate against the current state, collecting every violation;
//! 2. resolve the snapshot fields (offering names, registration copies);
//! 3. commit to the repository;
//! 4. hand the full collection of the touched kind to the gateway.
//!
//! Nothing is committed if validation fails. Deletes never cascade: rows
//! that referred to a removed row keep their (now unresolvable) foreign key
//! and their snapshot copies. See [`Registry::orphans`].

use tracing::instrument;

use crate::{
    domain::{
        Config, Course, CourseOffering, CourseType, DEFAULT_COURSE_TYPES, DEFAULT_COURSES, Entity,
        EntityKind, Id, IdGenerator, Name, OfferingDraft, OfferingPatch, Registration,
        RegistrationDraft, Repository, Student, StudentDraft, StudentPatch, StudentRef,
        violation::{Field, Violation, Violations},
    },
    storage::{Collection, Gateway, GatewayError},
};

mod integrity;
mod report;

pub use report::{Orphan, Stats};

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The mutation broke one or more rules and was not applied.
    #[error("{0}")]
    Invalid(#[from] Violations),
    /// No row with the given id exists.
    #[error("{kind} {id} not found")]
    NotFound {
        /// The kind of row looked up.
        kind: EntityKind,
        /// The id that did not match.
        id: Id,
    },
}

impl Error {
    fn not_found<T: Entity>(id: &Id) -> Self {
        Self::NotFound {
            kind: T::KIND,
            id: id.clone(),
        }
    }

    /// The violations, if this is a validation failure.
    #[must_use]
    pub const fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Invalid(violations) => Some(violations),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Self::Invalid(violation.into())
    }
}

/// The five repositories of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    course_types: Repository<CourseType>,
    courses: Repository<Course>,
    course_offerings: Repository<CourseOffering>,
    students: Repository<Student>,
    registrations: Repository<Registration>,
}

impl Tables {
    /// Every id that appears anywhere in the tables, including foreign keys
    /// and the ids inside snapshots.
    fn ids(&self) -> impl Iterator<Item = &Id> {
        fn offering_ids(o: &CourseOffering) -> [&Id; 3] {
            [&o.id, &o.course_id, &o.course_type_id]
        }

        self.course_types
            .iter()
            .map(|row| &row.id)
            .chain(self.courses.iter().map(|row| &row.id))
            .chain(self.course_offerings.iter().flat_map(offering_ids))
            .chain(self.students.iter().map(|row| &row.id))
            .chain(self.registrations.iter().flat_map(|r| {
                [&r.id, &r.student_id, &r.course_offering_id, &r.student.id]
                    .into_iter()
                    .chain(offering_ids(&r.course_offering))
            }))
    }
}

/// A row type with its own repository in [`Tables`].
pub trait Table: Entity + Clone + Sized {
    /// The repository rows of this type live in.
    fn repository(tables: &Tables) -> &Repository<Self>;

    /// Mutable access to the repository rows of this type live in.
    fn repository_mut(tables: &mut Tables) -> &mut Repository<Self>;

    /// Wraps rows of this type for the gateway.
    fn collection(rows: &[Self]) -> Collection<'_>;
}

macro_rules! impl_table {
    ($ty:ty, $field:ident, $variant:ident) => {
        impl Table for $ty {
            fn repository(tables: &Tables) -> &Repository<Self> {
                &tables.$field
            }

            fn repository_mut(tables: &mut Tables) -> &mut Repository<Self> {
                &mut tables.$field
            }

            fn collection(rows: &[Self]) -> Collection<'_> {
                Collection::$variant(rows)
            }
        }
    };
}

impl_table!(CourseType, course_types, CourseTypes);
impl_table!(Course, courses, Courses);
impl_table!(CourseOffering, course_offerings, CourseOfferings);
impl_table!(Student, students, Students);
impl_table!(Registration, registrations, Registrations);

/// The in-memory course registration store.
pub struct Registry<G> {
    tables: Tables,
    ids: Box<dyn IdGenerator>,
    gateway: G,
}

impl<G: Gateway> Registry<G> {
    /// Opens a registry over the rows stored behind `gateway`.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot load its stored collections.
    pub fn open(gateway: G, config: &Config) -> Result<Self, GatewayError> {
        Self::open_with(gateway, config.id_strategy.generator(), config.seed_defaults)
    }

    /// Opens a registry with an explicit id generator.
    ///
    /// If `seed_defaults` is set, course types and courses that have never
    /// been stored are seeded with [`DEFAULT_COURSE_TYPES`] and
    /// [`DEFAULT_COURSES`], and the seed is persisted. A collection that was
    /// stored empty is left empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot load its stored collections.
    #[instrument(skip(gateway, ids))]
    pub fn open_with(
        mut gateway: G,
        mut ids: Box<dyn IdGenerator>,
        seed_defaults: bool,
    ) -> Result<Self, GatewayError> {
        let snapshot = gateway.load()?;
        let seed_course_types = seed_defaults && snapshot.course_types.is_none();
        let seed_courses = seed_defaults && snapshot.courses.is_none();

        let tables = Tables {
            course_types: Repository::from_rows(snapshot.course_types.unwrap_or_default()),
            courses: Repository::from_rows(snapshot.courses.unwrap_or_default()),
            course_offerings: Repository::from_rows(snapshot.course_offerings.unwrap_or_default()),
            students: Repository::from_rows(snapshot.students.unwrap_or_default()),
            registrations: Repository::from_rows(snapshot.registrations.unwrap_or_default()),
        };
        for id in tables.ids() {
            ids.observe(id);
        }

        let mut registry = Self {
            tables,
            ids,
            gateway,
        };

        if seed_course_types {
            tracing::info!("Seeding default course types");
            for name in DEFAULT_COURSE_TYPES.into_iter().filter_map(|n| Name::new(n).ok()) {
                registry
                    .tables
                    .course_types
                    .add(registry.ids.as_mut(), |id, at| CourseType::new(id, name, at));
            }
            registry.persist::<CourseType>();
        }
        if seed_courses {
            tracing::info!("Seeding default courses");
            for name in DEFAULT_COURSES.into_iter().filter_map(|n| Name::new(n).ok()) {
                registry
                    .tables
                    .courses
                    .add(registry.ids.as_mut(), |id, at| Course::new(id, name, at));
            }
            registry.persist::<Course>();
        }

        Ok(registry)
    }
}

impl<G> Registry<G> {
    /// The gateway rows are persisted through.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Closes the registry, returning its gateway.
    #[must_use]
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// Every row of kind `T`, in insertion order.
    #[must_use]
    pub fn list<T: Table>(&self) -> &[T] {
        T::repository(&self.tables).list()
    }

    /// Looks up a row of kind `T` by id.
    #[must_use]
    pub fn find<T: Table>(&self, id: &Id) -> Option<&T> {
        T::repository(&self.tables).find(id)
    }

    /// Looks up a row of kind `T` by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such row exists.
    pub fn get<T: Table>(&self, id: &Id) -> Result<&T, Error> {
        self.find(id).ok_or_else(|| Error::not_found::<T>(id))
    }

    /// Every course type, in insertion order.
    #[must_use]
    pub fn course_types(&self) -> &[CourseType] {
        self.list()
    }

    /// Every course, in insertion order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        self.list()
    }

    /// Every course offering, in insertion order.
    #[must_use]
    pub fn course_offerings(&self) -> &[CourseOffering] {
        self.list()
    }

    /// Every student, in insertion order.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        self.list()
    }

    /// Every registration, in insertion order.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        self.list()
    }

    /// Checks whether an offering pairing `course_id` with `course_type_id`
    /// could be created.
    ///
    /// # Errors
    ///
    /// Returns every violation found: blank ids and ids that do not resolve.
    pub fn validate_offering(&self, course_id: &Id, course_type_id: &Id) -> Result<(), Violations> {
        self.tables.check_offering(course_id, course_type_id)
    }

    /// Checks whether `student` could be registered for the offering.
    ///
    /// # Errors
    ///
    /// Returns every violation found: an unresolved offering or student, an
    /// invalid new-student draft, or an existing registration of the same
    /// student for the same offering.
    pub fn validate_registration(
        &self,
        student: &StudentRef,
        course_offering_id: &Id,
    ) -> Result<(), Violations> {
        self.tables.check_registration(student, course_offering_id)
    }
}

impl<G: Gateway> Registry<G> {
    /// Adds a course type.
    ///
    /// # Errors
    ///
    /// Returns a violation if the name is blank or too short.
    #[instrument(skip(self))]
    pub fn add_course_type(&mut self, name: &str) -> Result<CourseType, Error> {
        let name = Name::new(name).map_err(|e| e.at(Field::Name))?;
        let row = self
            .tables
            .course_types
            .add(self.ids.as_mut(), |id, at| CourseType::new(id, name, at))
            .clone();
        self.committed(&row);
        Ok(row)
    }

    /// Renames a course type.
    ///
    /// Offerings already created from it keep the old name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or a violation if the
    /// name is blank or too short.
    #[instrument(skip(self))]
    pub fn update_course_type(&mut self, id: &Id, name: &str) -> Result<CourseType, Error> {
        self.edit(id, |row: &mut CourseType| {
            row.name = Name::new(name).map_err(|e| e.at(Field::Name))?;
            Ok(())
        })
    }

    /// Adds a course.
    ///
    /// # Errors
    ///
    /// Returns a violation if the name is blank or too short.
    #[instrument(skip(self))]
    pub fn add_course(&mut self, name: &str) -> Result<Course, Error> {
        let name = Name::new(name).map_err(|e| e.at(Field::Name))?;
        let row = self
            .tables
            .courses
            .add(self.ids.as_mut(), |id, at| Course::new(id, name, at))
            .clone();
        self.committed(&row);
        Ok(row)
    }

    /// Renames a course.
    ///
    /// Offerings already created from it keep the old name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or a violation if the
    /// name is blank or too short.
    #[instrument(skip(self))]
    pub fn update_course(&mut self, id: &Id, name: &str) -> Result<Course, Error> {
        self.edit(id, |row: &mut Course| {
            row.name = Name::new(name).map_err(|e| e.at(Field::Name))?;
            Ok(())
        })
    }

    /// Adds a course offering, copying the current course and course-type
    /// names into it.
    ///
    /// # Errors
    ///
    /// Returns every violation found if either id is blank or does not
    /// resolve. The offerings are left unchanged.
    #[instrument(skip(self))]
    pub fn add_course_offering(&mut self, draft: OfferingDraft) -> Result<CourseOffering, Error> {
        let (course, course_type) = self.resolve_pairing(&draft.course_id, &draft.course_type_id)?;
        let row = self
            .tables
            .course_offerings
            .add(self.ids.as_mut(), |id, at| {
                CourseOffering::resolve(id, &course, &course_type, at)
            })
            .clone();
        self.committed(&row);
        Ok(row)
    }

    /// Re-pairs a course offering.
    ///
    /// The resulting pairing is validated like a new offering, and the names
    /// are copied again from the (possibly unchanged) course and course
    /// type. Registrations keep the offering as it was when they were made.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown offering, or every
    /// violation found in the resulting pairing.
    #[instrument(skip(self))]
    pub fn update_course_offering(
        &mut self,
        id: &Id,
        patch: OfferingPatch,
    ) -> Result<CourseOffering, Error> {
        let current = self.get::<CourseOffering>(id)?;
        let course_id = patch.course_id.unwrap_or_else(|| current.course_id.clone());
        let course_type_id = patch
            .course_type_id
            .unwrap_or_else(|| current.course_type_id.clone());

        let (course, course_type) = self.resolve_pairing(&course_id, &course_type_id)?;
        self.edit(id, |row: &mut CourseOffering| {
            row.repair(&course, &course_type);
            Ok(())
        })
    }

    /// Adds a student.
    ///
    /// # Errors
    ///
    /// Returns every violation found in the draft.
    #[instrument(skip(self))]
    pub fn add_student(&mut self, draft: &StudentDraft) -> Result<Student, Error> {
        let mut found = Vec::new();
        draft.check(&mut found);
        Violations::check(found)?;

        let fields = draft.parse()?;
        let row = self
            .tables
            .students
            .add(self.ids.as_mut(), |id, at| Student::new(id, fields, at))
            .clone();
        self.committed(&row);
        Ok(row)
    }

    /// Changes the supplied fields of a student.
    ///
    /// Registrations keep the student as they were when they registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or every violation
    /// found in the supplied fields.
    #[instrument(skip(self))]
    pub fn update_student(&mut self, id: &Id, patch: &StudentPatch) -> Result<Student, Error> {
        self.edit(id, |row: &mut Student| {
            let mut found = Vec::new();
            patch.check(&mut found);
            Violations::check(found)?;
            Ok(patch.apply(row)?)
        })
    }

    /// Registers a student for a course offering.
    ///
    /// On the existing-student path the student must resolve and must not
    /// already be registered for the offering. On the new-student path the
    /// draft is validated and the student is created first; a brand new
    /// student cannot already be registered, so no duplicate check is made.
    /// Either way, nothing is created unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns every violation found.
    #[instrument(skip(self))]
    pub fn register(&mut self, draft: RegistrationDraft) -> Result<Registration, Error> {
        let RegistrationDraft {
            student,
            course_offering_id,
        } = draft;
        self.tables
            .check_registration(&student, &course_offering_id)?;

        let course_offering = self
            .tables
            .reference::<CourseOffering>(Field::CourseOffering, &course_offering_id)?
            .clone();
        let student = match student {
            StudentRef::Existing(student_id) => self
                .tables
                .reference::<Student>(Field::Student, &student_id)?
                .clone(),
            StudentRef::New(draft) => self.add_student(&draft)?,
        };

        let row = self
            .tables
            .registrations
            .add(self.ids.as_mut(), |id, at| {
                Registration::resolve(id, &student, &course_offering, at)
            })
            .clone();
        self.committed(&row);
        Ok(row)
    }

    /// Removes a row of kind `T`.
    ///
    /// Returns `true` if a row was removed. Removing an unknown id is a
    /// no-op and persists nothing. Rows referring to the removed one are
    /// left in place.
    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub fn remove<T: Table>(&mut self, id: &Id) -> bool {
        let removed = T::repository_mut(&mut self.tables).remove(id);
        if removed {
            tracing::debug!("Removed {} {id}", T::KIND);
            self.persist::<T>();
        }
        removed
    }

    fn resolve_pairing(
        &self,
        course_id: &Id,
        course_type_id: &Id,
    ) -> Result<(Course, CourseType), Error> {
        self.tables.check_offering(course_id, course_type_id)?;
        let course = self.tables.reference::<Course>(Field::Course, course_id)?;
        let course_type = self
            .tables
            .reference::<CourseType>(Field::CourseType, course_type_id)?;
        Ok((course.clone(), course_type.clone()))
    }

    fn edit<T: Table>(
        &mut self,
        id: &Id,
        edit: impl FnOnce(&mut T) -> Result<(), Error>,
    ) -> Result<T, Error> {
        let row = T::repository_mut(&mut self.tables)
            .update(id, edit)
            .ok_or_else(|| Error::not_found::<T>(id))??
            .clone();
        tracing::debug!("Updated {} {}", T::KIND, row.id());
        self.persist::<T>();
        Ok(row)
    }

    fn committed<T: Table>(&mut self, row: &T) {
        tracing::debug!("Added {} {}", T::KIND, row.id());
        self.persist::<T>();
    }

    fn persist<T: Table>(&mut self) {
        let collection = T::collection(T::repository(&self.tables).list());
        if let Err(e) = self.gateway.store(collection) {
            tracing::warn!("Failed to store {} collection: {e}", T::KIND);
        }
    }
}

impl<G> std::fmt::Debug for Registry<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
