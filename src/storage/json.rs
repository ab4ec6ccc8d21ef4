//! A directory of JSON files, one per collection.
//!
//! ```text
//! <root>/
//!   course_types.json
//!   courses.json
//!   course_offerings.json
//!   students.json
//!   registrations.json
//! ```
//!
//! Each file holds a versioned envelope (`{"_version": "1", "rows": [...]}`).
//! A missing file means the collection has never been stored.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    domain::EntityKind,
    storage::gateway::{Collection, Gateway, GatewayError, Snapshot},
};

/// Stores each collection as a JSON file under a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDirectory {
    root: PathBuf,
}

impl JsonDirectory {
    /// A gateway rooted at the given directory.
    ///
    /// The directory is created on the first write if it does not exist.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The directory collections are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a collection of the given kind is stored in.
    #[must_use]
    pub fn path(&self, kind: EntityKind) -> PathBuf {
        self.root.join(file_name(kind))
    }

    fn read<T: DeserializeOwned>(&self, kind: EntityKind) -> Result<Option<Vec<T>>, GatewayError> {
        let path = self.path(kind);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No stored {kind} collection at {}", path.display());
                return Ok(None);
            }
            Err(source) => return Err(GatewayError::Io { path, source }),
        };

        let Versions::V1 { rows } =
            serde_json::from_str(&content).map_err(|source| GatewayError::Parse {
                path: path.clone(),
                source,
            })?;
        tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(Some(rows))
    }

    fn write<T: Serialize>(&self, kind: EntityKind, rows: &[T]) -> Result<(), GatewayError> {
        let path = self.path(kind);
        let mut buf = serde_json::to_string_pretty(&VersionsRef::V1 { rows })
            .map_err(|source| GatewayError::Encode { kind, source })?;
        buf.push('\n');

        fs::create_dir_all(&self.root).map_err(|source| GatewayError::Io {
            path: self.root.clone(),
            source,
        })?;
        fs::write(&path, buf).map_err(|source| GatewayError::Io { path, source })
    }
}

const fn file_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::CourseType => "course_types.json",
        EntityKind::Course => "courses.json",
        EntityKind::CourseOffering => "course_offerings.json",
        EntityKind::Student => "students.json",
        EntityKind::Registration => "registrations.json",
    }
}

/// The stored versions of a collection file.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions<T> {
    #[serde(rename = "1")]
    V1 { rows: Vec<T> },
}

/// Borrowed counterpart of [`Versions`], so rows are not cloned to be
/// written.
#[derive(Debug, Serialize)]
#[serde(tag = "_version")]
enum VersionsRef<'a, T> {
    #[serde(rename = "1")]
    V1 { rows: &'a [T] },
}

impl Gateway for JsonDirectory {
    fn load(&mut self) -> Result<Snapshot, GatewayError> {
        Ok(Snapshot {
            course_types: self.read(EntityKind::CourseType)?,
            courses: self.read(EntityKind::Course)?,
            course_offerings: self.read(EntityKind::CourseOffering)?,
            students: self.read(EntityKind::Student)?,
            registrations: self.read(EntityKind::Registration)?,
        })
    }

    fn store(&mut self, collection: Collection<'_>) -> Result<(), GatewayError> {
        let kind = collection.kind();
        match collection {
            Collection::CourseTypes(rows) => self.write(kind, rows),
            Collection::Courses(rows) => self.write(kind, rows),
            Collection::CourseOfferings(rows) => self.write(kind, rows),
            Collection::Students(rows) => self.write(kind, rows),
            Collection::Registrations(rows) => self.write(kind, rows),
        }
    }
}
