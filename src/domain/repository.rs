//! An ordered in-memory collection of one kind of row.
//!
//! The [`Repository`] knows nothing about integrity rules or persistence. It
//! keeps rows in insertion order (which is also display order), hands out
//! fresh ids and timestamps on insert, and guarantees that neither is ever
//! changed afterwards.

use chrono::{DateTime, Utc};

use crate::domain::{Entity, Id, IdGenerator};

/// The authoritative collection for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository<T> {
    rows: Vec<T>,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Entity> Repository<T> {
    /// A repository holding previously stored rows, in their stored order.
    #[must_use]
    pub const fn from_rows(rows: Vec<T>) -> Self {
        Self { rows }
    }

    /// Builds a new row from a fresh id and the current time, and appends it.
    pub fn add(
        &mut self,
        ids: &mut dyn IdGenerator,
        build: impl FnOnce(Id, DateTime<Utc>) -> T,
    ) -> &T {
        let row = build(ids.next_id(), Utc::now());
        debug_assert!(
            self.find(row.id()).is_none(),
            "id generator reissued {}",
            row.id()
        );
        self.rows.push(row);
        &self.rows[self.rows.len() - 1]
    }

    /// Applies `edit` to the row with the given id.
    ///
    /// Returns `None` if no row matches. An `edit` that fails must leave the
    /// row untouched. Edits never change the id or creation time.
    pub fn update<E>(
        &mut self,
        id: &Id,
        edit: impl FnOnce(&mut T) -> Result<(), E>,
    ) -> Option<Result<&T, E>> {
        let row = self.rows.iter_mut().find(|row| row.id() == id)?;
        let (before_id, created_at) = (row.id().clone(), row.created_at());

        if let Err(e) = edit(row) {
            return Some(Err(e));
        }
        debug_assert!(row.id() == &before_id && row.created_at() == created_at);

        let row: &T = row;
        Some(Ok(row))
    }

    /// Removes the row with the given id.
    ///
    /// Returns `true` if a row was removed. Removing an id that is not
    /// present does nothing.
    pub fn remove(&mut self, id: &Id) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }

    /// Looks up a row by id.
    #[must_use]
    pub fn find(&self, id: &Id) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Whether a row with the given id exists.
    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        self.find(id).is_some()
    }

    /// Every row, in insertion order.
    #[must_use]
    pub fn list(&self) -> &[T] {
        &self.rows
    }

    /// Iterates over every row in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// The number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the repository holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a, T: Entity> IntoIterator for &'a Repository<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
