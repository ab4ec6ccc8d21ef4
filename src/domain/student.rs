use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Email, Id, Text,
    entity::impl_entity,
    violation::{Field, Violation},
};

/// A person who can register for course offerings.
///
/// Email addresses are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub(crate) id: Id,
    pub(crate) name: Text,
    pub(crate) email: Email,
    pub(crate) phone: Text,
    pub(crate) created_at: DateTime<Utc>,
}

impl Student {
    pub(super) fn new(id: Id, fields: StudentFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            created_at,
        }
    }

    /// The student's name.
    #[must_use]
    pub const fn name(&self) -> &Text {
        &self.name
    }

    /// The student's email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// The student's phone number.
    #[must_use]
    pub const fn phone(&self) -> &Text {
        &self.phone
    }

    /// Human-readable label, e.g. `Ada Lovelace (ada@example.com)`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.email)
    }
}

impl_entity!(Student, Student, created_at);

/// Unvalidated input for a new student, as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

impl StudentDraft {
    /// A draft with the given details.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    fn name(&self) -> Result<Text, Violation> {
        Text::new(&self.name).map_err(|e| e.at(Field::Name))
    }

    fn email(&self) -> Result<Email, Violation> {
        Email::new(&self.email).map_err(|e| e.at(Field::Email))
    }

    fn phone(&self) -> Result<Text, Violation> {
        Text::new(&self.phone).map_err(|e| e.at(Field::Phone))
    }

    /// Appends one violation per invalid field.
    pub(crate) fn check(&self, found: &mut Vec<Violation>) {
        found.extend(
            [self.name().err(), self.email().err(), self.phone().err()]
                .into_iter()
                .flatten(),
        );
    }

    /// Validates the draft, stopping at the first invalid field.
    pub(super) fn parse(&self) -> Result<StudentFields, Violation> {
        Ok(StudentFields {
            name: self.name()?,
            email: self.email()?,
            phone: self.phone()?,
        })
    }
}

/// Fields to change on an existing student. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    /// New name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
}

impl StudentPatch {
    fn name(&self) -> Option<Result<Text, Violation>> {
        self.name
            .as_deref()
            .map(|raw| Text::new(raw).map_err(|e| e.at(Field::Name)))
    }

    fn email(&self) -> Option<Result<Email, Violation>> {
        self.email
            .as_deref()
            .map(|raw| Email::new(raw).map_err(|e| e.at(Field::Email)))
    }

    fn phone(&self) -> Option<Result<Text, Violation>> {
        self.phone
            .as_deref()
            .map(|raw| Text::new(raw).map_err(|e| e.at(Field::Phone)))
    }

    /// Appends one violation per invalid supplied field.
    pub(crate) fn check(&self, found: &mut Vec<Violation>) {
        found.extend(
            [
                self.name().and_then(Result::err),
                self.email().and_then(Result::err),
                self.phone().and_then(Result::err),
            ]
            .into_iter()
            .flatten(),
        );
    }

    /// Applies the supplied fields to `student`.
    ///
    /// Every field is validated before any is written, so on error the
    /// student is untouched.
    pub(crate) fn apply(&self, student: &mut Student) -> Result<(), Violation> {
        let name = self.name().transpose()?;
        let email = self.email().transpose()?;
        let phone = self.phone().transpose()?;

        if let Some(name) = name {
            student.name = name;
        }
        if let Some(email) = email {
            student.email = email;
        }
        if let Some(phone) = phone {
            student.phone = phone;
        }
        Ok(())
    }
}

/// A student's validated details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct StudentFields {
    name: Text,
    email: Email,
    phone: Text,
}
