//! Validated text fields.
//!
//! All values are trimmed before validation and stored trimmed.

use std::{fmt, ops::Deref, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::violation::{Field, Violation};

/// Minimum length of a course or course-type name.
pub const MIN_NAME_LEN: usize = 2;

/// Error returned when a text field fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTextError {
    /// The value was blank after trimming.
    #[error("value is required")]
    Empty,
    /// The value was shorter than the minimum after trimming.
    #[error("value must be at least {0} characters")]
    TooShort(usize),
    /// The value is not an email address.
    #[error("'{0}' is not a valid email address")]
    Email(String),
}

impl InvalidTextError {
    /// Attaches this error to a field.
    #[must_use]
    pub fn at(self, field: Field) -> Violation {
        match self {
            Self::Empty => Violation::Required { field },
            Self::TooShort(min) => Violation::TooShort { field, min },
            Self::Email(_) => Violation::Malformed { field },
        }
    }
}

fn non_empty(raw: &str) -> Result<NonEmptyString, InvalidTextError> {
    NonEmptyString::new(raw.trim().to_string()).map_err(|_| InvalidTextError::Empty)
}

/// A required free-text value, such as a student name or phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Text(NonEmptyString);

impl Text {
    /// Trims and validates the value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTextError::Empty`] if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, InvalidTextError> {
        non_empty(raw).map(Self)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// The name of a course or course type: at least [`MIN_NAME_LEN`]
/// characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(NonEmptyString);

impl Name {
    /// Trims and validates the name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or too short.
    pub fn new(raw: &str) -> Result<Self, InvalidTextError> {
        let name = non_empty(raw)?;
        if name.as_str().chars().count() < MIN_NAME_LEN {
            return Err(InvalidTextError::TooShort(MIN_NAME_LEN));
        }
        Ok(Self(name))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("this must never fail"));

/// An email address of the basic `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(NonEmptyString);

impl Email {
    /// Trims and validates the address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTextError::Empty`] for a blank value and
    /// [`InvalidTextError::Email`] if the shape is wrong.
    pub fn new(raw: &str) -> Result<Self, InvalidTextError> {
        let email = non_empty(raw)?;
        if !EMAIL.is_match(email.as_str()) {
            return Err(InvalidTextError::Email(email.as_str().to_string()));
        }
        Ok(Self(email))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

macro_rules! string_newtype {
    ($ty:ident) => {
        impl Deref for $ty {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.0.as_str()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }

        impl TryFrom<String> for $ty {
            type Error = InvalidTextError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = InvalidTextError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0.as_str().to_string()
            }
        }

        impl PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $ty {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

string_newtype!(Text);
string_newtype!(Name);
string_newtype!(Email);
