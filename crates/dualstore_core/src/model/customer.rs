//! Relational customer record and name parsing.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a relational customer row.
pub type CustomerId = i64;

/// Customer row as stored in the relational backend.
///
/// `id` stays `None` until the store assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
}

impl Customer {
    /// Creates a transient customer without an identifier.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Creates a customer carrying an identifier already assigned by the store.
    pub fn with_id(
        id: CustomerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Display for Customer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Customer[id={id}, ")?,
            None => write!(f, "Customer[id=null, ")?,
        }
        write!(
            f,
            "firstName='{}', lastName='{}']",
            self.first_name, self.last_name
        )
    }
}

/// First/last name pair used to seed both stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullName {
    pub first: String,
    pub last: String,
}

impl FullName {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    /// Splits `"First Last"` on whitespace.
    ///
    /// # Errors
    /// - Returns `NameParseError` unless the input has exactly two non-empty parts.
    pub fn parse(value: &str) -> Result<Self, NameParseError> {
        let mut parts = value.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(first), Some(last), None) => Ok(Self::new(first, last)),
            _ => Err(NameParseError {
                input: value.to_string(),
            }),
        }
    }

    /// Parses every entry of `values`, failing on the first malformed one.
    pub fn parse_all<'a, I>(values: I) -> Result<Vec<Self>, NameParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        values.into_iter().map(Self::parse).collect()
    }
}

/// Input that could not be split into a first/last pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParseError {
    pub input: String,
}

impl Display for NameParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "expected `First Last` with exactly two parts, got `{}`",
            self.input
        )
    }
}

impl Error for NameParseError {}
