use crate::db::DbError;
use crate::model::customer::NameParseError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surface shared by row-store and document-store repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted or caller-provided data breaks a repository contract.
    InvalidData(String),
    InvalidName(NameParseError),
    /// Rejected SQL identifier for a row-store table.
    InvalidTable(String),
    Serialization(serde_json::Error),
    /// A single-result lookup matched more than one record.
    NonUniqueResult {
        field: &'static str,
        value: String,
    },
    /// An in-memory store lock was poisoned by a panicking writer.
    StorePoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid customer data: {message}"),
            Self::InvalidName(err) => write!(f, "{err}"),
            Self::InvalidTable(name) => write!(f, "invalid table name `{name}`"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
            Self::NonUniqueResult { field, value } => {
                write!(f, "expected at most one document with {field}=`{value}`")
            }
            Self::StorePoisoned => write!(f, "in-memory document store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidName(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_)
            | Self::InvalidTable(_)
            | Self::NonUniqueResult { .. }
            | Self::StorePoisoned => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<NameParseError> for RepoError {
    fn from(value: NameParseError) -> Self {
        Self::InvalidName(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
