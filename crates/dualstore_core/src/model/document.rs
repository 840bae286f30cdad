//! Document-shaped customer entity.
//!
//! Serialized with camelCase keys (`id`, `firstName`, `lastName`); these keys
//! are what document-store field lookups match against.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a customer document.
pub type DocumentId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDocument {
    /// `None` until the document store assigns an identifier on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub first_name: String,
    pub last_name: String,
}

impl CustomerDocument {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Display for CustomerDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Customer[id={}, firstName='{}', lastName='{}']",
            self.id.as_deref().unwrap_or("null"),
            self.first_name,
            self.last_name
        )
    }
}
