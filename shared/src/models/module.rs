//! Module Model
//!
//! A module is a resource type in the managed system, with a declared
//! list of data fields. Those fields are the universe of togglable
//! visible/editable fields in a permission row.

use serde::{Deserialize, Serialize};

/// Module entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub fields: FieldList,
}

/// Field list as delivered by the API.
///
/// Some records carry an already-parsed array of names, others a
/// JSON-encoded string payload. The union is decoded here, at the
/// collaborator boundary, so the rest of the console only ever sees a
/// sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldList {
    /// Already a sequence of field names
    Parsed(Vec<String>),
    /// JSON-encoded string payload, e.g. `"[\"amount\",\"date\"]"`
    Encoded(String),
}

impl Default for FieldList {
    fn default() -> Self {
        FieldList::Parsed(Vec::new())
    }
}

impl FieldList {
    /// Normalized field names, in declaration order.
    ///
    /// An unparsable string payload yields an empty sequence; the failure
    /// is logged rather than swallowed.
    pub fn names(&self) -> Vec<String> {
        match self {
            FieldList::Parsed(names) => names.clone(),
            FieldList::Encoded(raw) => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!("unparsable module field list {:?}: {}", raw, e);
                    Vec::new()
                }
            },
        }
    }

    /// Whether the normalized sequence is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldList::Parsed(names) => names.is_empty(),
            FieldList::Encoded(_) => self.names().is_empty(),
        }
    }
}
