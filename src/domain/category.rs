use serde::{Deserialize, Serialize};

use crate::domain::types::CategorySlug;

/// Read-only category vocabulary entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Value sent to the catalog API.
    pub slug: CategorySlug,
    /// Display label.
    pub name: String,
}
