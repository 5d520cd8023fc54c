use serde::{Deserialize, Serialize};

use crate::domain::category::Category as DomainCategory;
use crate::domain::types::{CategorySlug, TypeConstraintError};

/// Category entry of `GET products/categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: CategorySlug::new(category.slug)?,
            name: category.name,
        })
    }
}
