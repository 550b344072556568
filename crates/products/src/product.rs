use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmgate_core::{DomainError, DomainResult, ProductId};

/// A sellable farm product (coffee, plantain, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit the product is measured and sold in (kg, bulto, ...).
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
}

impl NewProduct {
    pub fn new(name: String, description: Option<String>, unit: String) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if unit.trim().is_empty() {
            return Err(DomainError::validation("unit of measure cannot be empty"));
        }
        Ok(Self {
            name,
            description,
            unit,
        })
    }

    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            unit: self.unit,
            created_at,
        }
    }
}
