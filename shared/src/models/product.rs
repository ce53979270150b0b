//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub type ProductId = u64;

/// Product entity
///
/// SKU is unique across all products (enforced at the store level).
/// Stock is never mutated directly — only through the catalog store's
/// conditional adjustment, so it can never be observed below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub stock: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Decimal,
    #[validate(length(min = 1))]
    pub sku: String,
    #[validate(range(min = 0))]
    pub stock: i32,
}

/// Update product payload
///
/// Stock is deliberately absent: replenishment goes through
/// the catalog store's stock adjustment, not a blind field write.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Option<Decimal>,
    #[validate(length(min = 1))]
    pub sku: Option<String>,
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("non_negative_price"));
    }
    Ok(())
}
