use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use super::validation::{
    validate_not_blank, validate_page_number, validate_page_size, validate_price,
    validate_price_bound, validate_price_order,
};
use crate::domain::product::{Product, ProductQuery, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

// ── Request bodies ───────────────────────────────────────────────────────────

// Absent fields fall back to empty / zero so the field rules report them.

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(
        custom(function = "validate_not_blank", message = "Name is required"),
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters")
    )]
    #[serde(default)]
    #[schema(example = "iPhone 16 Pro")]
    pub name: String,
    #[validate(
        custom(function = "validate_not_blank", message = "Brand is required"),
        length(min = 1, max = 100, message = "Brand must be between 1 and 100 characters")
    )]
    #[serde(default)]
    #[schema(example = "Apple")]
    pub brand: String,
    /// Decimal price; accepted as a string ("999.99") or a JSON number.
    #[validate(custom(function = "validate_price"))]
    #[serde(default)]
    #[schema(value_type = String, example = "999.99")]
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(
        custom(function = "validate_not_blank", message = "Name is required"),
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters")
    )]
    #[serde(default)]
    #[schema(example = "iPhone 16 Pro")]
    pub name: String,
    #[validate(
        custom(function = "validate_not_blank", message = "Brand is required"),
        length(min = 1, max = 100, message = "Brand must be between 1 and 100 characters")
    )]
    #[serde(default)]
    #[schema(example = "Apple")]
    pub brand: String,
    #[validate(custom(function = "validate_price"))]
    #[serde(default)]
    #[schema(value_type = String, example = "949.99")]
    pub price: BigDecimal,
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub brand: String,
    #[schema(value_type = String, example = "999.99")]
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            brand: p.brand,
            price: p.price,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQueryDto {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// Case-insensitive substring of the brand.
    pub brand: Option<String>,
    /// Inclusive lower price bound.
    #[param(value_type = Option<String>)]
    pub min_price: Option<BigDecimal>,
    /// Inclusive upper price bound.
    #[param(value_type = Option<String>)]
    pub max_price: Option<BigDecimal>,
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    /// Items per page. Defaults to 10, maximum 100.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_number() -> i64 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ProductQueryDto {
    fn default() -> Self {
        Self {
            name: None,
            brand: None,
            min_price: None,
            max_price: None,
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// Error keys use the query-string names so clients can map them back.
impl Validate for ProductQueryDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_page_number(self.page_number) {
            errors.add("pageNumber", e);
        }
        if let Err(e) = validate_page_size(self.page_size) {
            errors.add("pageSize", e);
        }
        if let Some(min) = &self.min_price {
            if let Err(e) =
                validate_price_bound(min, "Minimum price must be greater than or equal to 0")
            {
                errors.add("minPrice", e);
            }
        }
        if let Some(max) = &self.max_price {
            if let Err(e) =
                validate_price_bound(max, "Maximum price must be greater than or equal to 0")
            {
                errors.add("maxPrice", e);
            }
        }
        if let (Some(min), Some(max)) = (&self.min_price, &self.max_price) {
            if let Err(e) = validate_price_order(min, max) {
                errors.add("minPrice", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<ProductQueryDto> for ProductQuery {
    fn from(q: ProductQueryDto) -> Self {
        Self {
            name: q.name,
            brand: q.brand,
            min_price: q.min_price,
            max_price: q.max_price,
            page_number: q.page_number,
            page_size: q.page_size,
        }
    }
}
