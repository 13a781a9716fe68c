use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive comparison against the (name, brand) duplicate key.
    pub fn has_key(&self, name: &str, brand: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
            && self.brand.to_lowercase() == brand.to_lowercase()
    }
}

/// A product that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter and pagination parameters for listing products.
///
/// Text filters are case-insensitive substring matches, price bounds are
/// inclusive. Page values are passed through as given; range checks happen
/// before a query reaches the repository.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub page_number: i64,
    pub page_size: i64,
}

impl Default for ProductQuery {
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

impl ProductQuery {
    /// Number of matching records to skip before the current page.
    pub fn offset(&self) -> i64 {
        self.page_number
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.limit())
    }

    /// Page size usable as a row limit.
    pub fn limit(&self) -> i64 {
        self.page_size.max(0)
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            if !product.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(brand) = self.brand.as_deref().filter(|s| !s.is_empty()) {
            if !product.brand.to_lowercase().contains(&brand.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = &self.min_price {
            if product.price < *min {
                return false;
            }
        }
        if let Some(max) = &self.max_price {
            if product.price > *max {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Number of matching records across all pages.
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
}

impl<T> PageResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}
