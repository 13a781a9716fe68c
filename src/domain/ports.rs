use std::sync::Arc;

use super::errors::DomainError;
use super::product::{NewProduct, PageResult, Product, ProductQuery};

/// Storage port for products.
///
/// Absence is reported as `None`/`false`, never as an error. Stores enforce
/// the case-insensitive (name, brand) uniqueness themselves and report a
/// violation as `DomainError::Duplicate`.
pub trait ProductRepository: Send + Sync + 'static {
    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;
    fn find_all(&self, query: &ProductQuery) -> Result<PageResult<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Replaces name, brand and price of the stored record and stamps
    /// `updated_at`. Returns `None` when no record has `product.id`.
    fn update(&self, product: Product) -> Result<Option<Product>, DomainError>;
    fn delete(&self, id: i32) -> Result<bool, DomainError>;
    fn exists(&self, name: &str, brand: &str, exclude_id: Option<i32>)
        -> Result<bool, DomainError>;
}

impl<R: ProductRepository + ?Sized> ProductRepository for Arc<R> {
    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        (**self).find_by_id(id)
    }

    fn find_all(&self, query: &ProductQuery) -> Result<PageResult<Product>, DomainError> {
        (**self).find_all(query)
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        (**self).create(product)
    }

    fn update(&self, product: Product) -> Result<Option<Product>, DomainError> {
        (**self).update(product)
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        (**self).delete(id)
    }

    fn exists(
        &self,
        name: &str,
        brand: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DomainError> {
        (**self).exists(name, brand, exclude_id)
    }
}
