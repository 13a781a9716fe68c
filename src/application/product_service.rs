use chrono::Utc;

use super::dto::{CreateProductDto, ProductDto, UpdateProductDto};
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, PageResult, Product, ProductQuery};

/// Business rules on top of the repository: duplicate checks, timestamps and
/// mapping to response shapes. Missing products come back as `None`.
pub struct ProductService<R> {
    repo: R,
}

fn log_failure(action: &str, err: &DomainError) {
    match err {
        DomainError::Duplicate { .. } => log::warn!("{action} rejected: {err}"),
        DomainError::Internal(_) => log::error!("Error {action}: {err}"),
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_product(&self, dto: CreateProductDto) -> Result<ProductDto, DomainError> {
        log::info!("Creating product: name='{}', brand='{}'", dto.name, dto.brand);

        let exists = self
            .repo
            .exists(&dto.name, &dto.brand, None)
            .inspect_err(|e| log_failure("creating product", e))?;
        if exists {
            let err = DomainError::duplicate(&dto.name, &dto.brand);
            log_failure("creating product", &err);
            return Err(err);
        }

        let now = Utc::now();
        let created = self
            .repo
            .create(NewProduct {
                name: dto.name,
                brand: dto.brand,
                price: dto.price,
                created_at: now,
                updated_at: now,
            })
            .inspect_err(|e| log_failure("creating product", e))?;

        log::info!("Product created successfully with ID: {}", created.id);
        Ok(created.into())
    }

    pub fn get_product(&self, id: i32) -> Result<Option<ProductDto>, DomainError> {
        log::info!("Getting product by ID {id}");

        let product = self
            .repo
            .find_by_id(id)
            .inspect_err(|e| log_failure(&format!("getting product {id}"), e))?;
        if product.is_none() {
            log::warn!("Product with ID {id} not found");
        }
        Ok(product.map(ProductDto::from))
    }

    pub fn list_products(
        &self,
        query: ProductQuery,
    ) -> Result<PageResult<ProductDto>, DomainError> {
        log::info!("Getting products with query: {query:?}");

        let page = self
            .repo
            .find_all(&query)
            .inspect_err(|e| log_failure("listing products", e))?;
        Ok(page.map(ProductDto::from))
    }

    pub fn update_product(
        &self,
        id: i32,
        dto: UpdateProductDto,
    ) -> Result<Option<ProductDto>, DomainError> {
        log::info!(
            "Updating product with ID {id}: name='{}', brand='{}'",
            dto.name,
            dto.brand
        );
        let action = format!("updating product {id}");

        let Some(existing) = self
            .repo
            .find_by_id(id)
            .inspect_err(|e| log_failure(&action, e))?
        else {
            log::warn!("Product with ID {id} not found for update");
            return Ok(None);
        };

        let exists = self
            .repo
            .exists(&dto.name, &dto.brand, Some(id))
            .inspect_err(|e| log_failure(&action, e))?;
        if exists {
            let err = DomainError::duplicate(&dto.name, &dto.brand);
            log_failure(&action, &err);
            return Err(err);
        }

        let replacement = Product {
            name: dto.name,
            brand: dto.brand,
            price: dto.price,
            ..existing
        };
        let updated = self
            .repo
            .update(replacement)
            .inspect_err(|e| log_failure(&action, e))?;

        match &updated {
            Some(p) => log::info!("Product updated successfully with ID: {}", p.id),
            None => log::warn!("Product with ID {id} disappeared before update"),
        }
        Ok(updated.map(ProductDto::from))
    }

    pub fn delete_product(&self, id: i32) -> Result<bool, DomainError> {
        log::info!("Deleting product with ID {id}");

        let deleted = self
            .repo
            .delete(id)
            .inspect_err(|e| log_failure(&format!("deleting product {id}"), e))?;
        if deleted {
            log::info!("Product deleted successfully with ID {id}");
        } else {
            log::warn!("Product with ID {id} not found for deletion");
        }
        Ok(deleted)
    }
}
