use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, PageResult, Product, ProductQuery};

#[derive(Debug, Default)]
struct Catalog {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

impl Catalog {
    fn key_taken(&self, name: &str, brand: &str, exclude_id: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|p| Some(p.id) != exclude_id && p.has_key(name, brand))
    }
}

/// Process-local product store.
///
/// Every operation runs under a single lock, so the duplicate check and the
/// write it guards are atomic.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    catalog: Mutex<Catalog>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Catalog>, DomainError> {
        self.catalog
            .lock()
            .map_err(|_| DomainError::Internal("product store lock poisoned".to_string()))
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn find_all(&self, query: &ProductQuery) -> Result<PageResult<Product>, DomainError> {
        let catalog = self.lock()?;

        let mut matching: Vec<&Product> =
            catalog.rows.values().filter(|p| query.matches(p)).collect();
        let total_count = matching.len() as i64;

        // Same ordering as the Postgres store: lowercased name, brand, then id.
        matching.sort_by_cached_key(|p| (p.name.to_lowercase(), p.brand.to_lowercase(), p.id));

        let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.limit()).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(skip).take(take).cloned().collect();

        Ok(PageResult {
            items,
            total_count,
            page_number: query.page_number,
            page_size: query.page_size,
        })
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut catalog = self.lock()?;

        if catalog.key_taken(&product.name, &product.brand, None) {
            return Err(DomainError::duplicate(&product.name, &product.brand));
        }

        catalog.last_id += 1;
        let stored = Product {
            id: catalog.last_id,
            name: product.name,
            brand: product.brand,
            price: product.price,
            created_at: product.created_at,
            updated_at: product.updated_at,
        };
        catalog.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update(&self, product: Product) -> Result<Option<Product>, DomainError> {
        let mut catalog = self.lock()?;

        let Some(created_at) = catalog.rows.get(&product.id).map(|p| p.created_at) else {
            return Ok(None);
        };
        if catalog.key_taken(&product.name, &product.brand, Some(product.id)) {
            return Err(DomainError::duplicate(&product.name, &product.brand));
        }

        let replacement = Product {
            created_at,
            updated_at: Utc::now(),
            ..product
        };
        catalog.rows.insert(replacement.id, replacement.clone());
        Ok(Some(replacement))
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    fn exists(
        &self,
        name: &str,
        brand: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DomainError> {
        Ok(self.lock()?.key_taken(name, brand, exclude_id))
    }
}
