use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::application::dto::CreateProductDto;
use crate::application::product_service::ProductService;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::ProductQuery;

const SAMPLE_PRODUCTS: [(&str, &str, &str); 5] = [
    ("iPhone 16 Pro", "Apple", "999.99"),
    ("Galaxy S25", "Samsung", "989.99"),
    ("Pixel", "Google", "899.99"),
    ("Surface Pro 9", "Microsoft", "1399.99"),
    ("ThinkPad X1 Carbon", "Lenovo", "1199.99"),
];

/// Fills an empty catalog with sample products. Returns how many were added.
pub fn seed_catalog<R: ProductRepository>(
    service: &ProductService<R>,
) -> Result<usize, DomainError> {
    let probe = ProductQuery {
        page_size: 1,
        ..Default::default()
    };
    if service.list_products(probe)?.total_count > 0 {
        log::info!("Catalog already populated, skipping seed data");
        return Ok(0);
    }

    for (name, brand, price) in SAMPLE_PRODUCTS {
        let price = BigDecimal::from_str(price)
            .map_err(|e| DomainError::Internal(format!("invalid seed price '{price}': {e}")))?;
        service.create_product(CreateProductDto {
            name: name.to_string(),
            brand: brand.to_string(),
            price,
        })?;
    }

    log::info!("Database seeded with {} products", SAMPLE_PRODUCTS.len());
    Ok(SAMPLE_PRODUCTS.len())
}
