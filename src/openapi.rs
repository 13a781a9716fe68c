use utoipa::OpenApi;

use crate::application::dto::{CreateProductDto, ProductDto, UpdateProductDto};
use crate::errors::{ErrorBody, FieldError, ValidationErrorBody};
use crate::handlers::products;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Catalog API",
        version = "1.0.0",
        description = "CRUD operations over a product catalog with filtering, pagination and validation."
    ),
    paths(
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
    ),
    components(schemas(
        ProductDto,
        CreateProductDto,
        UpdateProductDto,
        ErrorBody,
        FieldError,
        ValidationErrorBody,
    )),
    tags((name = "products", description = "Product catalog management"))
)]
pub struct ApiDoc;
