use std::sync::Arc;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::application::dto::{CreateProductDto, ProductDto, ProductQueryDto, UpdateProductDto};
use crate::application::product_service::ProductService;
use crate::domain::ports::ProductRepository;
use crate::domain::product::PageResult;
use crate::errors::{AppError, ErrorBody, ValidationErrorBody};

pub type SharedProductService = ProductService<Arc<dyn ProductRepository>>;

pub const PRODUCTS_PATH: &str = "/api/products";

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
///
/// Lists products matching the optional filters, sorted by name then brand.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQueryDto),
    responses(
        (status = 200, description = "Paginated list of products", body = PageResult<ProductDto>),
        (status = 400, description = "Invalid query parameters", body = ValidationErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    tag = "products"
)]
pub async fn list_products(
    service: web::Data<SharedProductService>,
    query: web::Query<ProductQueryDto>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let page = web::block(move || service.list_products(query.into())).await??;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    tag = "products"
)]
pub async fn get_product(
    service: web::Data<SharedProductService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = web::block(move || service.get_product(id)).await??;

    match product {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(AppError::product_not_found(id)),
    }
}

/// POST /api/products
///
/// Creates a product. The (name, brand) pair must not already exist,
/// ignoring case.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto,
            headers(("Location" = String, description = "URL of the new product"))),
        (status = 400, description = "Invalid payload", body = ValidationErrorBody),
        (status = 409, description = "A product with this name and brand exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<SharedProductService>,
    body: web::Json<CreateProductDto>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let product = web::block(move || service.create_product(body)).await??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("{PRODUCTS_PATH}/{}", product.id)))
        .json(product))
}

/// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id"),
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Invalid payload", body = ValidationErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 409, description = "Another product has this name and brand", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    tag = "products"
)]
pub async fn update_product(
    service: web::Data<SharedProductService>,
    path: web::Path<i32>,
    body: web::Json<UpdateProductDto>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let product = web::block(move || service.update_product(id, body)).await??;

    match product {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(AppError::product_not_found(id)),
    }
}

/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
    ),
    tag = "products"
)]
pub async fn delete_product(
    service: web::Data<SharedProductService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let deleted = web::block(move || service.delete_product(id)).await??;

    if deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::product_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::App;
    use bigdecimal::BigDecimal;
    use serde_json::{json, Value};

    use super::*;
    use crate::configure_api;
    use crate::infrastructure::memory_repo::InMemoryProductRepository;

    fn service() -> web::Data<SharedProductService> {
        let repo: Arc<dyn ProductRepository> = Arc::new(InMemoryProductRepository::new());
        web::Data::new(ProductService::new(repo))
    }

    macro_rules! app {
        ($service:expr) => {
            actix_test::init_service(App::new().app_data($service).configure(configure_api)).await
        };
    }

    fn product_json(name: &str, brand: &str, price: &str) -> Value {
        json!({ "name": name, "brand": brand, "price": price })
    }

    #[actix_web::test]
    async fn create_returns_201_with_location_and_body() {
        let app = app!(service());

        let req = actix_test::TestRequest::post()
            .uri("/api/products")
            .set_json(product_json("Phone", "Acme", "100"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(&b"/api/products/1"[..])
        );
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Phone");
        assert_eq!(body["price"], "100");
        assert_eq!(body["createdAt"], body["updatedAt"]);
    }

    #[actix_web::test]
    async fn create_accepts_numeric_price() {
        let app = app!(service());

        let req = actix_test::TestRequest::post()
            .uri("/api/products")
            .set_json(json!({ "name": "Phone", "brand": "Acme", "price": 25 }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn duplicate_create_returns_409_with_message() {
        let app = app!(service());

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = actix_test::TestRequest::post()
                .uri("/api/products")
                .set_json(product_json("Phone", "Acme", "100"))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);

            if expected == StatusCode::CONFLICT {
                let body: Value = actix_test::read_body_json(resp).await;
                assert_eq!(
                    body["message"],
                    "Product with name 'Phone' and brand 'Acme' already exists."
                );
            }
        }
    }

    #[actix_web::test]
    async fn invalid_create_returns_400_with_field_errors() {
        let app = app!(service());

        let req = actix_test::TestRequest::post()
            .uri("/api/products")
            .set_json(product_json("", "Acme", "0"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .expect("errors array")
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"price"));
        assert!(!fields.contains(&"brand"));
    }

    #[actix_web::test]
    async fn missing_name_is_reported_as_field_error() {
        let app = app!(service());

        let req = actix_test::TestRequest::post()
            .uri("/api/products")
            .set_json(json!({ "brand": "Acme", "price": "10" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        let errors = body["errors"].as_array().expect("errors array");
        assert!(errors
            .iter()
            .any(|e| e["field"] == "name" && e["message"] == "Name is required"));
        assert!(errors.iter().all(|e| e["field"] == "name"));
    }

    #[actix_web::test]
    async fn malformed_json_returns_400() {
        let app = app!(service());

        let req = actix_test::TestRequest::post()
            .uri("/api/products")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"name\": ")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn get_unknown_product_returns_404() {
        let app = app!(service());

        let req = actix_test::TestRequest::get()
            .uri("/api/products/42")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["message"], "Product with ID 42 not found.");
    }

    #[actix_web::test]
    async fn update_unknown_product_returns_404() {
        let app = app!(service());

        let req = actix_test::TestRequest::put()
            .uri("/api/products/5")
            .set_json(product_json("Phone", "Acme", "10"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn update_colliding_with_other_product_returns_409() {
        let svc = service();
        svc.create_product(CreateProductDto {
            name: "Phone".to_string(),
            brand: "Acme".to_string(),
            price: BigDecimal::from(100),
        })
        .expect("seed phone");
        svc.create_product(CreateProductDto {
            name: "Tablet".to_string(),
            brand: "Acme".to_string(),
            price: BigDecimal::from(200),
        })
        .expect("seed tablet");
        let app = app!(svc);

        let req = actix_test::TestRequest::put()
            .uri("/api/products/2")
            .set_json(product_json("phone", "acme", "150"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn delete_returns_204_then_404() {
        let app = app!(service());

        let req = actix_test::TestRequest::post()
            .uri("/api/products")
            .set_json(product_json("Phone", "Acme", "100"))
            .to_request();
        actix_test::call_service(&app, req).await;

        for expected in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
            let req = actix_test::TestRequest::delete()
                .uri("/api/products/1")
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn list_filters_and_echoes_paging() {
        let app = app!(service());

        let seed = [("B", "Acme", "10"), ("A", "Acme", "5"), ("C", "Other", "7")];
        for (name, brand, price) in seed {
            let req = actix_test::TestRequest::post()
                .uri("/api/products")
                .set_json(product_json(name, brand, price))
                .to_request();
            actix_test::call_service(&app, req).await;
        }

        let req = actix_test::TestRequest::get()
            .uri("/api/products?brand=acme&pageNumber=1&pageSize=1")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalCount"], 2);
        assert_eq!(body["pageNumber"], 1);
        assert_eq!(body["pageSize"], 1);
        assert_eq!(body["items"][0]["name"], "A");
    }

    #[actix_web::test]
    async fn invalid_query_returns_400() {
        let app = app!(service());

        let req = actix_test::TestRequest::get()
            .uri("/api/products?minPrice=20&maxPrice=10&pageSize=0")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .expect("errors array")
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["minPrice", "pageSize"]);
    }

    #[actix_web::test]
    async fn unparseable_query_returns_400() {
        let app = app!(service());

        let req = actix_test::TestRequest::get()
            .uri("/api/products?pageNumber=first")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
