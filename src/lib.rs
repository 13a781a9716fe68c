pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod middleware;
pub mod openapi;
pub mod schema;
pub mod seed;

use std::sync::Arc;

use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::product_service::ProductService;
pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use handlers::products::SharedProductService;

use domain::errors::DomainError;
use domain::ports::ProductRepository;
use errors::AppError;
use handlers::products;
use infrastructure::memory_repo::InMemoryProductRepository;
use infrastructure::product_repo::DieselProductRepository;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("failed to run migrations: {e}")))?;
    Ok(())
}

/// Postgres-backed repository when `DATABASE_URL` is configured (migrations
/// are applied first), otherwise an in-memory one.
pub fn build_repository(config: &AppConfig) -> Result<Arc<dyn ProductRepository>, DomainError> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url)?;
            run_migrations(&pool)?;
            log::info!("Using PostgreSQL product store");
            Ok(Arc::new(DieselProductRepository::new(pool)))
        }
        None => {
            log::info!("DATABASE_URL not set, using in-memory product store");
            Ok(Arc::new(InMemoryProductRepository::new()))
        }
    }
}

/// Registers the product routes, payload error handling and API docs.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope(products::PRODUCTS_PATH)
            .route("", web::get().to(products::list_products))
            .route("", web::post().to(products::create_product))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    )
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
            .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or spawning) the returned
/// server.
pub fn build_server(
    service: web::Data<SharedProductService>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(from_fn(middleware::audit_log))
            .wrap(from_fn(middleware::request_context))
            .wrap(Logger::new(r#"%a "%r" %s %b %Dms request_id=%{x-request-id}o"#))
            .configure(configure_api)
    })
    .bind((host.to_string(), port))?
    .run())
}
