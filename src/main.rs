use std::io;

use actix_web::web;
use dotenvy::dotenv;
use product_catalog::seed::seed_catalog;
use product_catalog::{build_repository, build_server, AppConfig, ProductService};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;
    let repo = build_repository(&config).map_err(io::Error::other)?;
    let service = web::Data::new(ProductService::new(repo));

    if config.seed_data {
        seed_catalog(service.get_ref()).map_err(io::Error::other)?;
    }

    log::info!(
        "Starting server at http://{}:{} (docs at /swagger-ui/)",
        config.host,
        config.port
    );

    build_server(service, &config.host, config.port)?.await
}
