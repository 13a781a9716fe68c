pub mod memory_repo;
pub mod models;
pub mod product_repo;
