use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Product with name '{name}' and brand '{brand}' already exists.")]
    Duplicate { name: String, brand: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn duplicate(name: &str, brand: &str) -> Self {
        DomainError::Duplicate {
            name: name.to_string(),
            brand: brand.to_string(),
        }
    }
}
