//! Field rules shared by the request DTOs.

use std::borrow::Cow;

use bigdecimal::{BigDecimal, Zero};
use validator::ValidationError;

/// Prices must stay strictly below this value.
pub const PRICE_CEILING: i64 = 1_000_000;
pub const MAX_PAGE_SIZE: i64 = 100;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Smallest accepted price, one cent.
pub fn minimum_price() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Value is required"));
    }
    Ok(())
}

pub fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price <= BigDecimal::zero() {
        return Err(error("price_not_positive", "Price must be greater than 0"));
    }
    if *price < minimum_price() {
        return Err(error("price_too_small", "Price must be at least 0.01"));
    }
    if *price >= BigDecimal::from(PRICE_CEILING) {
        return Err(error(
            "price_too_large",
            "Price must be less than 1,000,000",
        ));
    }
    Ok(())
}

pub fn validate_page_number(page_number: i64) -> Result<(), ValidationError> {
    if page_number <= 0 {
        return Err(error(
            "page_number_range",
            "Page number must be greater than 0",
        ));
    }
    Ok(())
}

pub fn validate_page_size(page_size: i64) -> Result<(), ValidationError> {
    if page_size <= 0 {
        return Err(error("page_size_range", "Page size must be greater than 0"));
    }
    if page_size > MAX_PAGE_SIZE {
        return Err(error(
            "page_size_range",
            "Page size must be less than or equal to 100",
        ));
    }
    Ok(())
}

pub fn validate_price_bound(
    bound: &BigDecimal,
    message: &'static str,
) -> Result<(), ValidationError> {
    if *bound < BigDecimal::zero() {
        return Err(error("price_bound_negative", message));
    }
    Ok(())
}

pub fn validate_price_order(min: &BigDecimal, max: &BigDecimal) -> Result<(), ValidationError> {
    if min > max {
        return Err(error(
            "price_range_order",
            "Minimum price must be less than or equal to maximum price",
        ));
    }
    Ok(())
}
