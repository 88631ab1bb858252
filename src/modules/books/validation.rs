//! Field checks for book payloads.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::models::{Book, BookPayload};
use crate::error::{FieldError, ServiceError};

/// Largest price with at most 8 integer digits, exclusive.
const PRICE_LIMIT: i64 = 100_000_000;
const PRICE_MAX_SCALE: u32 = 2;

/// Check every field of a book payload and build the typed record.
///
/// All violations are reported together.
pub fn validate_book(payload: &BookPayload) -> Result<Book, ServiceError> {
    let mut errors = Vec::new();

    let isbn = required(payload, &payload.isbn, "ISBN", "ISBN", &mut errors);
    let title = required(payload, &payload.title, "title", "Title", &mut errors);
    let author = required(payload, &payload.author, "Author", "Author", &mut errors);
    let description = required(
        payload,
        &payload.description,
        "description",
        "Description",
        &mut errors,
    );
    let genre = required(payload, &payload.genre, "genre", "Genre", &mut errors);
    let price = if payload.is_malformed("price") {
        errors.push(FieldError::new("price", "Price must be a number"));
        None
    } else {
        price(payload.price.as_deref(), &mut errors)
    };
    let quantity = if payload.is_malformed("quantity") {
        errors.push(FieldError::new("quantity", "Quantity must be a whole number"));
        None
    } else {
        quantity(payload.quantity.as_deref(), &mut errors)
    };

    match (isbn, title, author, description, genre, price, quantity) {
        (
            Some(isbn),
            Some(title),
            Some(author),
            Some(description),
            Some(genre),
            Some(price),
            Some(quantity),
        ) if errors.is_empty() => Ok(Book {
            isbn,
            title,
            author,
            description,
            genre,
            price,
            quantity,
        }),
        _ => Err(ServiceError::Validation(errors)),
    }
}

fn required(
    payload: &BookPayload,
    value: &Option<String>,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    if payload.is_malformed(field) {
        errors.push(FieldError::new(field, format!("{label} must be a string")));
        return None;
    }

    match value {
        Some(v) if !v.trim().is_empty() => Some(v.clone()),
        _ => {
            errors.push(FieldError::new(field, format!("{label} is mandatory")));
            None
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Numeric text that does not fit in a `Decimal`.
fn out_of_range(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn price(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<Decimal> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        errors.push(FieldError::new("price", "Price is mandatory"));
        return None;
    };

    let Some(price) = parse_decimal(raw) else {
        let message = match out_of_range(raw) {
            Some(n) if n < 0.0 => "Price must be greater than or equal to 0",
            Some(_) => "Price must have at most 8 integer digits and 2 decimal places",
            None => "Price must be a number",
        };
        errors.push(FieldError::new("price", message));
        return None;
    };

    let price = price.normalize();
    if price.is_sign_negative() && !price.is_zero() {
        errors.push(FieldError::new(
            "price",
            "Price must be greater than or equal to 0",
        ));
        return None;
    }
    if price.scale() > PRICE_MAX_SCALE || price.trunc() >= Decimal::from(PRICE_LIMIT) {
        errors.push(FieldError::new(
            "price",
            "Price must have at most 8 integer digits and 2 decimal places",
        ));
        return None;
    }

    Some(price)
}

/// An absent quantity means none in stock.
fn quantity(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<i32> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Some(0);
    };

    let whole = match raw.parse::<i32>() {
        Ok(q) => Some(q),
        Err(_) => parse_decimal(raw)
            .filter(|d| d.fract().is_zero())
            .and_then(|d| d.to_i32()),
    };

    match whole {
        Some(q) if q >= 0 => Some(q),
        Some(_) => {
            errors.push(FieldError::new(
                "quantity",
                "Quantity must be greater than or equal to 0",
            ));
            None
        }
        None => {
            errors.push(FieldError::new("quantity", "Quantity must be a whole number"));
            None
        }
    }
}
