//! Product field rules.
//!
//! Request DTOs already carry `validator` attributes; services call these
//! again before touching the store so a record can never hold an empty name
//! or a non-positive price regardless of how it was submitted.

use rust_decimal::Decimal;

use crate::error::FieldError;

/// Maximum product name length in characters.
pub const NAME_MAX_LEN: usize = 200;
/// Maximum product description length in characters.
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Trim and check a product name. Returns the trimmed name.
pub fn check_name(name: &str) -> Result<String, FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new("name", "Product name is required"));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(FieldError::new(
            "name",
            format!("Product name must be at most {NAME_MAX_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim and check a product description. Returns the trimmed description.
pub fn check_description(description: &str) -> Result<String, FieldError> {
    let trimmed = description.trim();
    if trimmed.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(FieldError::new(
            "description",
            format!("Description must be at most {DESCRIPTION_MAX_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Prices are stored as `NUMERIC(12, 2)`.
pub const PRICE_SCALE: u32 = 2;
/// Largest price the column holds: 9 999 999 999.99.
pub const PRICE_MAX: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, PRICE_SCALE);

/// A price must be strictly positive, in whole cents and within [`PRICE_MAX`].
pub fn check_price(price: Decimal) -> Result<Decimal, FieldError> {
    if price <= Decimal::ZERO {
        return Err(FieldError::new("price", "Price must be a positive number"));
    }
    let price = price.normalize();
    if price.scale() > PRICE_SCALE {
        return Err(FieldError::new(
            "price",
            format!("Price must have at most {PRICE_SCALE} decimal places"),
        ));
    }
    if price > PRICE_MAX {
        return Err(FieldError::new(
            "price",
            format!("Price must be at most {PRICE_MAX}"),
        ));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(check_name("  Widget ").unwrap(), "Widget");
    }

    #[test]
    fn blank_name_rejected() {
        let err = check_name("   ").unwrap_err();
        assert_eq!(err.path, "name");
    }

    #[test]
    fn long_name_rejected() {
        let name = "x".repeat(NAME_MAX_LEN + 1);
        assert_matches!(check_name(&name), Err(FieldError { .. }));
        assert!(check_name(&"x".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn long_description_rejected() {
        let description = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        let err = check_description(&description).unwrap_err();
        assert_eq!(err.path, "description");
    }

    #[test]
    fn price_must_be_positive() {
        assert!(check_price(Decimal::new(999, 2)).is_ok());
        assert_eq!(check_price(Decimal::ZERO).unwrap_err().path, "price");
        assert!(check_price(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn sub_cent_prices_rejected() {
        let err = check_price(Decimal::new(1, 3)).unwrap_err();
        assert_eq!(err.path, "price");
        assert!(err.message.contains("2 decimal places"));
        assert!(check_price(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        assert_eq!(check_price(Decimal::new(99_900, 4)).unwrap(), Decimal::new(999, 2));
    }

    #[test]
    fn price_bounded_by_column_range() {
        assert_eq!(PRICE_MAX, Decimal::new(999_999_999_999, 2));
        assert!(check_price(PRICE_MAX).is_ok());
        assert_eq!(
            check_price(Decimal::new(100_000_000_000, 0)).unwrap_err().path,
            "price"
        );
    }
}
