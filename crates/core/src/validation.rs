//! Boundary checks applied to incoming payloads.

use crate::error::CoreError;
use crate::types::Amount;

/// Validate that a monetary amount is strictly positive.
///
/// Returns a `CoreError::Validation` naming the field otherwise.
pub fn validate_positive_amount(value: Amount, name: &str) -> Result<(), CoreError> {
    if value <= Amount::ZERO {
        return Err(CoreError::Validation(format!(
            "{name} must be greater than 0, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_values() {
        assert!(validate_positive_amount(Amount::new(1, 2), "amount").is_ok());
        assert!(validate_positive_amount(Amount::from(10_001), "amount").is_ok());
    }

    #[test]
    fn rejects_zero() {
        assert!(validate_positive_amount(Amount::ZERO, "amount").is_err());
    }

    #[test]
    fn rejects_negative_and_names_field() {
        let err = validate_positive_amount(Amount::from(-5), "amount").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: amount must be greater than 0, got -5"
        );
    }
}
