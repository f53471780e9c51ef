//! Phone number domain primitive.
//!
//! Phone numbers are stored digits-only. Input may carry separators (`-`,
//! spaces) which are stripped during validation; anything else is rejected so
//! the uniqueness constraint on the `users.phone` column compares normalised
//! values.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MIN_DIGITS: usize = 9;
const MAX_DIGITS: usize = 14;

/// Validation errors returned by [`PhoneNumber::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneValidationError {
    /// The input was empty after stripping separators.
    Empty,
    /// The input contained characters other than digits and separators.
    InvalidCharacters,
    /// The digit count fell outside the accepted range.
    BadLength {
        /// Minimum accepted digit count.
        min: usize,
        /// Maximum accepted digit count.
        max: usize,
    },
}

impl fmt::Display for PhoneValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "phone number must not be empty"),
            Self::InvalidCharacters => {
                write!(f, "phone number may only contain digits and separators")
            }
            Self::BadLength { min, max } => {
                write!(f, "phone number must have between {min} and {max} digits")
            }
        }
    }
}

impl std::error::Error for PhoneValidationError {}

/// Normalised, digits-only phone number.
///
/// # Examples
/// ```
/// use backend::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("010-1234-5678").expect("valid phone");
/// assert_eq!(phone.as_str(), "01012345678");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "01012345678")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and normalise a phone number.
    pub fn new(input: impl AsRef<str>) -> Result<Self, PhoneValidationError> {
        let mut digits = String::new();
        for ch in input.as_ref().chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                '-' | ' ' | '+' => {}
                _ => return Err(PhoneValidationError::InvalidCharacters),
            }
        }
        if digits.is_empty() {
            return Err(PhoneValidationError::Empty);
        }
        if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
            return Err(PhoneValidationError::BadLength {
                min: MIN_DIGITS,
                max: MAX_DIGITS,
            });
        }
        Ok(Self(digits))
    }

    /// Access the normalised digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01012345678", "01012345678")]
    #[case("010-1234-5678", "01012345678")]
    #[case("+82 10 1234 5678", "821012345678")]
    fn accepts_and_normalises(#[case] input: &str, #[case] expected: &str) {
        let phone = PhoneNumber::new(input).expect("valid phone");
        assert_eq!(phone.as_str(), expected);
    }

    #[rstest]
    #[case("", PhoneValidationError::Empty)]
    #[case("--  ", PhoneValidationError::Empty)]
    #[case("0101234abcd", PhoneValidationError::InvalidCharacters)]
    #[case("0101234", PhoneValidationError::BadLength { min: MIN_DIGITS, max: MAX_DIGITS })]
    #[case("010123456789012345", PhoneValidationError::BadLength { min: MIN_DIGITS, max: MAX_DIGITS })]
    fn rejects_invalid_input(#[case] input: &str, #[case] expected: PhoneValidationError) {
        assert_eq!(PhoneNumber::new(input), Err(expected));
    }

    #[test]
    fn serde_round_trips_normalised_value() {
        let phone = PhoneNumber::new("010-1234-5678").expect("valid phone");
        let json = serde_json::to_string(&phone).expect("serialize");
        assert_eq!(json, "\"01012345678\"");
        let back: PhoneNumber = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, phone);
    }
}
