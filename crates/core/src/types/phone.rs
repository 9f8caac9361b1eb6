//! Customer phone number.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why an input string is not an acceptable [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("phone number is required")]
    Empty,
    #[error("phone number may only contain digits, separators and a leading +")]
    InvalidCharacter,
    #[error("phone number must have between {min} and {max} digits")]
    DigitCount { min: usize, max: usize },
}

/// A contact number for delivery, kept as the customer typed it.
///
/// Accepts local (`0300 1234567`, `(0300) 1234567`) and international
/// (`+92 300 1234567`) formats; only the digit count is checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_DIGITS: usize = 7;
    const MAX_DIGITS: usize = 15;

    /// Characters allowed between digits.
    pub const SEPARATORS: &'static [char] = &[' ', '-', '.', '(', ')'];

    /// Parse and validate a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneNumberError`] when the input is empty, contains letters
    /// or punctuation other than [`Self::SEPARATORS`], or has too few/many digits.
    pub fn parse(input: &str) -> Result<Self, PhoneNumberError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        let body = s.strip_prefix('+').unwrap_or(s);
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || Self::SEPARATORS.contains(&c))
        {
            return Err(PhoneNumberError::InvalidCharacter);
        }

        let digits = body.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneNumberError::DigitCount {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// The number as entered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
