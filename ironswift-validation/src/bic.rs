/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Business Identifier Code (BIC) validation.
//!
//! This module provides:
//! - [`Bic`]: A structurally split BIC with its validation rules
//! - [`BicError`]: The reason a BIC was rejected
//!
//! Layout: `BBBB CC LL [T] [XXX]`, that is a 4-letter institution code, a
//! 2-letter ISO country code, a 2-character location code, an optional logical
//! terminal identifier (12-character form only) and an optional 3-character
//! branch code.

use crate::country::is_valid_country_code;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a BIC without branch code.
pub const BIC8_LEN: usize = 8;

/// Length of a BIC with branch code.
pub const BIC11_LEN: usize = 11;

/// Length of a logical terminal address (BIC8, terminal identifier, branch).
pub const LT_ADDRESS_LEN: usize = 12;

/// Branch code used when none is given.
pub const DEFAULT_BRANCH: &str = "XXX";

/// Reasons a BIC fails validation. Checks run in declaration order and the
/// first failure is reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BicError {
    /// Length is not 8, 11 or 12.
    #[error("invalid BIC length {0}: expected 8, 11 or 12 characters")]
    InvalidLength(usize),

    /// Institution code is not four uppercase letters.
    #[error("institution code must be four uppercase letters")]
    InvalidBankCodeCharset,

    /// Country code is not two uppercase letters.
    #[error("country code must be two uppercase letters")]
    InvalidCountryCodeCharset,

    /// Country code is not an assigned ISO 3166 code.
    #[error("unknown country code")]
    InvalidCountryCode,

    /// Location code is not two uppercase letters or digits.
    #[error("location code must be two uppercase letters or digits")]
    InvalidLocationCodeCharset,

    /// Terminal identifier or branch code has characters other than uppercase
    /// letters and digits.
    #[error("branch code must be uppercase letters or digits")]
    InvalidBranchCodeCharset,
}

#[inline]
fn is_upper_alnum(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

#[inline]
fn is_upper_alpha(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_uppercase())
}

/// A Business Identifier Code.
///
/// Construction never fails: [`Bic::parse`] only trims surrounding whitespace
/// and the accessors return `None` for parts the value is too short to hold.
/// Call [`Bic::validate`] for the structural check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bic {
    value: String,
}

impl Bic {
    /// Wraps `value` without validating it.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// The BIC as given.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Institution (bank) code, characters 1 to 4.
    #[must_use]
    pub fn institution(&self) -> Option<&str> {
        self.value.get(0..4)
    }

    /// ISO country code, characters 5 and 6.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.value.get(4..6)
    }

    /// Location code, characters 7 and 8.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.value.get(6..8)
    }

    /// Logical terminal identifier, present only in the 12-character form.
    #[must_use]
    pub fn terminal(&self) -> Option<char> {
        if self.value.len() == LT_ADDRESS_LEN {
            self.value.chars().nth(BIC8_LEN)
        } else {
            None
        }
    }

    /// Branch code, when one is present.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        match self.value.len() {
            BIC11_LEN => self.value.get(8..11),
            LT_ADDRESS_LEN => self.value.get(9..12),
            _ => None,
        }
    }

    /// Branch code, or `XXX` for the primary office.
    #[must_use]
    pub fn branch_or_default(&self) -> &str {
        self.branch().unwrap_or(DEFAULT_BRANCH)
    }

    /// The first eight characters.
    #[must_use]
    pub fn bic8(&self) -> Option<&str> {
        self.value.get(..BIC8_LEN)
    }

    /// The eleven-character form: BIC8 followed by the branch code.
    #[must_use]
    pub fn bic11(&self) -> Option<String> {
        self.bic8()
            .map(|bic8| format!("{bic8}{}", self.branch_or_default()))
    }

    /// Returns true for a test & training BIC, whose second location character
    /// is `0`.
    ///
    /// This is a classification of the value and does not imply it is valid:
    /// `FOOOOO00AB` is test & training yet [`Bic::validate`] rejects it with
    /// [`BicError::InvalidLength`]`(10)`.
    #[must_use]
    pub fn is_test_and_training(&self) -> bool {
        self.value.as_bytes().get(7) == Some(&b'0')
    }

    /// Returns true for a connected BIC that is not a test & training one.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.value.len() >= BIC8_LEN && !self.is_test_and_training()
    }

    /// Checks the structure of the BIC.
    ///
    /// # Errors
    /// Returns the first failing rule, checked in this order: length,
    /// institution code, country code characters, country code assignment,
    /// location code, terminal identifier and branch code.
    pub fn validate(&self) -> Result<(), BicError> {
        let len = self.value.chars().count();
        if !matches!(len, BIC8_LEN | BIC11_LEN | LT_ADDRESS_LEN) || len != self.value.len() {
            return Err(BicError::InvalidLength(len));
        }
        let value = self.value.as_str();
        if !is_upper_alpha(&value[0..4]) {
            return Err(BicError::InvalidBankCodeCharset);
        }
        let country = &value[4..6];
        if !is_upper_alpha(country) {
            return Err(BicError::InvalidCountryCodeCharset);
        }
        if !is_valid_country_code(country) {
            return Err(BicError::InvalidCountryCode);
        }
        if !is_upper_alnum(&value[6..8]) {
            return Err(BicError::InvalidLocationCodeCharset);
        }
        if !is_upper_alnum(&value[8..]) {
            return Err(BicError::InvalidBranchCodeCharset);
        }
        Ok(())
    }

    /// Returns true if [`Bic::validate`] succeeds.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for Bic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Bic {
    type Err = BicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bic = Self::parse(s);
        bic.validate()?;
        Ok(bic)
    }
}

impl AsRef<str> for Bic {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Validates a BIC.
///
/// # Errors
/// See [`Bic::validate`].
///
/// # Example
/// ```
/// use ironswift_validation::{BicError, validate_bic};
///
/// assert!(validate_bic("DEUTDEFFXXX").is_ok());
/// assert_eq!(validate_bic("FOOOAAHU"), Err(BicError::InvalidCountryCode));
/// ```
pub fn validate_bic(value: &str) -> Result<(), BicError> {
    Bic::parse(value).validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bic8_live() {
        let bic = Bic::parse("FOOOESHU");
        assert_eq!(bic.validate(), Ok(()));
        assert!(!bic.is_test_and_training());
        assert!(bic.is_live());
        assert_eq!(bic.institution(), Some("FOOO"));
        assert_eq!(bic.country(), Some("ES"));
        assert_eq!(bic.location(), Some("HU"));
        assert_eq!(bic.branch(), None);
        assert_eq!(bic.branch_or_default(), "XXX");
        assert_eq!(bic.bic11().as_deref(), Some("FOOOESHUXXX"));
    }

    #[test]
    fn test_bad_country_code() {
        assert_eq!(validate_bic("FOOOAAHU"), Err(BicError::InvalidCountryCode));
        assert_eq!(validate_bic("FOOOOOHU"), Err(BicError::InvalidCountryCode));
    }

    #[test]
    fn test_test_and_training_classification_is_independent_of_validity() {
        let bic = Bic::parse("FOOOOO00AB");
        assert!(bic.is_test_and_training());
        assert!(!bic.is_live());
        assert_eq!(bic.validate(), Err(BicError::InvalidLength(10)));

        let valid = Bic::parse("FOOOES20XXX");
        assert!(valid.is_test_and_training());
        assert!(valid.is_valid());
    }

    #[test]
    fn test_bic11_and_lt_address() {
        let bic11 = Bic::parse("DEUTDEFF500");
        assert!(bic11.is_valid());
        assert_eq!(bic11.branch(), Some("500"));
        assert_eq!(bic11.terminal(), None);
        assert_eq!(bic11.bic8(), Some("DEUTDEFF"));

        let lt = Bic::parse("BANKBEBBAXXX");
        assert!(lt.is_valid());
        assert_eq!(lt.terminal(), Some('A'));
        assert_eq!(lt.branch(), Some("XXX"));
        assert_eq!(lt.bic11().as_deref(), Some("BANKBEBBXXX"));
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(validate_bic(""), Err(BicError::InvalidLength(0)));
        assert_eq!(validate_bic("DEUTDEFFX"), Err(BicError::InvalidLength(9)));
        assert_eq!(validate_bic("DEU1DEFF"), Err(BicError::InvalidBankCodeCharset));
        assert_eq!(validate_bic("deutDEFF"), Err(BicError::InvalidBankCodeCharset));
        assert_eq!(validate_bic("DEUTD3FF"), Err(BicError::InvalidCountryCodeCharset));
        assert_eq!(validate_bic("DEUTDEf1"), Err(BicError::InvalidLocationCodeCharset));
        assert_eq!(validate_bic("DEUTDEFF50-"), Err(BicError::InvalidBranchCodeCharset));
        assert_eq!(validate_bic("DEUTDEFFa500"), Err(BicError::InvalidBranchCodeCharset));
    }

    #[test]
    fn test_parse_trims_and_from_str_validates() {
        let bic: Bic = " DEUTDEFF ".parse().unwrap();
        assert_eq!(bic.to_string(), "DEUTDEFF");
        assert_eq!("XXXX".parse::<Bic>(), Err(BicError::InvalidLength(4)));
    }

    #[test]
    fn test_non_ascii_is_rejected_by_length() {
        assert_eq!(validate_bic("DEUTDEFFÄ"), Err(BicError::InvalidLength(9)));
        assert!(matches!(
            validate_bic("DEUTDEFÄ"),
            Err(BicError::InvalidLength(8))
        ));
    }
}
