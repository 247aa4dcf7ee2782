/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! International Bank Account Number (IBAN) validation.
//!
//! This module provides:
//! - [`Iban`]: An account number in electronic form with its validation pipeline
//! - [`IbanError`]: The stage at which an IBAN was rejected
//! - The per-country BBAN structure table in registry notation
//!
//! Validation is fail-fast: the stages run in the order of the [`IbanError`]
//! variants and the first failing stage is reported.

use crate::country::is_valid_country_code;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons an IBAN fails validation, in pipeline order.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum IbanError {
    /// Nothing to validate.
    #[error("IBAN is empty")]
    Empty,

    /// Shorter than the two-letter country code.
    #[error("missing country code")]
    MissingCountryCode,

    /// Country code is not two uppercase letters.
    #[error("country code must be two uppercase letters")]
    InvalidCountryCodeCharset,

    /// Country code is not an assigned ISO 3166 code.
    #[error("unknown country code")]
    InvalidCountryCode,

    /// No room for the two check digits.
    #[error("missing check digits")]
    MissingCheckDigits,

    /// Check digits are not two digits, or are one of the reserved values
    /// `00`, `01` and `99`.
    #[error("check digits must be two digits between 02 and 98")]
    InvalidCheckDigitsFormat,

    /// The country does not issue IBANs.
    #[error("country does not use IBAN")]
    UnsupportedCountry,

    /// Nothing follows the check digits.
    #[error("missing BBAN")]
    MissingBban,

    /// BBAN length differs from the country's format.
    #[error("invalid BBAN length: expected {expected}, found {found}")]
    InvalidBbanLength {
        /// Length required by the country.
        expected: usize,
        /// Length found.
        found: usize,
    },

    /// A numeric BBAN segment holds something other than digits.
    #[error("BBAN segment must contain digits only")]
    BbanInvalidDigits,

    /// An alphabetic BBAN segment holds something other than uppercase letters.
    #[error("BBAN segment must contain uppercase letters only")]
    BbanInvalidUpperCaseLetters,

    /// An alphanumeric BBAN segment holds something other than letters or digits.
    #[error("BBAN segment must contain letters or digits only")]
    BbanInvalidDigitsOrLetters,

    /// A character outside `0-9A-Za-z`.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    /// The MOD-97-10 check failed.
    #[error("check digits do not match")]
    InvalidCheckDigits,
}

/// BBAN structure per country, sorted by country code.
///
/// Each entry is a sequence of `<length>!<class>` segments where the class is
/// `n` (digits), `a` (uppercase letters) or `c` (letters and digits).
pub static BBAN_FORMATS: [(&str, &str); 77] = [
    ("AD", "4!n4!n12!c"),
    ("AE", "3!n16!n"),
    ("AL", "8!n16!c"),
    ("AT", "5!n11!n"),
    ("AZ", "4!a20!c"),
    ("BA", "3!n3!n8!n2!n"),
    ("BE", "3!n7!n2!n"),
    ("BG", "4!a4!n2!n8!c"),
    ("BH", "4!a14!c"),
    ("BR", "8!n5!n10!n1!a1!c"),
    ("BY", "4!c4!n16!c"),
    ("CH", "5!n12!c"),
    ("CR", "4!n14!n"),
    ("CY", "3!n5!n16!c"),
    ("CZ", "4!n6!n10!n"),
    ("DE", "8!n10!n"),
    ("DK", "4!n9!n1!n"),
    ("DO", "4!c20!n"),
    ("EE", "2!n2!n11!n1!n"),
    ("EG", "4!n4!n17!n"),
    ("ES", "4!n4!n1!n1!n10!n"),
    ("FI", "3!n11!n"),
    ("FO", "4!n9!n1!n"),
    ("FR", "5!n5!n11!c2!n"),
    ("GB", "4!a6!n8!n"),
    ("GE", "2!a16!n"),
    ("GI", "4!a15!c"),
    ("GL", "4!n9!n1!n"),
    ("GR", "3!n4!n16!c"),
    ("GT", "4!c20!c"),
    ("HR", "7!n10!n"),
    ("HU", "3!n4!n1!n15!n1!n"),
    ("IE", "4!a6!n8!n"),
    ("IL", "3!n3!n13!n"),
    ("IQ", "4!a3!n12!n"),
    ("IS", "4!n2!n6!n10!n"),
    ("IT", "1!a5!n5!n12!c"),
    ("JO", "4!a4!n18!c"),
    ("KW", "4!a22!c"),
    ("KZ", "3!n13!c"),
    ("LB", "4!n20!c"),
    ("LC", "4!a24!c"),
    ("LI", "5!n12!c"),
    ("LT", "5!n11!n"),
    ("LU", "3!n13!c"),
    ("LV", "4!a13!c"),
    ("MC", "5!n5!n11!c2!n"),
    ("MD", "2!c18!c"),
    ("ME", "3!n13!n2!n"),
    ("MK", "3!n10!c2!n"),
    ("MR", "5!n5!n11!n2!n"),
    ("MT", "4!a5!n18!c"),
    ("MU", "4!a2!n2!n12!n3!n3!a"),
    ("NL", "4!a10!n"),
    ("NO", "4!n6!n1!n"),
    ("PK", "4!a16!c"),
    ("PL", "8!n16!n"),
    ("PS", "4!a21!c"),
    ("PT", "4!n4!n11!n2!n"),
    ("QA", "4!a21!c"),
    ("RO", "4!a16!c"),
    ("RS", "3!n13!n2!n"),
    ("SA", "2!n18!c"),
    ("SC", "4!a2!n2!n16!n3!a"),
    ("SE", "3!n16!n1!n"),
    ("SI", "5!n8!n2!n"),
    ("SK", "4!n6!n10!n"),
    ("SM", "1!a5!n5!n12!c"),
    ("ST", "4!n4!n11!n2!n"),
    ("SV", "4!a20!n"),
    ("TL", "3!n14!n2!n"),
    ("TN", "2!n3!n13!n2!n"),
    ("TR", "5!n1!n16!c"),
    ("UA", "6!n19!c"),
    ("VA", "3!n15!n"),
    ("VG", "4!a16!n"),
    ("XK", "4!n10!n2!n"),
];

/// Character class of a BBAN segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digits,
    UpperCaseLetters,
    DigitsOrLetters,
}

impl CharClass {
    const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'n' => Some(Self::Digits),
            b'a' => Some(Self::UpperCaseLetters),
            b'c' => Some(Self::DigitsOrLetters),
            _ => None,
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Self::Digits => c.is_ascii_digit(),
            Self::UpperCaseLetters => c.is_ascii_uppercase(),
            Self::DigitsOrLetters => c.is_alphanumeric(),
        }
    }

    const fn error(self) -> IbanError {
        match self {
            Self::Digits => IbanError::BbanInvalidDigits,
            Self::UpperCaseLetters => IbanError::BbanInvalidUpperCaseLetters,
            Self::DigitsOrLetters => IbanError::BbanInvalidDigitsOrLetters,
        }
    }
}

/// Iterates the `(length, class)` segments of a format string.
fn segments(format: &str) -> impl Iterator<Item = (usize, CharClass)> + '_ {
    format
        .split_inclusive(|c: char| matches!(c, 'n' | 'a' | 'c'))
        .filter_map(|segment| {
            let (len, class) = segment.split_once('!')?;
            let class = CharClass::from_code(*class.as_bytes().first()?)?;
            Some((len.parse().ok()?, class))
        })
}

/// Returns the BBAN format of `country`, if it issues IBANs.
#[must_use]
pub fn bban_format(country: &str) -> Option<&'static str> {
    BBAN_FORMATS
        .binary_search_by(|(code, _)| (*code).cmp(country))
        .ok()
        .map(|i| BBAN_FORMATS[i].1)
}

/// Returns the BBAN length of `country`, if it issues IBANs.
#[must_use]
pub fn bban_length(country: &str) -> Option<usize> {
    bban_format(country).map(|format| segments(format).map(|(len, _)| len).sum())
}

/// Returns true if `country` issues IBANs.
#[inline]
#[must_use]
pub fn is_supported_country(country: &str) -> bool {
    bban_format(country).is_some()
}

/// Folds a digit or letter into a running MOD-97 remainder, letters counting
/// as the two digits `10` to `35`.
#[inline]
fn mod97_step(remainder: u32, c: char) -> Option<u32> {
    let value = c.to_ascii_uppercase().to_digit(36)?;
    let shift = if value < 10 { 10 } else { 100 };
    Some((remainder * shift + value) % 97)
}

/// MOD-97 of the concatenation of `parts`, or the first offending character.
fn mod97<'a>(parts: impl IntoIterator<Item = &'a str>) -> Result<u32, IbanError> {
    parts
        .into_iter()
        .flat_map(str::chars)
        .try_fold(0, |remainder, c| {
            if !c.is_ascii_alphanumeric() {
                return Err(IbanError::InvalidCharacter(c));
            }
            mod97_step(remainder, c).ok_or(IbanError::InvalidCharacter(c))
        })
}

fn check_country(country: &str) -> Result<(), IbanError> {
    if country.chars().count() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(IbanError::InvalidCountryCodeCharset);
    }
    if !is_valid_country_code(country) {
        return Err(IbanError::InvalidCountryCode);
    }
    Ok(())
}

/// Computes the two check digits for `country` and `bban`.
///
/// # Errors
/// Returns a country code error for a malformed or unknown country and
/// [`IbanError::InvalidCharacter`] for a BBAN character outside `0-9A-Za-z`.
///
/// # Example
/// ```
/// use ironswift_validation::compute_check_digits;
///
/// assert_eq!(compute_check_digits("DE", "370400440532013000").unwrap(), "89");
/// ```
pub fn compute_check_digits(country: &str, bban: &str) -> Result<String, IbanError> {
    check_country(country)?;
    let remainder = mod97([bban, country, "00"])?;
    Ok(format!("{:02}", 98 - remainder))
}

/// An IBAN in electronic form (no spaces).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Iban {
    value: String,
}

impl Iban {
    /// Creates an IBAN from electronic or printed form, dropping whitespace.
    /// The value is not validated.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    /// The IBAN in electronic form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Country code, the first two characters.
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        self.value.get(0..2)
    }

    /// Check digits, characters 3 and 4.
    #[must_use]
    pub fn check_digits(&self) -> Option<&str> {
        self.value.get(2..4)
    }

    /// Basic Bank Account Number, everything after the check digits.
    #[must_use]
    pub fn bban(&self) -> Option<&str> {
        self.value.get(4..).filter(|bban| !bban.is_empty())
    }

    /// Printed form: groups of four characters separated by a space.
    #[must_use]
    pub fn to_printable(&self) -> String {
        let mut out = String::with_capacity(self.value.len() + self.value.len() / 4);
        for (i, c) in self.value.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                out.push(' ');
            }
            out.push(c);
        }
        out
    }

    /// Runs the validation pipeline.
    ///
    /// # Errors
    /// Returns the first failing stage as an [`IbanError`].
    pub fn validate(&self) -> Result<(), IbanError> {
        let value = self.value.as_str();
        if value.is_empty() {
            return Err(IbanError::Empty);
        }

        let mut boundaries = value.char_indices().map(|(i, _)| i).chain([value.len()]);
        let country_end = boundaries.nth(2).ok_or(IbanError::MissingCountryCode)?;
        let country = &value[..country_end];
        check_country(country)?;

        let check_end = boundaries.nth(1).ok_or(IbanError::MissingCheckDigits)?;
        let check = &value[country_end..check_end];
        if !check.bytes().all(|b| b.is_ascii_digit()) || matches!(check, "00" | "01" | "99") {
            return Err(IbanError::InvalidCheckDigitsFormat);
        }

        let format = bban_format(country).ok_or(IbanError::UnsupportedCountry)?;
        let bban = &value[check_end..];
        if bban.is_empty() {
            return Err(IbanError::MissingBban);
        }
        let expected = segments(format).map(|(len, _)| len).sum();
        let found = bban.chars().count();
        if found != expected {
            return Err(IbanError::InvalidBbanLength { expected, found });
        }

        let mut chars = bban.chars();
        for (len, class) in segments(format) {
            if !chars.by_ref().take(len).all(|c| class.accepts(c)) {
                return Err(class.error());
            }
        }

        if mod97([bban, country, check])? != 1 {
            return Err(IbanError::InvalidCheckDigits);
        }
        Ok(())
    }

    /// Returns true if [`Iban::validate`] succeeds.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let iban = Self::new(s);
        iban.validate()?;
        Ok(iban)
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Validates an IBAN given in electronic or printed form.
///
/// # Errors
/// See [`Iban::validate`].
///
/// # Example
/// ```
/// use ironswift_validation::{IbanError, validate_iban};
///
/// assert!(validate_iban("DE89 3704 0044 0532 0130 00").is_ok());
/// assert_eq!(
///     validate_iban("DE89370400440532013001"),
///     Err(IbanError::InvalidCheckDigits)
/// );
/// ```
pub fn validate_iban(value: &str) -> Result<(), IbanError> {
    Iban::new(value).validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table_is_sorted_and_well_formed() {
        assert!(BBAN_FORMATS.windows(2).all(|w| w[0].0 < w[1].0));
        for (country, format) in BBAN_FORMATS {
            assert!(is_valid_country_code(country), "{country}");
            let segment_chars: usize = segments(format)
                .map(|(len, _)| len.to_string().len() + 2)
                .sum();
            assert_eq!(segment_chars, format.len(), "{country}: {format}");
        }
    }

    #[test]
    fn test_bban_lengths() {
        assert_eq!(bban_length("DE"), Some(18));
        assert_eq!(bban_length("FR"), Some(23));
        assert_eq!(bban_length("NO"), Some(11));
        assert_eq!(bban_length("LC"), Some(28));
        assert_eq!(bban_length("US"), None);
        assert!(is_supported_country("XK"));
        assert!(!is_supported_country("US"));
    }

    #[test]
    fn test_valid_ibans() {
        for iban in [
            "DE89370400440532013000",
            "GB82WEST12345698765432",
            "FR1420041010050500013M02606",
            "NL91ABNA0417164300",
            "ES9121000418450200051332",
            "BE68539007547034",
            "CH9300762011623852957",
            "IT60X0542811101000000123456",
            "PL61109010140000071219812874",
            "NO9386011117947",
        ] {
            assert_eq!(validate_iban(iban), Ok(()), "{iban}");
        }
    }

    #[test]
    fn test_check_digit_failure_is_last_stage() {
        assert_eq!(
            validate_iban("DE89370400440532013001"),
            Err(IbanError::InvalidCheckDigits)
        );
    }

    #[test]
    fn test_pipeline_order() {
        assert_eq!(validate_iban(""), Err(IbanError::Empty));
        assert_eq!(validate_iban("   "), Err(IbanError::Empty));
        assert_eq!(validate_iban("D"), Err(IbanError::MissingCountryCode));
        assert_eq!(validate_iban("D3"), Err(IbanError::InvalidCountryCodeCharset));
        assert_eq!(validate_iban("de89"), Err(IbanError::InvalidCountryCodeCharset));
        assert_eq!(validate_iban("AA89"), Err(IbanError::InvalidCountryCode));
        assert_eq!(validate_iban("DE8"), Err(IbanError::MissingCheckDigits));
        assert_eq!(validate_iban("DE8X"), Err(IbanError::InvalidCheckDigitsFormat));
        assert_eq!(validate_iban("DE01"), Err(IbanError::InvalidCheckDigitsFormat));
        assert_eq!(validate_iban("US12345"), Err(IbanError::UnsupportedCountry));
        assert_eq!(validate_iban("DE89"), Err(IbanError::MissingBban));
        assert_eq!(
            validate_iban("DE8937040044053201300"),
            Err(IbanError::InvalidBbanLength {
                expected: 18,
                found: 17
            })
        );
        assert_eq!(
            validate_iban("DE8937040044053201300X"),
            Err(IbanError::BbanInvalidDigits)
        );
        assert_eq!(
            validate_iban("GB82west12345698765432"),
            Err(IbanError::BbanInvalidUpperCaseLetters)
        );
        assert_eq!(
            validate_iban("CH930076201162385295-"),
            Err(IbanError::BbanInvalidDigitsOrLetters)
        );
        assert_eq!(
            validate_iban("CH9300762011623852É57"),
            Err(IbanError::InvalidCharacter('É'))
        );
    }

    #[test]
    fn test_lowercase_alphanumeric_segment_is_accepted() {
        assert_eq!(validate_iban("FR1420041010050500013m02606"), Ok(()));
    }

    #[test]
    fn test_compute_check_digits() {
        assert_eq!(compute_check_digits("DE", "370400440532013000").unwrap(), "89");
        assert_eq!(compute_check_digits("GB", "WEST12345698765432").unwrap(), "82");
        assert_eq!(compute_check_digits("NO", "86011117947").unwrap(), "93");
        assert_eq!(
            compute_check_digits("ZZ", "1234"),
            Err(IbanError::InvalidCountryCode)
        );
        assert_eq!(
            compute_check_digits("DE", "12-4"),
            Err(IbanError::InvalidCharacter('-'))
        );
    }

    #[test]
    fn test_accessors_and_printable_form() {
        let iban = Iban::new("GB82 WEST 1234 5698 7654 32");
        assert_eq!(iban.as_str(), "GB82WEST12345698765432");
        assert_eq!(iban.country_code(), Some("GB"));
        assert_eq!(iban.check_digits(), Some("82"));
        assert_eq!(iban.bban(), Some("WEST12345698765432"));
        assert_eq!(iban.to_printable(), "GB82 WEST 1234 5698 7654 32");
        assert!(Iban::new("DE89").bban().is_none());

        let parsed: Iban = "NO93 8601 1117 947".parse().unwrap();
        assert_eq!(parsed.to_string(), "NO9386011117947");
        assert!("NO9386011117948".parse::<Iban>().is_err());
    }
}
