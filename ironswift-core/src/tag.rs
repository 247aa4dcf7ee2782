/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Tag type for FIN blocks.
//!
//! This module provides:
//! - [`Tag`]: Name/value pair, the atomic unit of blocks 3, 4, 5 and user blocks
//! - [`canonicalize_crlf`]: Line-break normalization used for every tag value
//!
//! The numeric tag number and the letter option are derived from the name and
//! never stored.

use crate::error::ModelError;
use crate::unparsed::UnparsedTextList;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters a tag name may never contain.
const NAME_DELIMITERS: [char; 5] = [':', '{', '}', '\r', '\n'];

/// Name and value of a single FIN field.
///
/// Values may span several lines; line breaks are always stored as CRLF.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    name: String,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unparsed: Option<UnparsedTextList>,
}

impl Tag {
    /// Creates a new tag.
    ///
    /// # Arguments
    /// * `name` - The tag name, e.g. `"32A"` or `"108"`
    /// * `value` - The tag value; line breaks are normalized to CRLF
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidTagName`] if the name is empty or contains
    /// `:`, `{`, `}` or a line break, and [`ModelError::InvalidTagValue`] if the
    /// value contains the block 4 terminator line `-}`.
    pub fn new(name: impl Into<String>, value: impl AsRef<str>) -> Result<Self, ModelError> {
        let name = name.into();
        if name.is_empty() || name.contains(NAME_DELIMITERS) {
            return Err(ModelError::InvalidTagName(name));
        }
        let value = canonicalize_crlf(value.as_ref());
        if value.starts_with("-}") || value.contains("\n-}") {
            return Err(ModelError::InvalidTagValue { name });
        }
        Ok(Self {
            name,
            value,
            unparsed: None,
        })
    }

    /// Returns the tag name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tag value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the numeric part of the name.
    ///
    /// Defined for names made of digits optionally followed by one letter
    /// (`"20"`, `"32A"`); `None` for names such as `"CHK"` or `"MUR"`.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        let (digits, rest) = split_number(&self.name);
        if digits.is_empty() || rest.chars().count() > 1 {
            return None;
        }
        if !rest.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Returns the letter option, e.g. `'A'` for `"32A"`.
    #[must_use]
    pub fn letter_option(&self) -> Option<char> {
        let (digits, rest) = split_number(&self.name);
        let mut chars = rest.chars();
        match (digits.is_empty(), chars.next(), chars.next()) {
            (false, Some(letter), None) if letter.is_ascii_alphabetic() => Some(letter),
            _ => None,
        }
    }

    /// Returns true if the numeric part of the name equals `number`.
    #[inline]
    #[must_use]
    pub fn is_number(&self, number: u32) -> bool {
        self.number() == Some(number)
    }

    /// Returns true if this tag is named `name`.
    ///
    /// A trailing lowercase `a` after a numeric prefix is a letter-option
    /// wildcard: `"50a"` matches `50A`, `50F`, `50K` but not a bare `50`.
    /// Any other name must match exactly.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        match letter_wildcard(name) {
            Some(number) => self.is_number(number) && self.letter_option().is_some(),
            None => self.name == name,
        }
    }

    /// Compares two tags ignoring carriage returns in the values.
    #[must_use]
    pub fn equals_ignore_cr(&self, other: &Self) -> bool {
        self.name == other.name && without_cr(&self.value).eq(without_cr(&other.value))
    }

    /// Returns an iterator over the lines of the value.
    pub fn value_lines(&self) -> impl Iterator<Item = &str> {
        self.value.split("\r\n")
    }

    /// Returns the generic field qualifier (`SETR` in `:SETR//TRAD`).
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.generic_parts().map(|parts| parts.qualifier)
    }

    /// Returns the data source scheme of a generic field, if present.
    #[must_use]
    pub fn data_source_scheme(&self) -> Option<&str> {
        self.generic_parts().and_then(|parts| parts.dss)
    }

    /// Returns the second generic component, skipping an optional DSS.
    ///
    /// For `:SETR//TRAD` and `:SETR/ISSU/TRAD` this is `TRAD`.
    #[must_use]
    pub fn conditional_qualifier(&self) -> Option<&str> {
        self.generic_parts().and_then(|parts| parts.second)
    }

    /// Returns the unparsed texts attached to this tag.
    #[inline]
    #[must_use]
    pub fn unparsed_texts(&self) -> Option<&UnparsedTextList> {
        self.unparsed.as_ref()
    }

    /// Attaches an unparsed text fragment to this tag.
    pub fn add_unparsed_text(&mut self, text: impl Into<String>) {
        self.unparsed.get_or_insert_with(UnparsedTextList::new).push(text);
    }

    /// Returns the tag with the given unparsed text attached.
    #[must_use]
    pub fn with_unparsed_text(mut self, text: impl Into<String>) -> Self {
        self.add_unparsed_text(text);
        self
    }

    fn generic_parts(&self) -> Option<GenericParts<'_>> {
        let first_line = self.value.split("\r\n").next()?;
        let body = first_line.strip_prefix(':')?;
        let (qualifier, rest) = body.split_once('/')?;
        if qualifier.is_empty() {
            return None;
        }
        let (dss, tail) = match rest.strip_prefix('/') {
            Some(tail) => (None, tail),
            None => match rest.split_once('/') {
                Some((dss, tail)) => (Some(dss), tail),
                None => (None, rest),
            },
        };
        let second = tail.split('/').next().filter(|s| !s.is_empty());
        Some(GenericParts {
            qualifier,
            dss,
            second,
        })
    }
}

struct GenericParts<'a> {
    qualifier: &'a str,
    dss: Option<&'a str>,
    second: Option<&'a str>,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}:{}", self.name, self.value)
    }
}

impl FromStr for Tag {
    type Err = ModelError;

    /// Parses `name:value`, with or without the leading colon of block 4.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix(':').unwrap_or(s);
        match s.split_once(':') {
            Some((name, value)) => Self::new(name, value),
            None => Err(ModelError::InvalidTagName(s.to_string())),
        }
    }
}

/// Normalizes every line break in `text` to CRLF.
#[must_use]
pub fn canonicalize_crlf(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev = '\0';
    for c in text.chars() {
        if c == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(c);
        prev = c;
    }
    out
}

fn without_cr(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|&c| c != '\r')
}

/// Splits a name into its leading ASCII digits and the remainder.
fn split_number(name: &str) -> (&str, &str) {
    let end = name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len());
    name.split_at(end)
}

/// Returns the tag number of a `"50a"` style wildcard name.
pub(crate) fn letter_wildcard(name: &str) -> Option<u32> {
    let prefix = name.strip_suffix('a')?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, value: &str) -> Tag {
        Tag::new(name, value).unwrap()
    }

    #[test]
    fn test_number_and_letter_option() {
        let t = tag("32A", "090828EUR1000,");
        assert_eq!(t.number(), Some(32));
        assert_eq!(t.letter_option(), Some('A'));
        assert!(t.is_number(32));

        let plain = tag("20", "REF");
        assert_eq!(plain.number(), Some(20));
        assert_eq!(plain.letter_option(), None);

        let named = tag("CHK", "ABCDEF123456");
        assert_eq!(named.number(), None);
        assert_eq!(named.letter_option(), None);
    }

    #[test]
    fn test_invalid_names() {
        assert!(matches!(Tag::new("", "x"), Err(ModelError::InvalidTagName(_))));
        assert!(matches!(Tag::new("2:0", "x"), Err(ModelError::InvalidTagName(_))));
        assert!(matches!(Tag::new("2{", "x"), Err(ModelError::InvalidTagName(_))));
    }

    #[test]
    fn test_value_terminator_rejected() {
        let err = Tag::new("79", "line one\n-}").unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidTagValue {
                name: "79".to_string()
            }
        );
    }

    #[test]
    fn test_value_canonicalized_to_crlf() {
        let t = tag("59", "/123\nJOHN DOE\r\nLONDON");
        assert_eq!(t.value(), "/123\r\nJOHN DOE\r\nLONDON");
        assert_eq!(t.value_lines().count(), 3);
    }

    #[test]
    fn test_matches_name_wildcard() {
        assert!(tag("50K", "x").matches_name("50a"));
        assert!(tag("50F", "x").matches_name("50a"));
        assert!(!tag("50", "x").matches_name("50a"));
        assert!(!tag("59A", "x").matches_name("50a"));
        assert!(tag("50K", "x").matches_name("50K"));
        assert!(!tag("50K", "x").matches_name("50"));
    }

    #[test]
    fn test_equals_ignore_cr() {
        let a = tag("72", "A\r\nB");
        let b = Tag {
            name: "72".to_string(),
            value: "A\nB".to_string(),
            unparsed: None,
        };
        assert_ne!(a, b);
        assert!(a.equals_ignore_cr(&b));
    }

    #[test]
    fn test_generic_qualifiers() {
        let t = tag("22F", ":SETR//TRAD");
        assert_eq!(t.qualifier(), Some("SETR"));
        assert_eq!(t.data_source_scheme(), None);
        assert_eq!(t.conditional_qualifier(), Some("TRAD"));

        let with_dss = tag("22F", ":SETR/ISSU/TRAD");
        assert_eq!(with_dss.qualifier(), Some("SETR"));
        assert_eq!(with_dss.data_source_scheme(), Some("ISSU"));
        assert_eq!(with_dss.conditional_qualifier(), Some("TRAD"));

        let party = tag("95P", ":BUYR//BANKBEBB");
        assert_eq!(party.conditional_qualifier(), Some("BANKBEBB"));

        assert_eq!(tag("20", "REF").qualifier(), None);
    }

    #[test]
    fn test_from_str_and_display() {
        let t: Tag = ":20:REFERENCE".parse().unwrap();
        assert_eq!(t.name(), "20");
        assert_eq!(t.value(), "REFERENCE");
        assert_eq!(t.to_string(), ":20:REFERENCE");

        let t: Tag = "108:MUR:1".parse().unwrap();
        assert_eq!(t.name(), "108");
        assert_eq!(t.value(), "MUR:1");
    }

    #[test]
    fn test_unparsed_text_attachment() {
        let t = tag("20", "REF").with_unparsed_text("trailer");
        assert_eq!(t.unparsed_texts().map(UnparsedTextList::len), Some(1));
    }

    #[test]
    fn test_canonicalize_crlf() {
        assert_eq!(canonicalize_crlf("a\nb"), "a\r\nb");
        assert_eq!(canonicalize_crlf("a\r\nb"), "a\r\nb");
        assert_eq!(canonicalize_crlf("plain"), "plain");
    }
}
