/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Tag name patterns used by sequence descriptors.
//!
//! This module provides:
//! - [`NamePattern`]: One compiled descriptor name
//! - [`NameSet`]: The set of names a descriptor slot accepts
//!
//! Descriptor names follow three forms:
//! - `"15A"`: exact name
//! - `"15"`: tag number 15 with any letter option, or none
//! - `"50a"`: tag number 50 with a required letter option

use ironswift_core::tag::Tag;
use smallvec::SmallVec;

/// A compiled descriptor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePattern<'a> {
    /// Matches exactly this name.
    Exact(&'a str),
    /// Matches the tag number with or without a letter option.
    Number(u32),
    /// Matches the tag number followed by a letter option.
    NumberWithLetter(u32),
}

impl<'a> NamePattern<'a> {
    /// Compiles a descriptor name.
    ///
    /// # Arguments
    /// * `name` - `"15A"`, `"15"` or `"50a"`
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = name.parse() {
                return Self::Number(number);
            }
        }
        if let Some(prefix) = name.strip_suffix('a') {
            if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(number) = prefix.parse() {
                    return Self::NumberWithLetter(number);
                }
            }
        }
        Self::Exact(name)
    }

    /// Returns true if `tag` matches this pattern.
    #[inline]
    #[must_use]
    pub fn matches(&self, tag: &Tag) -> bool {
        match *self {
            Self::Exact(name) => tag.name() == name,
            Self::Number(number) => tag.is_number(number),
            Self::NumberWithLetter(number) => {
                tag.is_number(number) && tag.letter_option().is_some()
            }
        }
    }
}

/// Set of descriptor names; a tag matches if any pattern matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet<'a> {
    patterns: SmallVec<[NamePattern<'a>; 4]>,
}

impl<'a> NameSet<'a> {
    /// Compiles a list of descriptor names.
    #[must_use]
    pub fn new(names: &[&'a str]) -> Self {
        Self {
            patterns: names.iter().map(|&name| NamePattern::parse(name)).collect(),
        }
    }

    /// Returns true if any pattern matches `tag`.
    #[inline]
    #[must_use]
    pub fn matches(&self, tag: &Tag) -> bool {
        self.patterns.iter().any(|p| p.matches(tag))
    }

    /// Returns true if the set has no patterns (matches nothing).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the compiled patterns.
    #[must_use]
    pub fn patterns(&self) -> &[NamePattern<'a>] {
        &self.patterns
    }
}
