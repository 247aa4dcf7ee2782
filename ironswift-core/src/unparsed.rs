/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Unparsed text attached to a message, a block, or a single tag.
//!
//! The FIN format allows free-form content after recognized structure (for
//! example an original message appended to a copy). The decoder keeps such
//! fragments verbatim and the encoder writes them back at the same attachment
//! point.

use serde::{Deserialize, Serialize};

/// Ordered list of free-form text fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnparsedTextList {
    texts: Vec<String>,
}

impl UnparsedTextList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { texts: Vec::new() }
    }

    /// Appends a text fragment.
    pub fn push(&mut self, text: impl Into<String>) {
        self.texts.push(text.into());
    }

    /// Returns the fragment at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }

    /// Returns the number of fragments.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns true if there are no fragments.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Returns an iterator over the fragments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(String::as_str)
    }

    /// Returns true if the fragment at `index` looks like a complete FIN message.
    ///
    /// Only the leading `{1:` marker is checked; use the FIN decoder to actually
    /// parse it.
    #[must_use]
    pub fn is_message(&self, index: usize) -> bool {
        self.get(index)
            .is_some_and(|text| text.trim_start().starts_with("{1:"))
    }
}

impl<S: Into<String>> FromIterator<S> for UnparsedTextList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            texts: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UnparsedTextList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.texts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut list = UnparsedTextList::new();
        assert!(list.is_empty());
        list.push("first");
        list.push(String::from("second"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), Some("first"));
        assert_eq!(list.get(1), Some("second"));
        assert_eq!(list.get(2), None);
    }

    #[test]
    fn test_is_message() {
        let list: UnparsedTextList = ["{1:F01BANKBEBBAXXX0000000000}", "free text"]
            .into_iter()
            .collect();
        assert!(list.is_message(0));
        assert!(!list.is_message(1));
        assert!(!list.is_message(5));
    }
}
