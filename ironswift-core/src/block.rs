/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Ordered tag containers.
//!
//! [`TagListBlock`] backs blocks 3, 4, 5 and every user block. Tag order is
//! significant: it encodes message semantics, so every query preserves it.
//!
//! Sub-blocks produced by this module are always fresh copies. Mutating an
//! extracted block never affects the block it was taken from.
//!
//! Two index-bounded operations are strict and report [`ModelError`] on bad
//! bounds: [`TagListBlock::sublist`] (end inclusive) and
//! [`TagListBlock::sub_block_by_index`] (end exclusive). Every other range
//! operation clamps and returns an empty block when nothing matches.

use crate::error::ModelError;
use crate::tag::Tag;
use crate::unparsed::UnparsedTextList;
use serde::{Deserialize, Serialize};
use std::ops::{Bound, RangeBounds};

/// Ordered list of tags with optional unparsed text before the first tag and
/// after the last one.
///
/// Mutation is not synchronized; callers sharing a block between writers must
/// provide their own exclusion. Read-only operations never mutate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagListBlock {
    tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    leading: Option<UnparsedTextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unparsed: Option<UnparsedTextList>,
}

impl TagListBlock {
    /// Creates an empty block.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tags: Vec::new(),
            leading: None,
            unparsed: None,
        }
    }

    /// Creates a block holding `tags` in the given order.
    #[must_use]
    pub fn from_tags(tags: Vec<Tag>) -> Self {
        Self {
            tags,
            leading: None,
            unparsed: None,
        }
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Appends a tag at the end of the block.
    pub fn append(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    /// Appends every tag of `tags` in order.
    pub fn append_all<I: IntoIterator<Item = Tag>>(&mut self, tags: I) -> &mut Self {
        self.tags.extend(tags);
        self
    }

    /// Returns the block with `tag` appended.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Inserts a tag at `index`, shifting later tags.
    ///
    /// # Errors
    /// Returns [`ModelError::IndexOutOfBounds`] if `index > len`.
    pub fn insert(&mut self, index: usize, tag: Tag) -> Result<(), ModelError> {
        if index > self.tags.len() {
            return Err(self.out_of_bounds(index));
        }
        self.tags.insert(index, tag);
        Ok(())
    }

    /// Replaces the tag at `index`, returning the previous one.
    ///
    /// # Errors
    /// Returns [`ModelError::IndexOutOfBounds`] if there is no tag at `index`.
    pub fn set(&mut self, index: usize, tag: Tag) -> Result<Tag, ModelError> {
        let len = self.tags.len();
        let slot = self
            .tags
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, tag))
    }

    /// Removes and returns the tag at `index`.
    ///
    /// # Errors
    /// Returns [`ModelError::IndexOutOfBounds`] if there is no tag at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Tag, ModelError> {
        if index >= self.tags.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.tags.remove(index))
    }

    /// Removes the first tag named `name`.
    pub fn remove_by_name(&mut self, name: &str) -> Option<Tag> {
        let index = self.tags.iter().position(|t| t.matches_name(name))?;
        Some(self.tags.remove(index))
    }

    /// Removes every tag named `name`, returning how many were removed.
    pub fn remove_all_by_name(&mut self, name: &str) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| !t.matches_name(name));
        before - self.tags.len()
    }

    /// Removes every tag, keeping unparsed text.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    /// Returns the tags in order.
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Returns the tag at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    /// Returns the number of tags.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the block has no tags.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns an iterator over the tags.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Returns the first tag named `name` (`"50a"` wildcards allowed).
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.matches_name(name))
    }

    /// Returns every tag named `name`, in block order.
    #[must_use]
    pub fn tags_by_name(&self, name: &str) -> Vec<&Tag> {
        self.tags.iter().filter(|t| t.matches_name(name)).collect()
    }

    /// Returns every tag whose numeric part is `number`, whatever its letter.
    #[must_use]
    pub fn tags_by_number(&self, number: u32) -> Vec<&Tag> {
        self.tags.iter().filter(|t| t.is_number(number)).collect()
    }

    /// Returns the value of the first tag named `name`.
    #[must_use]
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tag(name).map(Tag::value)
    }

    /// Returns the values of every tag named `name`.
    #[must_use]
    pub fn tag_values(&self, name: &str) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| t.matches_name(name))
            .map(Tag::value)
            .collect()
    }

    /// Returns every tag whose value equals `value`.
    #[must_use]
    pub fn tags_by_value(&self, value: &str) -> Vec<&Tag> {
        self.tags.iter().filter(|t| t.value() == value).collect()
    }

    /// Returns every tag whose value contains `needle`.
    #[must_use]
    pub fn tags_by_content(&self, needle: &str) -> Vec<&Tag> {
        self.tags.iter().filter(|t| t.value().contains(needle)).collect()
    }

    /// Returns generic fields named `name` carrying the given qualifiers.
    ///
    /// # Arguments
    /// * `name` - Tag name, wildcards allowed (`"22a"`)
    /// * `qualifier` - First component, e.g. `SETR` in `:SETR//TRAD`
    /// * `conditional` - Optional second component; an optional data source
    ///   scheme between the two is ignored
    #[must_use]
    pub fn tags_by_qualifiers(
        &self,
        name: &str,
        qualifier: &str,
        conditional: Option<&str>,
    ) -> Vec<&Tag> {
        self.tags
            .iter()
            .filter(|t| t.matches_name(name))
            .filter(|t| t.qualifier() == Some(qualifier))
            .filter(|t| conditional.is_none() || t.conditional_qualifier() == conditional)
            .collect()
    }

    /// Returns true if a tag named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.matches_name(name))
    }

    /// Returns the number of tags named `name`.
    #[must_use]
    pub fn count_by_name(&self, name: &str) -> usize {
        self.tags.iter().filter(|t| t.matches_name(name)).count()
    }

    /// Returns the index of the first tag named `name` at or after `from`.
    #[must_use]
    pub fn index_of(&self, name: &str, from: usize) -> Option<usize> {
        self.tags
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, t)| t.matches_name(name))
            .map(|(i, _)| i)
    }

    /// Returns a new block with the tags whose name matches any of `names`.
    #[must_use]
    pub fn filter_by_name(&self, names: &[&str]) -> Self {
        self.tags
            .iter()
            .filter(|t| names.iter().any(|n| t.matches_name(n)))
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Sub-ranges
    // ------------------------------------------------------------------

    /// Returns the tags from `start` to `end` **inclusive**.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidRange`] unless `start <= end < len`.
    pub fn sublist(&self, start: usize, end: usize) -> Result<Self, ModelError> {
        if start > end || end >= self.tags.len() {
            return Err(self.invalid_range(start, end));
        }
        Ok(self.tags[start..=end].iter().cloned().collect())
    }

    /// Returns the tags from `start` up to `end` **exclusive**.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidRange`] unless `start <= end <= len`.
    pub fn sub_block_by_index(&self, start: usize, end: usize) -> Result<Self, ModelError> {
        if start > end || end > self.tags.len() {
            return Err(self.invalid_range(start, end));
        }
        Ok(self.tags[start..end].iter().cloned().collect())
    }

    /// Returns the tags in `range`, clamped to the block bounds.
    ///
    /// Out-of-range or reversed bounds give an empty block.
    #[must_use]
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let len = self.tags.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return Self::new();
        }
        self.tags[start..end].iter().cloned().collect()
    }

    /// Returns the tags after the first tag named `name`.
    ///
    /// When `inclusive` the matching tag itself is the first tag of the result.
    /// Empty if no tag matches.
    #[must_use]
    pub fn sub_block_after_first(&self, name: &str, inclusive: bool) -> Self {
        match self.index_of(name, 0) {
            Some(i) if inclusive => self.slice(i..),
            Some(i) => self.slice(i + 1..),
            None => Self::new(),
        }
    }

    /// Returns the tags before the first tag named `name`.
    ///
    /// When `inclusive` the matching tag is the last tag of the result.
    /// Empty if no tag matches.
    #[must_use]
    pub fn sub_block_before_first(&self, name: &str, inclusive: bool) -> Self {
        match self.index_of(name, 0) {
            Some(i) if inclusive => self.slice(..=i),
            Some(i) => self.slice(..i),
            None => Self::new(),
        }
    }

    /// Returns the span from the first `start_name` tag to the next `end_name`
    /// tag, both included.
    ///
    /// Empty if no start tag exists. Without a closing tag the span runs to the
    /// end of the block.
    #[must_use]
    pub fn sub_block_between(&self, start_name: &str, end_name: &str) -> Self {
        let Some(start) = self.index_of(start_name, 0) else {
            return Self::new();
        };
        match self.index_of(end_name, start + 1) {
            Some(end) => self.slice(start..=end),
            None => self.slice(start..),
        }
    }

    // ------------------------------------------------------------------
    // Comparison and unparsed text
    // ------------------------------------------------------------------

    /// Compares two blocks tag by tag, ignoring carriage returns in values.
    #[must_use]
    pub fn equals_ignore_cr(&self, other: &Self) -> bool {
        self.tags.len() == other.tags.len()
            && self
                .tags
                .iter()
                .zip(&other.tags)
                .all(|(a, b)| a.equals_ignore_cr(b))
    }

    /// Returns the unparsed texts written after the last tag of this block.
    #[inline]
    #[must_use]
    pub fn unparsed_texts(&self) -> Option<&UnparsedTextList> {
        self.unparsed.as_ref()
    }

    /// Attaches an unparsed text fragment after the last tag of this block.
    pub fn add_unparsed_text(&mut self, text: impl Into<String>) {
        self.unparsed.get_or_insert_with(UnparsedTextList::new).push(text);
    }

    /// Returns the unparsed texts written before the first tag of this block.
    #[inline]
    #[must_use]
    pub fn leading_unparsed_texts(&self) -> Option<&UnparsedTextList> {
        self.leading.as_ref()
    }

    /// Attaches an unparsed text fragment before the first tag of this block.
    pub fn add_leading_unparsed_text(&mut self, text: impl Into<String>) {
        self.leading.get_or_insert_with(UnparsedTextList::new).push(text);
    }

    /// Returns a mutable reference to the last tag, if any.
    #[must_use]
    pub fn last_mut(&mut self) -> Option<&mut Tag> {
        self.tags.last_mut()
    }

    fn out_of_bounds(&self, index: usize) -> ModelError {
        ModelError::IndexOutOfBounds {
            index,
            len: self.tags.len(),
        }
    }

    fn invalid_range(&self, start: usize, end: usize) -> ModelError {
        ModelError::InvalidRange {
            start,
            end,
            len: self.tags.len(),
        }
    }
}

impl FromIterator<Tag> for TagListBlock {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self::from_tags(iter.into_iter().collect())
    }
}

impl Extend<Tag> for TagListBlock {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.tags.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TagListBlock {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl IntoIterator for TagListBlock {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(pairs: &[(&str, &str)]) -> TagListBlock {
        pairs
            .iter()
            .map(|(n, v)| Tag::new(*n, v).unwrap())
            .collect()
    }

    fn names(block: &TagListBlock) -> Vec<&str> {
        block.iter().map(Tag::name).collect()
    }

    #[test]
    fn test_append_insert_remove() {
        let mut b = TagListBlock::new();
        b.append(Tag::new("20", "REF").unwrap())
            .append(Tag::new("32A", "X").unwrap());
        b.insert(1, Tag::new("23B", "CRED").unwrap()).unwrap();
        assert_eq!(names(&b), ["20", "23B", "32A"]);

        let removed = b.remove(0).unwrap();
        assert_eq!(removed.name(), "20");
        assert_eq!(names(&b), ["23B", "32A"]);

        assert_eq!(
            b.insert(5, Tag::new("71A", "SHA").unwrap()),
            Err(ModelError::IndexOutOfBounds { index: 5, len: 2 })
        );
        assert!(b.remove(2).is_err());
    }

    #[test]
    fn test_set_returns_previous() {
        let mut b = block(&[("20", "A"), ("21", "B")]);
        let old = b.set(1, Tag::new("21", "C").unwrap()).unwrap();
        assert_eq!(old.value(), "B");
        assert_eq!(b.tag_value("21"), Some("C"));
        assert!(b.set(2, Tag::new("21", "D").unwrap()).is_err());
    }

    #[test]
    fn test_queries() {
        let b = block(&[
            ("20", "REF"),
            ("50K", "ORDERING"),
            ("52A", "BANKBEBB"),
            ("50F", "OTHER"),
            ("59", "BENEFICIARY"),
            ("50", "PLAIN"),
        ]);
        assert_eq!(b.tag_value("20"), Some("REF"));
        assert_eq!(b.tag("21"), None);

        let wildcard: Vec<&str> = b.tags_by_name("50a").iter().map(|t| t.name()).collect();
        assert_eq!(wildcard, ["50K", "50F"]);
        assert_eq!(b.tags_by_number(50).len(), 3);
        assert_eq!(b.count_by_name("50"), 1);
        assert!(b.contains("59"));
        assert_eq!(b.tags_by_value("BANKBEBB").len(), 1);
        assert_eq!(b.tags_by_content("ER").len(), 2);
        assert_eq!(b.index_of("50a", 2), Some(3));
        assert_eq!(b.tag_values("50a"), ["ORDERING", "OTHER"]);
    }

    #[test]
    fn test_tags_by_qualifiers() {
        let b = block(&[
            ("22F", ":SETR//TRAD"),
            ("22F", ":STCO/XDSS/NPAR"),
            ("22H", ":BUSE//SELL"),
        ]);
        assert_eq!(b.tags_by_qualifiers("22F", "SETR", None).len(), 1);
        assert_eq!(b.tags_by_qualifiers("22F", "STCO", Some("NPAR")).len(), 1);
        assert_eq!(b.tags_by_qualifiers("22a", "BUSE", Some("SELL")).len(), 1);
        assert!(b.tags_by_qualifiers("22F", "SETR", Some("REPU")).is_empty());
    }

    #[test]
    fn test_remove_by_name() {
        let mut b = block(&[("20", "A"), ("72", "B"), ("72", "C")]);
        assert_eq!(b.remove_by_name("72").map(|t| t.value().to_string()), Some("B".into()));
        assert_eq!(b.remove_all_by_name("72"), 1);
        assert_eq!(names(&b), ["20"]);
        assert!(b.remove_by_name("99").is_none());
    }

    #[test]
    fn test_sublist_is_inclusive_and_strict() {
        let b = block(&[("1", "a"), ("2", "b"), ("3", "c"), ("4", "d")]);
        assert_eq!(names(&b.sublist(1, 2).unwrap()), ["2", "3"]);
        assert_eq!(names(&b.sublist(3, 3).unwrap()), ["4"]);
        assert!(b.sublist(2, 4).is_err());
        assert!(b.sublist(3, 1).is_err());
    }

    #[test]
    fn test_sub_block_by_index_is_exclusive_and_strict() {
        let b = block(&[("1", "a"), ("2", "b"), ("3", "c"), ("4", "d")]);
        assert_eq!(names(&b.sub_block_by_index(1, 3).unwrap()), ["2", "3"]);
        assert!(b.sub_block_by_index(2, 2).unwrap().is_empty());
        assert_eq!(b.sub_block_by_index(0, 4).unwrap().len(), 4);
        assert_eq!(
            b.sub_block_by_index(1, 5),
            Err(ModelError::InvalidRange {
                start: 1,
                end: 5,
                len: 4
            })
        );
    }

    #[test]
    fn test_slice_clamps() {
        let b = block(&[("1", "a"), ("2", "b"), ("3", "c")]);
        assert_eq!(names(&b.slice(1..10)), ["2", "3"]);
        assert!(b.slice(5..).is_empty());
        assert!(b.slice(2..1).is_empty());
        assert_eq!(b.slice(..).len(), 3);
    }

    #[test]
    fn test_name_bounded_sub_blocks() {
        let b = block(&[("20", "a"), ("21", "b"), ("32A", "c"), ("71A", "d")]);
        assert_eq!(names(&b.sub_block_after_first("21", false)), ["32A", "71A"]);
        assert_eq!(names(&b.sub_block_after_first("21", true)), ["21", "32A", "71A"]);
        assert_eq!(names(&b.sub_block_before_first("32A", false)), ["20", "21"]);
        assert_eq!(names(&b.sub_block_before_first("32A", true)), ["20", "21", "32A"]);
        assert_eq!(names(&b.sub_block_between("21", "32A")), ["21", "32A"]);
        assert_eq!(names(&b.sub_block_between("21", "99")), ["21", "32A", "71A"]);
        assert!(b.sub_block_between("99", "32A").is_empty());
        assert!(b.sub_block_after_first("99", true).is_empty());
    }

    #[test]
    fn test_extracted_blocks_are_copies() {
        let b = block(&[("20", "a"), ("21", "b")]);
        let mut copy = b.slice(..);
        copy.append(Tag::new("72", "x").unwrap());
        copy.set(0, Tag::new("20", "changed").unwrap()).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.tag_value("20"), Some("a"));
    }

    #[test]
    fn test_filter_by_name() {
        let b = block(&[("20", "a"), ("21", "b"), ("32A", "c")]);
        assert_eq!(names(&b.filter_by_name(&["20", "32a"])), ["20", "32A"]);
    }

    #[test]
    fn test_equals_ignore_cr() {
        let a = block(&[("79", "line1\r\nline2")]);
        let b = block(&[("79", "line1\nline2")]);
        assert_eq!(a, b);
        assert!(a.equals_ignore_cr(&b));
        assert!(!a.equals_ignore_cr(&block(&[("79", "line1")])));
        assert!(!a.equals_ignore_cr(&block(&[("79", "line1\r\nline2"), ("72", "x")])));
    }

    #[test]
    fn test_leading_and_trailing_unparsed_text() {
        let mut b = block(&[("20", "a")]);
        b.add_leading_unparsed_text("before");
        b.add_unparsed_text("after");
        assert_eq!(b.leading_unparsed_texts().and_then(|u| u.get(0)), Some("before"));
        assert_eq!(b.unparsed_texts().and_then(|u| u.get(0)), Some("after"));
        assert!(b.leading_unparsed_texts().is_some_and(|u| u.len() == 1));
        assert!(block(&[("20", "a")]).leading_unparsed_texts().is_none());
    }
}
