/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Delimited extraction with an optional tail.
//!
//! A span opens at a tag matching the START set and closes at the first later
//! tag matching the END set. Tags matching the TAIL set that directly follow
//! the END tag are added to the span until a non-tail tag or a new START
//! appears. An END seen before any START is noise and is skipped.

use crate::pattern::NameSet;
use ironswift_core::block::TagListBlock;
use tracing::debug;

/// START, END and TAIL names of a delimited sequence.
///
/// Names use the descriptor forms of [`crate::pattern::NamePattern`]: a bare
/// number matches any letter option, so END `"5"` also matches `5B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delimiters<'a> {
    /// Names that open a span.
    pub start: &'a [&'a str],
    /// Names that close a span.
    pub end: &'a [&'a str],
    /// Names that may follow the closing tag.
    pub tail: &'a [&'a str],
}

impl<'a> Delimiters<'a> {
    /// Creates delimiters without a tail.
    #[must_use]
    pub const fn new(start: &'a [&'a str], end: &'a [&'a str]) -> Self {
        Self {
            start,
            end,
            tail: &[],
        }
    }

    /// Sets the tail names.
    #[must_use]
    pub const fn with_tail(mut self, tail: &'a [&'a str]) -> Self {
        self.tail = tail;
        self
    }
}

/// Compiled delimiters.
struct Matcher<'a> {
    start: NameSet<'a>,
    end: NameSet<'a>,
    tail: NameSet<'a>,
}

impl<'a> Matcher<'a> {
    fn new(delimiters: &Delimiters<'a>) -> Self {
        Self {
            start: NameSet::new(delimiters.start),
            end: NameSet::new(delimiters.end),
            tail: NameSet::new(delimiters.tail),
        }
    }

    /// Returns the next span `[start, stop)` at or after `from`.
    fn next_span(&self, block: &TagListBlock, from: usize) -> Option<(usize, usize)> {
        let tags = block.tags();
        let start = (from..tags.len()).find(|&i| self.start.matches(&tags[i]))?;
        // A tag in both sets opens and closes its own span.
        let end = if self.end.matches(&tags[start]) {
            start
        } else {
            let Some(end) = (start + 1..tags.len()).find(|&i| self.end.matches(&tags[i])) else {
                debug!(index = start, "sequence start without end tag dropped");
                return None;
            };
            end
        };
        let mut stop = end + 1;
        while stop < tags.len()
            && self.tail.matches(&tags[stop])
            && !self.start.matches(&tags[stop])
        {
            stop += 1;
        }
        Some((start, stop))
    }
}

/// Extracts every delimited span, in order.
///
/// # Returns
/// One sub-block per span; an empty vector when nothing matches.
///
/// # Example
/// ```
/// use ironswift_core::{Tag, TagListBlock};
/// use ironswift_sequence::{Delimiters, sub_blocks_delimited_with_optional_tail};
///
/// let block: TagListBlock = ["4", "3", "2", "5"]
///     .into_iter()
///     .map(|n| Tag::new(n, "").unwrap())
///     .collect();
/// let delimiters = Delimiters::new(&["1", "2"], &["4", "5"]).with_tail(&["3"]);
/// let spans = sub_blocks_delimited_with_optional_tail(&block, &delimiters);
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].tags()[0].name(), "2");
/// ```
#[must_use]
pub fn sub_blocks_delimited_with_optional_tail(
    block: &TagListBlock,
    delimiters: &Delimiters<'_>,
) -> Vec<TagListBlock> {
    let matcher = Matcher::new(delimiters);
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some((start, stop)) = matcher.next_span(block, from) {
        spans.push(block.slice(start..stop));
        from = stop;
    }
    spans
}

/// Extracts the first delimited span.
///
/// # Returns
/// The span, or an empty block when nothing matches.
#[must_use]
pub fn sub_block_delimited_with_optional_tail(
    block: &TagListBlock,
    delimiters: &Delimiters<'_>,
) -> TagListBlock {
    Matcher::new(delimiters)
        .next_span(block, 0)
        .map(|(start, stop)| block.slice(start..stop))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironswift_core::tag::Tag;

    fn block(names: &[&str]) -> TagListBlock {
        names.iter().map(|n| Tag::new(*n, "V").unwrap()).collect()
    }

    fn names(block: &TagListBlock) -> Vec<&str> {
        block.iter().map(Tag::name).collect()
    }

    #[test]
    fn test_whole_span_with_letter_options() {
        let b = block(&["1", "2", "3K", "4", "5"]);
        let d = Delimiters::new(&["1"], &["5", "5B"]);
        let spans = sub_blocks_delimited_with_optional_tail(&b, &d);
        assert_eq!(spans.len(), 1);
        assert_eq!(names(&spans[0]), vec!["1", "2", "3K", "4", "5"]);
    }

    #[test]
    fn test_end_before_start_is_noise() {
        let b = block(&["4", "3", "2", "5"]);
        let d = Delimiters::new(&["1", "2"], &["4", "5"]).with_tail(&["3"]);
        let spans = sub_blocks_delimited_with_optional_tail(&b, &d);
        assert_eq!(spans.len(), 1);
        assert_eq!(names(&spans[0]), vec!["2", "5"]);
    }

    #[test]
    fn test_tail_tags_included() {
        let b = block(&["20", "21", "22", "23", "23", "99", "21", "22", "23"]);
        let d = Delimiters::new(&["21"], &["22"]).with_tail(&["23"]);
        let spans = sub_blocks_delimited_with_optional_tail(&b, &d);
        assert_eq!(spans.len(), 2);
        assert_eq!(names(&spans[0]), vec!["21", "22", "23", "23"]);
        assert_eq!(names(&spans[1]), vec!["21", "22", "23"]);
    }

    #[test]
    fn test_tail_stops_at_new_start() {
        let b = block(&["61", "86", "61", "86"]);
        let d = Delimiters::new(&["61"], &["61"]).with_tail(&["86", "61"]);
        let spans = sub_blocks_delimited_with_optional_tail(&b, &d);
        assert_eq!(spans.len(), 2);
        assert_eq!(names(&spans[0]), vec!["61", "86"]);
        assert_eq!(names(&spans[1]), vec!["61", "86"]);
    }

    #[test]
    fn test_start_without_end_dropped() {
        let b = block(&["1", "2", "5", "1", "2"]);
        let d = Delimiters::new(&["1"], &["5"]);
        let spans = sub_blocks_delimited_with_optional_tail(&b, &d);
        assert_eq!(spans.len(), 1);
        assert_eq!(names(&spans[0]), vec!["1", "2", "5"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let b = block(&["20", "21"]);
        let d = Delimiters::new(&["1"], &["5"]);
        assert!(sub_blocks_delimited_with_optional_tail(&b, &d).is_empty());
        assert!(sub_block_delimited_with_optional_tail(&b, &d).is_empty());
    }

    #[test]
    fn test_single_span_and_idempotence() {
        let b = block(&["16R", "20C", "16S", "16R", "20C", "16S"]);
        let d = Delimiters::new(&["16R"], &["16S"]);
        let first = sub_block_delimited_with_optional_tail(&b, &d);
        assert_eq!(names(&first), vec!["16R", "20C", "16S"]);
        assert_eq!(
            sub_blocks_delimited_with_optional_tail(&b, &d),
            sub_blocks_delimited_with_optional_tail(&b, &d)
        );
    }
}
