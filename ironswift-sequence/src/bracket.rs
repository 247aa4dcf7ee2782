/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Bracket-delimited nested sequences (`16R` / `16S` style).
//!
//! This module provides:
//! - [`BracketMarkers`]: The open and close marker tag names
//! - [`bracket_sub_block`] / [`bracket_sub_blocks`]: Outermost spans for one qualifier
//! - [`bracket_direct_content`]: Tags of a span excluding nested spans
//!
//! A marker's qualifier is its trimmed value (`16R:GENL` opens `GENL`). Depth
//! is counted per qualifier, so an inner span reusing its parent's qualifier
//! does not close the parent early. An opener that is never closed yields a
//! span running to the end of the block.

use ironswift_core::block::TagListBlock;
use ironswift_core::tag::Tag;
use smallvec::SmallVec;
use tracing::debug;

/// Names of the open and close marker tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BracketMarkers<'a> {
    /// Tag name opening a span.
    pub open: &'a str,
    /// Tag name closing a span.
    pub close: &'a str,
}

impl BracketMarkers<'static> {
    /// Generic ISO 15022 start/end of block markers.
    pub const GENERIC: Self = Self {
        open: "16R",
        close: "16S",
    };
}

impl<'a> BracketMarkers<'a> {
    /// Creates custom markers.
    #[must_use]
    pub const fn new(open: &'a str, close: &'a str) -> Self {
        Self { open, close }
    }

    #[inline]
    fn opens(&self, tag: &Tag, qualifier: &str) -> bool {
        tag.name() == self.open && tag.value().trim() == qualifier
    }

    #[inline]
    fn closes(&self, tag: &Tag, qualifier: &str) -> bool {
        tag.name() == self.close && tag.value().trim() == qualifier
    }
}

impl Default for BracketMarkers<'static> {
    fn default() -> Self {
        Self::GENERIC
    }
}

/// Finds the outermost span for `qualifier` opening at or after `from`.
///
/// Returns `[start, stop)`; `stop` is the block length for an unmatched opener.
fn find_span(
    block: &TagListBlock,
    qualifier: &str,
    markers: &BracketMarkers<'_>,
    from: usize,
) -> Option<(usize, usize)> {
    let tags = block.tags();
    let start = (from..tags.len()).find(|&i| markers.opens(&tags[i], qualifier))?;
    let mut depth = 0usize;
    for (i, tag) in tags.iter().enumerate().skip(start) {
        if markers.opens(tag, qualifier) {
            depth += 1;
        } else if markers.closes(tag, qualifier) {
            depth -= 1;
            if depth == 0 {
                return Some((start, i + 1));
            }
        }
    }
    debug!(qualifier, index = start, "unmatched bracket opener, span runs to end of block");
    Some((start, tags.len()))
}

/// Extracts the first outermost span for `qualifier`, markers included.
///
/// # Arguments
/// * `block` - The tags to search
/// * `qualifier` - Marker value, e.g. `"GENL"`
/// * `markers` - Open and close tag names, usually [`BracketMarkers::GENERIC`]
///
/// # Returns
/// The span, or an empty block when no opener for `qualifier` exists.
///
/// # Example
/// ```
/// use ironswift_core::{Tag, TagListBlock};
/// use ironswift_sequence::{BracketMarkers, bracket_sub_block};
///
/// let block: TagListBlock = [("16R", "X"), ("16R", "X"), ("16S", "X"), ("16S", "X")]
///     .into_iter()
///     .map(|(n, v)| Tag::new(n, v).unwrap())
///     .collect();
/// assert_eq!(bracket_sub_block(&block, "X", &BracketMarkers::GENERIC).len(), 4);
/// ```
#[must_use]
pub fn bracket_sub_block(
    block: &TagListBlock,
    qualifier: &str,
    markers: &BracketMarkers<'_>,
) -> TagListBlock {
    find_span(block, qualifier, markers, 0)
        .map(|(start, stop)| block.slice(start..stop))
        .unwrap_or_default()
}

/// Extracts every outermost span for `qualifier`, in order.
#[must_use]
pub fn bracket_sub_blocks(
    block: &TagListBlock,
    qualifier: &str,
    markers: &BracketMarkers<'_>,
) -> Vec<TagListBlock> {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some((start, stop)) = find_span(block, qualifier, markers, from) {
        spans.push(block.slice(start..stop));
        from = stop;
    }
    spans
}

/// Returns the tags of a span that are not inside a nested span.
///
/// If `block` starts with an opener, that opener and its closer are kept and
/// everything between them at deeper nesting is dropped. Without a leading
/// opener the whole block is treated as the container. Closers that do not
/// match an open qualifier are kept as ordinary content.
#[must_use]
pub fn bracket_direct_content(block: &TagListBlock, markers: &BracketMarkers<'_>) -> TagListBlock {
    let container = block
        .get(0)
        .is_some_and(|tag| tag.name() == markers.open);
    let base = usize::from(container);
    let mut open: SmallVec<[&str; 8]> = SmallVec::new();
    let mut direct = TagListBlock::new();

    for tag in block {
        let qualifier = tag.value().trim();
        if tag.name() == markers.open {
            open.push(qualifier);
            if open.len() <= base {
                direct.append(tag.clone());
            }
        } else if tag.name() == markers.close && open.contains(&qualifier) {
            while let Some(top) = open.pop() {
                if top == qualifier {
                    break;
                }
            }
            if open.len() < base {
                direct.append(tag.clone());
            }
        } else if open.len() <= base {
            direct.append(tag.clone());
        }
    }
    direct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(tags: &[(&str, &str)]) -> TagListBlock {
        tags.iter().map(|(n, v)| Tag::new(*n, *v).unwrap()).collect()
    }

    fn pairs(block: &TagListBlock) -> Vec<(&str, &str)> {
        block.iter().map(|t| (t.name(), t.value())).collect()
    }

    fn mt540() -> TagListBlock {
        block(&[
            ("16R", "GENL"),
            ("20C", ":SEME//REF1"),
            ("16R", "LINK"),
            ("20C", ":PREV//REF0"),
            ("16S", "LINK"),
            ("16S", "GENL"),
            ("16R", "TRADDET"),
            ("98A", ":TRAD//20231018"),
            ("16S", "TRADDET"),
            ("16R", "LINK"),
            ("20C", ":RELA//REF2"),
            ("16S", "LINK"),
        ])
    }

    #[test]
    fn test_nested_same_qualifier_is_one_span() {
        let b = block(&[("16R", "X"), ("16R", "X"), ("16S", "X"), ("16S", "X")]);
        let spans = bracket_sub_blocks(&b, "X", &BracketMarkers::GENERIC);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].len(), 4);
        assert_eq!(spans[0], b);
    }

    #[test]
    fn test_sub_block_by_qualifier() {
        let b = mt540();
        let genl = bracket_sub_block(&b, "GENL", &BracketMarkers::GENERIC);
        assert_eq!(genl.len(), 6);
        assert_eq!(genl.tags()[0].value(), "GENL");
        let trad = bracket_sub_block(&b, "TRADDET", &BracketMarkers::default());
        assert_eq!(pairs(&trad)[1], ("98A", ":TRAD//20231018"));
        assert!(bracket_sub_block(&b, "SETDET", &BracketMarkers::GENERIC).is_empty());
    }

    #[test]
    fn test_sub_blocks_finds_nested_and_top_level() {
        let b = mt540();
        let links = bracket_sub_blocks(&b, "LINK", &BracketMarkers::GENERIC);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].tag_value("20C"), Some(":PREV//REF0"));
        assert_eq!(links[1].tag_value("20C"), Some(":RELA//REF2"));
    }

    #[test]
    fn test_unmatched_opener_runs_to_end() {
        let b = block(&[("20", "A"), ("16R", "X"), ("21", "B"), ("16R", "Y"), ("16S", "Y")]);
        let span = bracket_sub_block(&b, "X", &BracketMarkers::GENERIC);
        assert_eq!(span.len(), 4);
        assert_eq!(span.tags()[0].name(), "16R");
    }

    #[test]
    fn test_qualifier_value_is_trimmed() {
        let b = block(&[("16R", "GENL "), ("20C", "X"), ("16S", "GENL")]);
        assert_eq!(bracket_sub_block(&b, "GENL", &BracketMarkers::GENERIC).len(), 3);
    }

    #[test]
    fn test_direct_content_excludes_nested() {
        let genl = bracket_sub_block(&mt540(), "GENL", &BracketMarkers::GENERIC);
        let direct = bracket_direct_content(&genl, &BracketMarkers::GENERIC);
        assert_eq!(
            pairs(&direct),
            vec![("16R", "GENL"), ("20C", ":SEME//REF1"), ("16S", "GENL")]
        );
    }

    #[test]
    fn test_direct_content_same_qualifier_nesting() {
        let b = block(&[("16R", "X"), ("20", "A"), ("16R", "X"), ("21", "B"), ("16S", "X"), ("22", "C"), ("16S", "X")]);
        let direct = bracket_direct_content(&b, &BracketMarkers::GENERIC);
        let names: Vec<&str> = direct.iter().map(Tag::name).collect();
        assert_eq!(names, vec!["16R", "20", "22", "16S"]);
    }

    #[test]
    fn test_direct_content_without_container() {
        let b = block(&[("20", "A"), ("16R", "X"), ("21", "B"), ("16S", "X"), ("22", "C")]);
        let direct = bracket_direct_content(&b, &BracketMarkers::GENERIC);
        let names: Vec<&str> = direct.iter().map(Tag::name).collect();
        assert_eq!(names, vec!["20", "22"]);
    }

    #[test]
    fn test_custom_markers() {
        let markers = BracketMarkers::new("16A", "16B");
        let b = block(&[("16A", "SEQ"), ("20", "A"), ("16B", "SEQ")]);
        assert_eq!(bracket_sub_block(&b, "SEQ", &markers).len(), 3);
    }
}
