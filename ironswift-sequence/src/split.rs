/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Split-by-leading-field extraction.
//!
//! Boundary tags cut the block into consecutive sub-blocks; each sub-block
//! starts at a boundary tag and runs up to, not including, the next one. Tags
//! before the first boundary belong to no sub-block.

use crate::pattern::NamePattern;
use ironswift_core::block::TagListBlock;
use ironswift_core::tag::Tag;
use std::collections::BTreeMap;
use tracing::debug;

/// Returns the index ranges delimited by tags matching `is_boundary`.
fn boundary_spans(block: &TagListBlock, is_boundary: impl Fn(&Tag) -> bool) -> Vec<(usize, usize)> {
    let starts: Vec<usize> = block
        .iter()
        .enumerate()
        .filter(|(_, tag)| is_boundary(tag))
        .map(|(i, _)| i)
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(k, &start)| (start, starts.get(k + 1).copied().unwrap_or(block.len())))
        .collect()
}

/// Splits a block by the letter option of tag `number`.
///
/// Every tag numbered `number` with a letter option (`15A`, `15B`, ...) opens
/// the sub-block for its letter. Letters that never appear are simply absent
/// from the map. If a letter repeats, the first sub-block for it is kept.
///
/// # Arguments
/// * `block` - The tags to split, typically block 4
/// * `number` - The boundary tag number, e.g. `15`
///
/// # Example
/// ```
/// use ironswift_core::{Tag, TagListBlock};
/// use ironswift_sequence::split_by_letter_option;
///
/// let block: TagListBlock = [("15A", ""), ("20", "REF"), ("15B", ""), ("30T", "20231018")]
///     .into_iter()
///     .map(|(n, v)| Tag::new(n, v).unwrap())
///     .collect();
/// let sequences = split_by_letter_option(&block, 15);
/// assert_eq!(sequences[&'A'].len(), 2);
/// assert_eq!(sequences[&'B'].len(), 2);
/// ```
#[must_use]
pub fn split_by_letter_option(block: &TagListBlock, number: u32) -> BTreeMap<char, TagListBlock> {
    let mut result = BTreeMap::new();
    for (start, end) in boundary_spans(block, |tag| {
        tag.is_number(number) && tag.letter_option().is_some()
    }) {
        let Some(letter) = block.get(start).and_then(Tag::letter_option) else {
            continue;
        };
        if result.contains_key(&letter) {
            debug!(number, %letter, index = start, "repeated sequence letter ignored");
            continue;
        }
        result.insert(letter, block.slice(start..end));
    }
    result
}

/// Splits a block into the repeating groups opened by tags matching `name`.
///
/// `name` is a descriptor name (`"61"`, `"15A"`, `"50a"`). Each group starts
/// at a matching tag and runs up to the next one or the end of the block.
#[must_use]
pub fn split_by_name(block: &TagListBlock, name: &str) -> Vec<TagListBlock> {
    let pattern = NamePattern::parse(name);
    boundary_spans(block, |tag| pattern.matches(tag))
        .into_iter()
        .map(|(start, end)| block.slice(start..end))
        .collect()
}
