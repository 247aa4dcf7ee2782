/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Declarative sequence descriptors.
//!
//! A message type describes its sequences as data, one [`SequenceDescriptor`]
//! per sequence, and hands them to [`extract`]. Descriptors only borrow static
//! name tables, so they can be declared as constants:
//!
//! ```
//! use ironswift_sequence::{BracketMarkers, Delimiters, SequenceDescriptor};
//!
//! const GENERAL_INFORMATION: SequenceDescriptor<'static> = SequenceDescriptor::Bracket {
//!     qualifier: "GENL",
//!     markers: BracketMarkers::GENERIC,
//! };
//! const STATEMENT_LINE: SequenceDescriptor<'static> =
//!     SequenceDescriptor::Delimited(Delimiters::new(&["61"], &["61"]).with_tail(&["86"]));
//! ```

use crate::bracket::{BracketMarkers, bracket_sub_blocks};
use crate::delimited::{Delimiters, sub_blocks_delimited_with_optional_tail};
use crate::split::{split_by_letter_option, split_by_name};
use ironswift_core::block::TagListBlock;

/// How one sequence is carved out of a flat tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceDescriptor<'a> {
    /// The sub-block opened by tag `number` with letter option `letter`
    /// (e.g. sequence B of an MT 300 opened by `15B`).
    LetterOption {
        /// Boundary tag number.
        number: u32,
        /// Letter option selecting the sequence.
        letter: char,
    },
    /// Repeating groups, each opened by a tag matching `name`.
    Repeating {
        /// Descriptor name of the opening tag.
        name: &'a str,
    },
    /// START/END delimited spans with an optional tail.
    Delimited(Delimiters<'a>),
    /// Outermost bracket spans for a qualifier.
    Bracket {
        /// Marker value, e.g. `"GENL"`.
        qualifier: &'a str,
        /// Open and close marker names.
        markers: BracketMarkers<'a>,
    },
    /// Tags at positions `start..end`, clamped to the block.
    IndexRange {
        /// First position.
        start: usize,
        /// Position after the last one.
        end: usize,
    },
}

impl SequenceDescriptor<'_> {
    /// See [`extract`].
    #[must_use]
    pub fn extract(&self, block: &TagListBlock) -> Vec<TagListBlock> {
        extract(block, self)
    }

    /// Returns the first matching sub-block, or an empty block.
    #[must_use]
    pub fn extract_first(&self, block: &TagListBlock) -> TagListBlock {
        extract(block, self).into_iter().next().unwrap_or_default()
    }
}

/// Extracts the sub-blocks described by `descriptor`.
///
/// The input is never modified and the result shares nothing with it. No
/// match gives an empty vector.
#[must_use]
pub fn extract(block: &TagListBlock, descriptor: &SequenceDescriptor<'_>) -> Vec<TagListBlock> {
    match *descriptor {
        SequenceDescriptor::LetterOption { number, letter } => {
            split_by_letter_option(block, number)
                .remove(&letter)
                .into_iter()
                .collect()
        }
        SequenceDescriptor::Repeating { name } => split_by_name(block, name),
        SequenceDescriptor::Delimited(ref delimiters) => {
            sub_blocks_delimited_with_optional_tail(block, delimiters)
        }
        SequenceDescriptor::Bracket {
            qualifier,
            ref markers,
        } => bracket_sub_blocks(block, qualifier, markers),
        SequenceDescriptor::IndexRange { start, end } => {
            let range = block.slice(start..end.max(start));
            if range.is_empty() {
                Vec::new()
            } else {
                vec![range]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironswift_core::tag::Tag;

    const SEQ_B: SequenceDescriptor<'static> = SequenceDescriptor::LetterOption {
        number: 15,
        letter: 'B',
    };
    const STATEMENT_LINE: SequenceDescriptor<'static> =
        SequenceDescriptor::Delimited(Delimiters::new(&["61"], &["61"]).with_tail(&["86"]));
    const LINKAGES: SequenceDescriptor<'static> = SequenceDescriptor::Bracket {
        qualifier: "LINK",
        markers: BracketMarkers::GENERIC,
    };

    fn block(tags: &[(&str, &str)]) -> TagListBlock {
        tags.iter().map(|(n, v)| Tag::new(*n, *v).unwrap()).collect()
    }

    #[test]
    fn test_letter_option_descriptor() {
        let b = block(&[("15A", ""), ("20", "A"), ("15B", ""), ("30T", "20231018")]);
        let seqs = SEQ_B.extract(&b);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].tag_value("30T"), Some("20231018"));
        let missing = SequenceDescriptor::LetterOption { number: 15, letter: 'C' };
        assert!(missing.extract(&b).is_empty());
        assert!(missing.extract_first(&b).is_empty());
    }

    #[test]
    fn test_statement_lines() {
        let b = block(&[
            ("20", "STMT"),
            ("60F", "C231017EUR100,"),
            ("61", "2310181018C10,NTRFNONREF"),
            ("86", "FIRST"),
            ("61", "2310181018D5,NTRFNONREF"),
            ("61", "2310181018C1,NTRFNONREF"),
            ("86", "THIRD"),
            ("62F", "C231018EUR106,"),
        ]);
        let lines = extract(&b, &STATEMENT_LINE);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].tag_value("86"), Some("FIRST"));
        assert_eq!(lines[1].len(), 1);
        assert_eq!(lines[2].tag_value("86"), Some("THIRD"));

        let repeating = SequenceDescriptor::Repeating { name: "61" }.extract(&b);
        assert_eq!(repeating[2].len(), 3);
    }

    #[test]
    fn test_bracket_descriptor() {
        let b = block(&[
            ("16R", "GENL"),
            ("16R", "LINK"),
            ("20C", ":PREV//A"),
            ("16S", "LINK"),
            ("16S", "GENL"),
        ]);
        let links = LINKAGES.extract(&b);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].len(), 3);
    }

    #[test]
    fn test_index_range_descriptor() {
        let b = block(&[("20", "A"), ("21", "B"), ("22", "C")]);
        let mid = SequenceDescriptor::IndexRange { start: 1, end: 10 }.extract(&b);
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0].len(), 2);
        assert!(SequenceDescriptor::IndexRange { start: 5, end: 9 }.extract(&b).is_empty());
        assert!(SequenceDescriptor::IndexRange { start: 2, end: 1 }.extract(&b).is_empty());
    }

    #[test]
    fn test_extract_is_repeatable() {
        let b = block(&[("15A", ""), ("20", "A"), ("15B", "")]);
        let before = b.clone();
        assert_eq!(SEQ_B.extract(&b), SEQ_B.extract(&b));
        assert_eq!(b, before);
    }
}
