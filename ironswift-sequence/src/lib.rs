/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # IronSwift Sequence
//!
//! Sequence extraction engine for SWIFT MT message bodies.
//!
//! This crate carves the flat tag list of block 4 into the nested sequences of a
//! message type, driven only by declarative descriptors:
//! - **Split by leading field**: [`split_by_letter_option`], [`split_by_name`]
//! - **Delimited with optional tail**: [`sub_blocks_delimited_with_optional_tail`]
//! - **Bracket markers**: [`bracket_sub_block`], [`bracket_sub_blocks`],
//!   [`bracket_direct_content`]
//! - **Index bounds**: [`TagListBlock::slice`], [`TagListBlock::sublist`] and
//!   [`TagListBlock::sub_block_by_index`]
//!
//! Every function is a pure read: the input block is never modified and each
//! returned sub-block is an independent copy.

pub mod bracket;
pub mod delimited;
pub mod descriptor;
pub mod pattern;
pub mod split;

pub use bracket::{BracketMarkers, bracket_direct_content, bracket_sub_block, bracket_sub_blocks};
pub use delimited::{
    Delimiters, sub_block_delimited_with_optional_tail, sub_blocks_delimited_with_optional_tail,
};
pub use descriptor::{SequenceDescriptor, extract};
pub use ironswift_core::block::TagListBlock;
pub use pattern::{NamePattern, NameSet};
pub use split::{split_by_letter_option, split_by_name};
