/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Error types for the IronSwift FIN toolkit.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all IronSwift operations.
//!
//! Malformed message *content* never produces an error: the decoder degrades to
//! a partially populated message plus unparsed text. Errors are reserved for
//! structural violations and programming-contract violations.

use thiserror::Error;

/// Result type alias using [`SwiftError`] as the error type.
pub type Result<T> = std::result::Result<T, SwiftError>;

/// Top-level error type for all IronSwift operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwiftError {
    /// Error while parsing FIN text.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Fixed-width header block content error.
    #[error("value block error: {0}")]
    ValueBlock(#[from] ValueBlockError),

    /// Contract violation on the block/tag model.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Block 5 checksum verification failure.
    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),
}

/// Errors that occur while parsing FIN text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A block was opened with `{` but never closed.
    #[error("unterminated block {name} starting at offset {offset}")]
    UnterminatedBlock {
        /// The block name as read from the input.
        name: String,
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// The same block name appeared twice in one message.
    #[error("duplicate block {name}")]
    DuplicateBlock {
        /// The repeated block name.
        name: String,
    },

    /// Block 1 content rejected in strict mode.
    #[error("block 1: {0}")]
    Block1(ValueBlockError),

    /// Block 2 content rejected in strict mode.
    #[error("block 2: {0}")]
    Block2(ValueBlockError),

    /// Checksum validation was requested and failed.
    #[error("{0}")]
    Checksum(#[from] ChecksumError),
}

/// Errors on the fixed-width positional blocks (block 1 and block 2).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueBlockError {
    /// Block content does not have one of the allowed fixed lengths.
    #[error("invalid length for block {block}: expected {expected}, found {actual}")]
    InvalidLength {
        /// Block number (1 or 2).
        block: u8,
        /// Human readable list of accepted lengths.
        expected: String,
        /// Actual content length.
        actual: usize,
    },

    /// Block 2 does not start with `I` or `O`.
    #[error("invalid block 2 direction: {0:?}")]
    InvalidDirection(char),

    /// Block content is empty.
    #[error("block {block} is empty")]
    Empty {
        /// Block number (1 or 2).
        block: u8,
    },
}

/// Contract violations on the block/tag model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Positional access outside the tag list.
    #[error("index {index} out of bounds for block of {len} tags")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of tags in the block.
        len: usize,
    },

    /// Explicit index range outside the tag list or reversed.
    #[error("invalid range {start}..{end} for block of {len} tags")]
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end as given by the caller.
        end: usize,
        /// Number of tags in the block.
        len: usize,
    },

    /// Tag name is empty or contains a wire delimiter.
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),

    /// Tag value contains the block 4 terminator line.
    #[error("invalid value for tag {name}: contains block terminator")]
    InvalidTagValue {
        /// Name of the offending tag.
        name: String,
    },

    /// User block name is not a single letter or one of the digits 0, 6-9.
    #[error("invalid user block name: {0:?}")]
    InvalidUserBlockName(String),

    /// A user block with the same name is already present.
    #[error("duplicate user block {0}")]
    DuplicateUserBlock(char),

    /// Only blocks 3, 4 and 5 are tag lists.
    #[error("block {0} is not a tag list block")]
    NotTagListBlock(u8),
}

/// Block 5 checksum (`CHK`) failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    /// The message has no block 4 to compute a checksum from.
    #[error("message has no text block")]
    MissingBody,

    /// The message has no `CHK` trailer to compare against.
    #[error("message has no CHK trailer")]
    MissingTrailer,

    /// Calculated and declared checksums differ.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    Mismatch {
        /// Checksum calculated from block 4.
        calculated: String,
        /// Checksum found in block 5.
        declared: String,
    },
}
