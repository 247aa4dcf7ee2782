/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # IronSwift Core
//!
//! Block and tag model, header blocks and error definitions for SWIFT FIN messages.
//!
//! This crate provides the building blocks shared by every IronSwift crate:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Tag model**: [`Tag`], [`TagListBlock`] and [`UnparsedTextList`]
//! - **Header blocks**: [`Block1`] and the [`Block2`] input/output union
//! - **Message**: [`Message`] with optional blocks 1 to 5 and user blocks
//! - **Core types**: [`LogicalTerminal`], [`UserBlockName`], [`Priority`]
//!
//! ## Copy Semantics
//!
//! Every sub-range operation on a [`TagListBlock`] returns a new owned block.
//! Extracted sequences share no state with their parent.

pub mod block;
pub mod error;
pub mod header;
pub mod message;
pub mod tag;
pub mod types;
pub mod unparsed;

pub use block::TagListBlock;
pub use error::{ChecksumError, ModelError, ParseError, Result, SwiftError, ValueBlockError};
pub use header::{Block1, Block2, Block2Input, Block2Output};
pub use message::{Block4Form, Message, UserBlock};
pub use tag::{Tag, canonicalize_crlf};
pub use types::{DeliveryMonitoring, LogicalTerminal, Priority, UserBlockName};
pub use unparsed::UnparsedTextList;
