/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! FIN message model.
//!
//! This module provides:
//! - [`Message`]: Optional blocks 1 to 5, user blocks and message-level unparsed text
//! - [`UserBlock`]: A named tag list block appended after block 5
//! - [`Block4Form`]: The layout block 4 was read in
//!
//! A block that was never populated is `None`, never an empty block, so the
//! encoder can omit it entirely.

use crate::block::TagListBlock;
use crate::error::ModelError;
use crate::header::{Block1, Block2};
use crate::types::UserBlockName;
use crate::unparsed::UnparsedTextList;
use serde::{Deserialize, Serialize};

/// Block 3 tag carrying the message user reference.
pub const TAG_MUR: &str = "108";
/// Block 3 tag carrying the validation flag.
pub const TAG_VALIDATION_FLAG: &str = "119";
/// Block 3 tag carrying the unique end-to-end transaction reference.
pub const TAG_UETR: &str = "121";
/// Block 4 tag of a service message carrying the accept/reject flag.
pub const TAG_ACCEPT_REJECT: &str = "451";
/// Service identifier of ACK/NAK messages.
pub const SERVICE_ACK_NAK: &str = "21";

/// User-defined block written after block 5.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserBlock {
    name: UserBlockName,
    block: TagListBlock,
}

impl UserBlock {
    /// Creates a user block.
    #[must_use]
    pub const fn new(name: UserBlockName, block: TagListBlock) -> Self {
        Self { name, block }
    }

    /// Returns the block name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> UserBlockName {
        self.name
    }

    /// Returns the block tags.
    #[inline]
    #[must_use]
    pub const fn block(&self) -> &TagListBlock {
        &self.block
    }

    /// Returns the block tags for mutation.
    #[inline]
    pub fn block_mut(&mut self) -> &mut TagListBlock {
        &mut self.block
    }
}

/// Layout of the text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block4Form {
    /// `{4:` CRLF, `:name:value` lines, `-}`.
    #[default]
    Text,
    /// `{4:{name:value}...}` as used by system and service messages.
    Brace,
}

impl Block4Form {
    /// Returns true for the line-oriented form.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

/// A FIN message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    block1: Option<Block1>,
    block2: Option<Block2>,
    block3: Option<TagListBlock>,
    block4: Option<TagListBlock>,
    block5: Option<TagListBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    user_blocks: Vec<UserBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unparsed: Option<UnparsedTextList>,
    /// Per unparsed text, the number of blocks it follows. `None` is after all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    unparsed_positions: Vec<Option<usize>>,
    #[serde(default, skip_serializing_if = "Block4Form::is_text")]
    block4_form: Block4Form,
}

impl Message {
    /// Creates a message with no blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no block and no unparsed text is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.block1.is_none()
            && self.block2.is_none()
            && self.block3.is_none()
            && self.block4.is_none()
            && self.block5.is_none()
            && self.user_blocks.is_empty()
            && self.unparsed.is_none()
    }

    /// Returns the basic header block.
    #[inline]
    #[must_use]
    pub const fn block1(&self) -> Option<&Block1> {
        self.block1.as_ref()
    }

    /// Returns the application header block.
    #[inline]
    #[must_use]
    pub const fn block2(&self) -> Option<&Block2> {
        self.block2.as_ref()
    }

    /// Returns the user header block.
    #[inline]
    #[must_use]
    pub const fn block3(&self) -> Option<&TagListBlock> {
        self.block3.as_ref()
    }

    /// Returns the text block (message body).
    #[inline]
    #[must_use]
    pub const fn block4(&self) -> Option<&TagListBlock> {
        self.block4.as_ref()
    }

    /// Returns the trailer block.
    #[inline]
    #[must_use]
    pub const fn block5(&self) -> Option<&TagListBlock> {
        self.block5.as_ref()
    }

    /// Returns tag list block `number` (3, 4 or 5).
    ///
    /// # Returns
    /// `None` when the block is absent or `number` is not a tag list block.
    #[must_use]
    pub fn block(&self, number: u8) -> Option<&TagListBlock> {
        match number {
            3 => self.block3.as_ref(),
            4 => self.block4.as_ref(),
            5 => self.block5.as_ref(),
            _ => None,
        }
    }

    /// Returns tag list block `number` (3, 4 or 5) for mutation.
    pub fn block_mut(&mut self, number: u8) -> Option<&mut TagListBlock> {
        match number {
            3 => self.block3.as_mut(),
            4 => self.block4.as_mut(),
            5 => self.block5.as_mut(),
            _ => None,
        }
    }

    /// Sets tag list block `number`, returning the block it replaces.
    ///
    /// # Errors
    /// Returns [`ModelError::NotTagListBlock`] unless `number` is 3, 4 or 5.
    pub fn set_block(
        &mut self,
        number: u8,
        block: TagListBlock,
    ) -> Result<Option<TagListBlock>, ModelError> {
        let slot = match number {
            3 => &mut self.block3,
            4 => &mut self.block4,
            5 => &mut self.block5,
            other => return Err(ModelError::NotTagListBlock(other)),
        };
        Ok(slot.replace(block))
    }

    /// Removes tag list block `number`, returning it.
    pub fn remove_block(&mut self, number: u8) -> Option<TagListBlock> {
        match number {
            3 => self.block3.take(),
            4 => self.block4.take(),
            5 => self.block5.take(),
            _ => None,
        }
    }

    /// Sets the basic header block.
    pub fn set_block1(&mut self, block: Block1) {
        self.block1 = Some(block);
    }

    /// Sets the application header block.
    pub fn set_block2(&mut self, block: impl Into<Block2>) {
        self.block2 = Some(block.into());
    }

    /// Builder form of [`Message::set_block1`].
    #[must_use]
    pub fn with_block1(mut self, block: Block1) -> Self {
        self.set_block1(block);
        self
    }

    /// Builder form of [`Message::set_block2`].
    #[must_use]
    pub fn with_block2(mut self, block: impl Into<Block2>) -> Self {
        self.set_block2(block);
        self
    }

    /// Sets block 3.
    #[must_use]
    pub fn with_block3(mut self, block: TagListBlock) -> Self {
        self.block3 = Some(block);
        self
    }

    /// Sets block 4.
    #[must_use]
    pub fn with_block4(mut self, block: TagListBlock) -> Self {
        self.block4 = Some(block);
        self
    }

    /// Sets block 5.
    #[must_use]
    pub fn with_block5(mut self, block: TagListBlock) -> Self {
        self.block5 = Some(block);
        self
    }

    /// Returns the layout block 4 was read in.
    #[inline]
    #[must_use]
    pub const fn block4_form(&self) -> Block4Form {
        self.block4_form
    }

    /// Records the layout of block 4. The header takes precedence when it
    /// marks a system or service message.
    pub fn set_block4_form(&mut self, form: Block4Form) {
        self.block4_form = form;
    }

    /// Builder form of [`Message::set_block4_form`].
    #[must_use]
    pub fn with_block4_form(mut self, form: Block4Form) -> Self {
        self.block4_form = form;
        self
    }

    /// Returns the number of blocks present, user blocks included.
    #[must_use]
    pub fn block_count(&self) -> usize {
        usize::from(self.block1.is_some())
            + usize::from(self.block2.is_some())
            + usize::from(self.block3.is_some())
            + usize::from(self.block4.is_some())
            + usize::from(self.block5.is_some())
            + self.user_blocks.len()
    }

    /// Returns the user blocks in the order they were added.
    #[inline]
    #[must_use]
    pub fn user_blocks(&self) -> &[UserBlock] {
        &self.user_blocks
    }

    /// Returns the user block named `name`.
    #[must_use]
    pub fn user_block(&self, name: &str) -> Option<&TagListBlock> {
        let name = UserBlockName::new(name).ok()?;
        self.user_blocks
            .iter()
            .find(|b| b.name == name)
            .map(UserBlock::block)
    }

    /// Appends a user block.
    ///
    /// # Errors
    /// Returns [`ModelError::DuplicateUserBlock`] if a block with that name exists.
    pub fn add_user_block(
        &mut self,
        name: UserBlockName,
        block: TagListBlock,
    ) -> Result<(), ModelError> {
        if self.user_blocks.iter().any(|b| b.name == name) {
            return Err(ModelError::DuplicateUserBlock(name.as_char()));
        }
        self.user_blocks.push(UserBlock::new(name, block));
        Ok(())
    }

    /// Removes the user block named `name`, returning its tags.
    pub fn remove_user_block(&mut self, name: UserBlockName) -> Option<TagListBlock> {
        let index = self.user_blocks.iter().position(|b| b.name == name)?;
        Some(self.user_blocks.remove(index).block)
    }

    /// Returns the message-level unparsed texts.
    #[must_use]
    pub fn unparsed_texts(&self) -> Option<&UnparsedTextList> {
        self.unparsed.as_ref()
    }

    /// Appends a message-level unparsed text, written after every block.
    pub fn add_unparsed_text(&mut self, text: impl Into<String>) {
        self.push_unparsed(None, text.into());
    }

    /// Appends a message-level unparsed text written after the first
    /// `position` blocks, in the order blocks are written.
    pub fn add_unparsed_text_at(&mut self, position: usize, text: impl Into<String>) {
        self.push_unparsed(Some(position), text.into());
    }

    /// Returns how many blocks precede the message-level unparsed text at
    /// `index`, or `None` when it is written after every block.
    #[must_use]
    pub fn unparsed_text_position(&self, index: usize) -> Option<usize> {
        self.unparsed_positions.get(index).copied().flatten()
    }

    fn push_unparsed(&mut self, position: Option<usize>, text: String) {
        let texts = self.unparsed.get_or_insert_with(UnparsedTextList::new);
        self.unparsed_positions.resize(texts.len(), None);
        texts.push(text);
        self.unparsed_positions.push(position);
    }

    /// Returns the 3-digit message type from block 2.
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        self.block2.as_ref().and_then(Block2::message_type)
    }

    /// Returns the message category (first digit of the message type).
    #[must_use]
    pub fn category(&self) -> Option<char> {
        self.message_type().and_then(|mt| mt.chars().next())
    }

    /// Returns true if block 2 is an input header.
    #[must_use]
    pub fn is_input(&self) -> bool {
        self.block2.as_ref().is_some_and(Block2::is_input)
    }

    /// Returns true if block 2 is an output header.
    #[must_use]
    pub fn is_output(&self) -> bool {
        self.block2.as_ref().is_some_and(Block2::is_output)
    }

    /// Returns the sender BIC11.
    ///
    /// For input messages this is the block 1 logical terminal; for output
    /// messages it is the logical terminal of the MIR in block 2.
    #[must_use]
    pub fn sender(&self) -> Option<String> {
        match self.block2.as_ref() {
            Some(Block2::Output(output)) => output.mir_logical_terminal().map(|lt| lt.bic11()),
            _ => self.block1.as_ref().and_then(Block1::sender_bic),
        }
    }

    /// Returns the receiver BIC11.
    ///
    /// For input messages this is the block 2 receiver address; for output
    /// messages it is the block 1 logical terminal.
    #[must_use]
    pub fn receiver(&self) -> Option<String> {
        match self.block2.as_ref()? {
            Block2::Input(input) => input.receiver().map(|lt| lt.bic11()),
            Block2::Output(_) => self.block1.as_ref().and_then(Block1::sender_bic),
        }
    }

    fn block3_value(&self, name: &str) -> Option<&str> {
        self.block3.as_ref().and_then(|b| b.tag_value(name))
    }

    /// Message user reference (block 3 tag 108).
    #[must_use]
    pub fn mur(&self) -> Option<&str> {
        self.block3_value(TAG_MUR)
    }

    /// Unique end-to-end transaction reference (block 3 tag 121).
    #[must_use]
    pub fn uetr(&self) -> Option<&str> {
        self.block3_value(TAG_UETR)
    }

    /// Validation flag (block 3 tag 119), e.g. `STP` or `COV`.
    #[must_use]
    pub fn validation_flag(&self) -> Option<&str> {
        self.block3_value(TAG_VALIDATION_FLAG)
    }

    /// Returns true if block 1 carries a service identifier other than `01`.
    #[must_use]
    pub fn is_service_message(&self) -> bool {
        self.block1.as_ref().is_some_and(Block1::is_service_message)
    }

    /// Returns true for a category 0 (system) message.
    #[must_use]
    pub fn is_system_message(&self) -> bool {
        self.category() == Some('0')
    }

    fn accept_reject_flag(&self) -> Option<&str> {
        let service = self.block1.as_ref()?.service_id()?;
        if service != SERVICE_ACK_NAK {
            return None;
        }
        self.block4.as_ref()?.tag_value(TAG_ACCEPT_REJECT)
    }

    /// Returns true for a positive acknowledgment (service 21, tag 451 = `0`).
    #[must_use]
    pub fn is_ack(&self) -> bool {
        self.accept_reject_flag() == Some("0")
    }

    /// Returns true for a negative acknowledgment (service 21, tag 451 = `1`).
    #[must_use]
    pub fn is_nack(&self) -> bool {
        self.accept_reject_flag() == Some("1")
    }
}
