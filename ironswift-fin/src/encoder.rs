/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! FIN message encoder.
//!
//! This module provides an encoder that writes a [`Message`] back to FIN text.
//! Blocks are written in ascending order and user blocks follow block 5 in the
//! order they were added. Unparsed text goes back where it was read.

use bytes::{BufMut, BytesMut};
use ironswift_core::block::TagListBlock;
use ironswift_core::message::{Block4Form, Message};
use ironswift_core::tag::Tag;

/// Canonical line terminator.
pub const CRLF: &[u8] = b"\r\n";

/// Block 4 terminator written after the last line.
pub const BLOCK4_TERMINATOR: &[u8] = b"-}";

/// FIN message encoder.
#[derive(Debug)]
pub struct Encoder {
    buf: BytesMut,
}

impl Encoder {
    /// Creates a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Creates a new encoder with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial buffer capacity in bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Appends a complete message.
    ///
    /// Message-level unparsed text is written after the number of blocks it
    /// was recorded to follow.
    pub fn encode(&mut self, message: &Message) {
        let mut texts = MessageTexts::new(message);
        if let Some(block1) = message.block1() {
            texts.put_before_block(&mut self.buf);
            self.put_value_block(b'1', &block1.value());
        }
        if let Some(block2) = message.block2() {
            texts.put_before_block(&mut self.buf);
            self.put_value_block(b'2', &block2.value());
        }
        if let Some(block3) = message.block3() {
            texts.put_before_block(&mut self.buf);
            self.put_tag_block(b'3', block3);
        }
        if let Some(block4) = message.block4() {
            texts.put_before_block(&mut self.buf);
            if uses_brace_block4(message) {
                self.put_tag_block(b'4', block4);
            } else {
                self.put_text_block4(block4);
            }
        }
        if let Some(block5) = message.block5() {
            texts.put_before_block(&mut self.buf);
            self.put_tag_block(b'5', block5);
        }
        for user in message.user_blocks() {
            texts.put_before_block(&mut self.buf);
            let mut name = [0u8; 4];
            let name = user.name().as_char().encode_utf8(&mut name);
            self.put_tag_block_named(name.as_bytes(), user.block());
        }
        texts.put_rest(&mut self.buf);
    }

    /// Appends a fixed-width block: `{N:value}`.
    #[inline]
    pub fn put_value_block(&mut self, number: u8, value: &str) {
        self.buf.put_u8(b'{');
        self.buf.put_u8(number);
        self.buf.put_u8(b':');
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(b'}');
    }

    /// Appends a tag list block in brace form: `{N:{name:value}...}`.
    #[inline]
    pub fn put_tag_block(&mut self, number: u8, block: &TagListBlock) {
        self.put_tag_block_named(&[number], block);
    }

    fn put_tag_block_named(&mut self, name: &[u8], block: &TagListBlock) {
        self.buf.put_u8(b'{');
        self.buf.put_slice(name);
        self.buf.put_u8(b':');
        for text in block.leading_unparsed_texts().into_iter().flatten() {
            self.buf.put_slice(text.as_bytes());
        }
        for tag in block {
            self.buf.put_u8(b'{');
            self.buf.put_slice(tag.name().as_bytes());
            self.buf.put_u8(b':');
            self.buf.put_slice(tag.value().as_bytes());
            self.buf.put_u8(b'}');
            for text in tag.unparsed_texts().into_iter().flatten() {
                self.buf.put_slice(text.as_bytes());
            }
        }
        for text in block.unparsed_texts().into_iter().flatten() {
            self.buf.put_slice(text.as_bytes());
        }
        self.buf.put_u8(b'}');
    }

    /// Appends block 4 in text form: `{4:` CRLF, one `:name:value` line group
    /// per tag, then `-}`.
    pub fn put_text_block4(&mut self, block: &TagListBlock) {
        self.buf.put_slice(b"{4:");
        self.buf.put_slice(CRLF);
        for text in block.leading_unparsed_texts().into_iter().flatten() {
            self.buf.put_slice(text.as_bytes());
            self.buf.put_slice(CRLF);
        }
        for tag in block {
            self.put_text_tag(tag);
        }
        for text in block.unparsed_texts().into_iter().flatten() {
            self.buf.put_slice(text.as_bytes());
            self.buf.put_slice(CRLF);
        }
        self.buf.put_slice(BLOCK4_TERMINATOR);
    }

    fn put_text_tag(&mut self, tag: &Tag) {
        self.buf.put_u8(b':');
        self.buf.put_slice(tag.name().as_bytes());
        self.buf.put_u8(b':');
        self.buf.put_slice(tag.value().as_bytes());
        self.buf.put_slice(CRLF);
        for text in tag.unparsed_texts().into_iter().flatten() {
            self.buf.put_slice(text.as_bytes());
            self.buf.put_slice(CRLF);
        }
    }

    /// Returns the number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finalizes the encoder and returns the encoded bytes.
    #[must_use]
    pub fn finish(self) -> BytesMut {
        self.buf
    }

    /// Finalizes the encoder and returns the encoded text.
    #[must_use]
    pub fn finish_string(self) -> String {
        // Only UTF-8 string data is ever written, so the conversion is lossless.
        String::from_utf8_lossy(&self.buf).into_owned()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Message-level unparsed texts still to be written, in recorded order.
struct MessageTexts<'a> {
    message: &'a Message,
    next: usize,
    blocks_written: usize,
}

impl<'a> MessageTexts<'a> {
    const fn new(message: &'a Message) -> Self {
        Self {
            message,
            next: 0,
            blocks_written: 0,
        }
    }

    /// Writes the texts that precede the next block, then counts that block.
    fn put_before_block(&mut self, buf: &mut BytesMut) {
        let Some(texts) = self.message.unparsed_texts() else {
            self.blocks_written += 1;
            return;
        };
        while let Some(text) = texts.get(self.next) {
            let due = self
                .message
                .unparsed_text_position(self.next)
                .is_some_and(|position| position <= self.blocks_written);
            if !due {
                break;
            }
            buf.put_slice(text.as_bytes());
            self.next += 1;
        }
        self.blocks_written += 1;
    }

    fn put_rest(&mut self, buf: &mut BytesMut) {
        let Some(texts) = self.message.unparsed_texts() else {
            return;
        };
        while let Some(text) = texts.get(self.next) {
            buf.put_slice(text.as_bytes());
            self.next += 1;
        }
    }
}

/// Returns true if block 4 of `message` is written in brace form.
///
/// System and service messages (service identifier other than `01`, or a
/// category 0 message type) carry their body as `{name:value}` sub-blocks.
/// When neither header is present the form the block was read in is kept.
#[must_use]
pub fn uses_brace_block4(message: &Message) -> bool {
    if message.is_service_message() || message.is_system_message() {
        return true;
    }
    message.block1().is_none()
        && message.block2().is_none()
        && message.block4_form() == Block4Form::Brace
}

/// Serializes a message to FIN text.
///
/// # Example
/// ```
/// use ironswift_fin::{parse, serialize};
///
/// let text = "{1:F01BANKBEBBAXXX0000000000}{4:\r\n:20:REF\r\n-}";
/// let message = parse(text).unwrap();
/// assert_eq!(serialize(&message), text);
/// ```
#[must_use]
pub fn serialize(message: &Message) -> String {
    let mut encoder = Encoder::new();
    encoder.encode(message);
    encoder.finish_string()
}

/// Returns block 4 as it is written for `message`, or `None` if absent.
#[must_use]
pub fn encode_block4(message: &Message) -> Option<BytesMut> {
    let block4 = message.block4()?;
    let mut encoder = Encoder::with_capacity(256);
    if uses_brace_block4(message) {
        encoder.put_tag_block(b'4', block4);
    } else {
        encoder.put_text_block4(block4);
    }
    Some(encoder.finish())
}
