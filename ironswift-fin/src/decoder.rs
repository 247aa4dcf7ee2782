/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! FIN message decoder.
//!
//! This module provides a tolerant decoder that turns FIN text into a
//! [`Message`]. Content that does not fit the block or tag grammar is kept as
//! unparsed text on the message, the block or the preceding tag. Only an
//! unterminated block, a repeated block name, strict-mode header violations and
//! a requested checksum verification can make decoding fail.

use crate::checksum::{CHECKSUM_TAG, verify_checksum};
use crate::config::ParserConfig;
use ironswift_core::block::TagListBlock;
use ironswift_core::error::ParseError;
use ironswift_core::header::{Block1, Block2};
use ironswift_core::message::{Block4Form, Message};
use ironswift_core::tag::Tag;
use ironswift_core::types::UserBlockName;
use ironswift_core::unparsed::UnparsedTextList;
use memchr::{memchr, memchr2_iter, memmem};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

/// Opening brace of a block.
pub const BLOCK_OPEN: u8 = b'{';

/// Closing brace of a block.
pub const BLOCK_CLOSE: u8 = b'}';

/// Separator between a block or tag name and its content.
pub const NAME_SEPARATOR: u8 = b':';

/// FIN message decoder.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Input text.
    input: &'a str,
    /// Current position in the input.
    offset: usize,
    /// Decoding options.
    config: ParserConfig,
}

impl<'a> Decoder<'a> {
    /// Creates a new decoder with the default (lenient) configuration.
    ///
    /// # Arguments
    /// * `input` - The FIN text to decode
    #[inline]
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            config: ParserConfig::new(),
        }
    }

    /// Sets the decoding options.
    #[inline]
    #[must_use]
    pub const fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets whether header blocks are parsed leniently.
    #[inline]
    #[must_use]
    pub const fn with_lenient(mut self, lenient: bool) -> Self {
        self.config.lenient = lenient;
        self
    }

    /// Sets whether a declared block 5 checksum is verified.
    #[inline]
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.config.validate_checksum = validate;
        self
    }

    /// Decodes the input into a message.
    ///
    /// A second block 1 starts an appended message: the text from there to the
    /// end of the input is kept verbatim as message-level unparsed text.
    ///
    /// # Errors
    /// Returns [`ParseError::UnterminatedBlock`] if a block is never closed,
    /// [`ParseError::DuplicateBlock`] if a block name repeats, header errors in
    /// strict mode, and [`ParseError::Checksum`] when checksum validation is
    /// enabled and fails.
    pub fn decode(&mut self) -> Result<Message, ParseError> {
        let mut message = Message::new();
        let mut seen: SmallVec<[char; 8]> = SmallVec::new();
        let bytes = self.input.as_bytes();

        while self.offset < bytes.len() {
            let Some(rel) = memchr(BLOCK_OPEN, &bytes[self.offset..]) else {
                self.keep_gap(&mut message, &self.input[self.offset..]);
                self.offset = bytes.len();
                break;
            };
            let open = self.offset + rel;
            self.keep_gap(&mut message, &self.input[self.offset..open]);

            let header = BlockHeader::read(self.input, open);
            let name = header.as_ref().map_or("", |h| h.name);

            if name == "1" && seen.contains(&'1') {
                debug!(offset = open, "appended message kept as unparsed text");
                message.add_unparsed_text_at(message.block_count(), &self.input[open..]);
                self.offset = bytes.len();
                break;
            }

            let Some(header) = header.filter(BlockHeader::is_known) else {
                let close = find_closing_brace(bytes, open).ok_or_else(|| {
                    ParseError::UnterminatedBlock {
                        name: name.to_string(),
                        offset: open,
                    }
                })?;
                warn!(offset = open, name, "unknown block kept as unparsed text");
                message.add_unparsed_text_at(message.block_count(), &self.input[open..=close]);
                self.offset = close + 1;
                continue;
            };

            let block_char = header.block_char();
            if seen.contains(&block_char) {
                return Err(ParseError::DuplicateBlock {
                    name: header.name.to_string(),
                });
            }
            seen.push(block_char);

            let end = self.decode_block(&mut message, &header, open)?;
            trace!(name = header.name, start = open, end, "parsed block");
            self.offset = end;
        }

        if self.config.validate_checksum
            && message.block5().is_some_and(|b| b.contains(CHECKSUM_TAG))
        {
            verify_checksum(&message)?;
        }

        Ok(message)
    }

    /// Decodes the block starting at `open`, returning the offset after it.
    fn decode_block(
        &self,
        message: &mut Message,
        header: &BlockHeader<'_>,
        open: usize,
    ) -> Result<usize, ParseError> {
        let bytes = self.input.as_bytes();
        let unterminated = || ParseError::UnterminatedBlock {
            name: header.name.to_string(),
            offset: open,
        };

        if header.name == "4" && bytes.get(header.content_start) != Some(&BLOCK_OPEN) {
            let (content, end) =
                find_text_block4(self.input, header.content_start, open).ok_or_else(unterminated)?;
            let _ = message.set_block(4, decode_text_block(content));
            message.set_block4_form(Block4Form::Text);
            return Ok(end);
        }

        let close = find_closing_brace(bytes, open).ok_or_else(unterminated)?;
        let content = &self.input[header.content_start..close];
        match header.name {
            "1" => self.decode_block1(message, content)?,
            "2" => self.decode_block2(message, content, open, close)?,
            "3" | "4" | "5" => {
                let number = header.name.as_bytes()[0] - b'0';
                let _ = message.set_block(number, decode_brace_block(content));
                if number == 4 {
                    message.set_block4_form(Block4Form::Brace);
                }
            }
            _ => {
                if let Ok(name) = UserBlockName::new(header.name) {
                    let _ = message.add_user_block(name, decode_brace_block(content));
                }
            }
        }
        Ok(close + 1)
    }

    fn decode_block1(&self, message: &mut Message, content: &str) -> Result<(), ParseError> {
        let block1 = Block1::parse(content, self.config.lenient).map_err(ParseError::Block1)?;
        if !block1.is_complete() {
            warn!(
                len = content.len(),
                "block 1 accepted with non-standard length"
            );
        }
        message.set_block1(block1);
        Ok(())
    }

    fn decode_block2(
        &self,
        message: &mut Message,
        content: &str,
        open: usize,
        close: usize,
    ) -> Result<(), ParseError> {
        match Block2::parse(content, self.config.lenient) {
            Ok(block2) => {
                if block2.unparsed_texts().is_some() || !is_standard_block2(content) {
                    warn!(
                        len = content.len(),
                        "block 2 accepted with non-standard length"
                    );
                }
                message.set_block2(block2);
                Ok(())
            }
            Err(e) if self.config.lenient => {
                debug!(error = %e, "block 2 kept as unparsed text");
                message.add_unparsed_text_at(message.block_count(), &self.input[open..=close]);
                Ok(())
            }
            Err(e) => Err(ParseError::Block2(e)),
        }
    }

    fn keep_gap(&self, message: &mut Message, gap: &str) {
        if !gap.trim().is_empty() {
            debug!(len = gap.len(), "text outside blocks kept as unparsed text");
            message.add_unparsed_text_at(message.block_count(), gap);
        }
    }

    /// Returns the current offset in the input.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the input not yet consumed.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.offset..]
    }

    /// Resets the decoder to the beginning of the input.
    #[inline]
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

fn is_standard_block2(content: &str) -> bool {
    use ironswift_core::header::{BLOCK2_INPUT_LENS, BLOCK2_OUTPUT_LENS};
    let len = content.chars().count();
    match content.as_bytes().first() {
        Some(b'I') => BLOCK2_INPUT_LENS.contains(&len),
        Some(b'O') => BLOCK2_OUTPUT_LENS.contains(&len),
        _ => false,
    }
}

/// Name and content position of a block opened at some `{`.
#[derive(Debug, Clone, Copy)]
struct BlockHeader<'a> {
    name: &'a str,
    content_start: usize,
}

impl<'a> BlockHeader<'a> {
    /// Reads `{name:` at `open`. Returns `None` when no `:` precedes the next brace.
    fn read(input: &'a str, open: usize) -> Option<Self> {
        let bytes = input.as_bytes();
        let start = open + 1;
        let colon = start + memchr(NAME_SEPARATOR, &bytes[start..])?;
        if bytes[start..colon].iter().any(|&b| b == BLOCK_OPEN || b == BLOCK_CLOSE) {
            return None;
        }
        Some(Self {
            name: &input[start..colon],
            content_start: colon + 1,
        })
    }

    fn is_known(&self) -> bool {
        matches!(self.name, "1" | "2" | "3" | "4" | "5") || UserBlockName::new(self.name).is_ok()
    }

    fn block_char(&self) -> char {
        self.name.chars().next().unwrap_or_default()
    }
}

/// Finds the brace closing the one at `open`, counting nested braces.
fn find_closing_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for pos in memchr2_iter(BLOCK_OPEN, BLOCK_CLOSE, &bytes[open..]) {
        if bytes[open + pos] == BLOCK_OPEN {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(open + pos);
            }
        }
    }
    None
}

/// Locates the content of a text-form block 4.
///
/// The canonical terminator is `-}` at the start of a line. A compact block
/// closed by `-}` at the end of its last line is accepted as well.
fn find_text_block4(input: &str, content_start: usize, open: usize) -> Option<(&str, usize)> {
    let bytes = input.as_bytes();
    let content = &bytes[content_start..];
    for pos in memmem::find_iter(content, b"-}") {
        if pos == 0 || content[pos - 1] == b'\n' {
            let end = content_start + pos;
            return Some((&input[content_start..end], end + 2));
        }
    }
    let close = find_closing_brace(bytes, open)?;
    debug!(offset = open, "block 4 without line terminator");
    let inner = &input[content_start..close];
    Some((inner.strip_suffix('-').unwrap_or(inner), close + 1))
}

/// Returns `(name, rest)` if `line` opens a block 4 tag (`:name:rest`).
fn tag_line(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix(':')?;
    let (name, rest) = body.split_once(':')?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some((name, rest))
}

/// Decodes the lines of a text-form block 4.
///
/// A value runs until the next `:name:` line. Lines before the first tag are
/// kept as leading unparsed text of the block.
fn decode_text_block(content: &str) -> TagListBlock {
    let mut lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if content.ends_with('\n') {
        lines.pop();
    }
    if lines.first() == Some(&"") {
        lines.remove(0);
    }

    let mut block = TagListBlock::new();
    let mut current: Option<(&str, String)> = None;
    for line in lines {
        if let Some((name, rest)) = tag_line(line) {
            flush_text_tag(&mut block, current.take());
            current = Some((name, rest.to_string()));
        } else if let Some((_, value)) = current.as_mut() {
            value.push_str("\r\n");
            value.push_str(line);
        } else {
            debug!(line, "block 4 line before first tag kept as unparsed text");
            block.add_leading_unparsed_text(line);
        }
    }
    flush_text_tag(&mut block, current);
    block
}

fn flush_text_tag(block: &mut TagListBlock, pending: Option<(&str, String)>) {
    let Some((name, value)) = pending else {
        return;
    };
    match Tag::new(name, &value) {
        Ok(tag) => {
            block.append(tag);
        }
        Err(e) => {
            debug!(error = %e, "block 4 tag kept as unparsed text");
            attach_junk(block, &format!(":{name}:{value}"));
        }
    }
}

/// Decodes `{name:value}` sub-blocks of blocks 3, 5, user blocks and
/// brace-form block 4.
///
/// Text between two sub-blocks is attached to the preceding tag. Text before
/// the first sub-block is leading text of the block and text after the last
/// one is trailing text of the block.
fn decode_brace_block(content: &str) -> TagListBlock {
    let bytes = content.as_bytes();
    let mut block = TagListBlock::new();
    let mut junk_start = 0;
    let mut pos = 0;

    while let Some(rel) = memchr(BLOCK_OPEN, &bytes[pos..]) {
        let open = pos + rel;
        let Some(close) = find_closing_brace(bytes, open) else {
            break;
        };
        pos = close + 1;
        let inner = &content[open + 1..close];
        let Some(tag) = inner
            .split_once(':')
            .and_then(|(name, value)| Tag::new(name, value).ok())
        else {
            debug!(text = inner, "sub-block kept as unparsed text");
            continue;
        };
        attach_junk(&mut block, &content[junk_start..open]);
        block.append(tag);
        junk_start = pos;
    }

    let rest = &content[junk_start..];
    if !rest.trim().is_empty() {
        block.add_unparsed_text(rest);
    }
    block
}

/// Attaches non-blank `text` to the last tag of `block`, or ahead of the
/// first tag when there is none yet.
fn attach_junk(block: &mut TagListBlock, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    match block.last_mut() {
        Some(tag) => tag.add_unparsed_text(text),
        None => block.add_leading_unparsed_text(text),
    }
}

/// Parses FIN text with the default (lenient) configuration.
///
/// # Errors
/// See [`Decoder::decode`].
///
/// # Example
/// ```
/// use ironswift_fin::parse;
///
/// let message = parse("{1:F01BANKBEBBAXXX2222123456}{2:I103BANKDEFFXXXXN}{4:\r\n:20:REF\r\n-}")
///     .unwrap();
/// assert_eq!(message.message_type(), Some("103"));
/// assert_eq!(message.block(4).and_then(|b| b.tag_value("20")), Some("REF"));
/// ```
pub fn parse(text: &str) -> Result<Message, ParseError> {
    Decoder::new(text).decode()
}

/// Parses FIN text with an explicit configuration.
///
/// # Errors
/// See [`Decoder::decode`].
pub fn parse_with(text: &str, config: &ParserConfig) -> Result<Message, ParseError> {
    Decoder::new(text).with_config(*config).decode()
}

/// Parses the unparsed text at `index` as a FIN message of its own.
///
/// # Returns
/// `None` if there is no text at `index` or it does not start with `{1:`.
///
/// # Errors
/// The inner `Result` carries the decoding failure of the attached text.
pub fn parse_attached(
    texts: &UnparsedTextList,
    index: usize,
    config: &ParserConfig,
) -> Option<Result<Message, ParseError>> {
    if !texts.is_message(index) {
        return None;
    }
    texts.get(index).map(|text| parse_with(text.trim_start(), config))
}
