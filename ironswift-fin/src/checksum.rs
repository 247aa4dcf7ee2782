/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! FIN trailer checksum.
//!
//! The `CHK` sub-field of block 5 is the MD5 digest of block 4 exactly as it is
//! written on the wire (from `{4:` through the closing `-}` or `}`), truncated
//! to its first six bytes and formatted as 12 uppercase hexadecimal digits.

use crate::encoder::{Encoder, encode_block4};
use ironswift_core::block::TagListBlock;
use ironswift_core::error::{ChecksumError, SwiftError};
use ironswift_core::message::Message;
use ironswift_core::tag::Tag;
use md5::{Digest, Md5};

/// Name of the block 5 checksum sub-field.
pub const CHECKSUM_TAG: &str = "CHK";

/// Number of hexadecimal digits in a checksum.
pub const CHECKSUM_LEN: usize = 12;

/// Calculates the checksum of raw block 4 bytes.
///
/// # Arguments
/// * `data` - Block 4 as written on the wire, braces included
#[inline]
#[must_use]
pub fn checksum_of(data: &[u8]) -> String {
    let digest = Md5::digest(data);
    hex::encode_upper(&digest[..CHECKSUM_LEN / 2])
}

/// Calculates the checksum of a text block 4.
///
/// # Arguments
/// * `block4` - The message body
///
/// # Returns
/// 12 uppercase hexadecimal digits.
///
/// # Example
/// ```
/// use ironswift_core::{Tag, TagListBlock};
/// use ironswift_fin::calculate_checksum;
///
/// let body = TagListBlock::new().with_tag(Tag::new("20", "REF").unwrap());
/// assert_eq!(calculate_checksum(&body), "CAEC4C5916A2");
/// ```
#[must_use]
pub fn calculate_checksum(block4: &TagListBlock) -> String {
    let mut encoder = Encoder::with_capacity(256);
    encoder.put_text_block4(block4);
    checksum_of(&encoder.finish())
}

/// Calculates the checksum of the block 4 of `message`, in the form the
/// encoder writes it for that message.
///
/// # Returns
/// `None` when the message has no block 4.
#[must_use]
pub fn message_checksum(message: &Message) -> Option<String> {
    encode_block4(message).map(|bytes| checksum_of(&bytes))
}

/// Verifies the `CHK` sub-field of block 5 against block 4.
///
/// # Errors
/// Returns [`ChecksumError::MissingBody`] without block 4,
/// [`ChecksumError::MissingTrailer`] without a `CHK` sub-field and
/// [`ChecksumError::Mismatch`] when the digests differ. A mismatch is never
/// corrected.
pub fn verify_checksum(message: &Message) -> Result<(), ChecksumError> {
    let calculated = message_checksum(message).ok_or(ChecksumError::MissingBody)?;
    let declared = message
        .block5()
        .and_then(|b| b.tag_value(CHECKSUM_TAG))
        .ok_or(ChecksumError::MissingTrailer)?
        .trim();
    if declared.eq_ignore_ascii_case(&calculated) {
        Ok(())
    } else {
        Err(ChecksumError::Mismatch {
            calculated,
            declared: declared.to_string(),
        })
    }
}

/// Stamps the block 5 `CHK` sub-field with the checksum of block 4.
///
/// An existing `CHK` is replaced in place; otherwise it is appended, creating
/// block 5 when needed.
///
/// # Errors
/// Returns [`ChecksumError::MissingBody`] (wrapped in [`SwiftError`]) when the
/// message has no block 4.
pub fn with_checksum_trailer(mut message: Message) -> Result<Message, SwiftError> {
    let checksum = message_checksum(&message).ok_or(ChecksumError::MissingBody)?;
    let tag = Tag::new(CHECKSUM_TAG, checksum)?;
    let mut trailer = message.remove_block(5).unwrap_or_default();
    match trailer.index_of(CHECKSUM_TAG, 0) {
        Some(index) => {
            trailer.set(index, tag)?;
        }
        None => {
            trailer.append(tag);
        }
    }
    message.set_block(5, trailer)?;
    Ok(message)
}

/// Checksum helpers in method form.
pub trait MessageChecksum: Sized {
    /// See [`message_checksum`].
    fn checksum(&self) -> Option<String>;

    /// See [`verify_checksum`].
    ///
    /// # Errors
    /// See [`verify_checksum`].
    fn verify_checksum(&self) -> Result<(), ChecksumError>;

    /// See [`with_checksum_trailer`].
    ///
    /// # Errors
    /// See [`with_checksum_trailer`].
    fn with_checksum_trailer(self) -> Result<Self, SwiftError>;
}

impl MessageChecksum for Message {
    fn checksum(&self) -> Option<String> {
        message_checksum(self)
    }

    fn verify_checksum(&self) -> Result<(), ChecksumError> {
        verify_checksum(self)
    }

    fn with_checksum_trailer(self) -> Result<Self, SwiftError> {
        with_checksum_trailer(self)
    }
}
