/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # IronSwift
//!
//! A SWIFT FIN (MT) message toolkit for Rust.
//!
//! IronSwift parses FIN text into blocks and tags, writes it back byte for byte,
//! carves message bodies into their nested sequences and validates the BICs,
//! IBANs and checksums they carry.
//!
//! ## Features
//!
//! - **Tolerant parsing**: Malformed content is kept as unparsed text, never dropped
//! - **Exact round trip**: Serializing a parsed message reproduces its input
//! - **Declarative sequences**: One engine for letter-option, delimited and bracket sequences
//! - **Precise validation**: BIC, IBAN and checksum failures name the rule that failed
//!
//! ## Quick Start
//!
//! ```rust
//! use ironswift::prelude::*;
//!
//! let text = "{1:F01BANKBEBBAXXX0000000000}{2:I103BANKDEFFXXXXN}{4:\r\n:20:REF\r\n-}";
//! let message = parse(text).unwrap();
//! assert_eq!(message.message_type(), Some("103"));
//! assert_eq!(message.block4().and_then(|b| b.tag_value("20")), Some("REF"));
//! assert_eq!(serialize(&message), text);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Block and tag model, header blocks and error definitions
//! - [`fin`]: FIN text decoding, encoding and the trailer checksum
//! - [`sequence`]: Descriptor-driven sequence extraction
//! - [`validation`]: BIC and IBAN validation

pub mod core {
    //! Block and tag model, header blocks and error definitions.
    pub use ironswift_core::*;
}

pub mod fin {
    //! FIN text decoding, encoding and the trailer checksum.
    pub use ironswift_fin::*;
}

pub mod sequence {
    //! Descriptor-driven sequence extraction.
    pub use ironswift_sequence::*;
}

pub mod validation {
    //! BIC and IBAN validation.
    pub use ironswift_validation::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Model
    pub use ironswift_core::{
        Block1, Block2, Block2Input, Block2Output, Block4Form, ChecksumError, LogicalTerminal, Message,
        ModelError, ParseError, Priority, Result, SwiftError, Tag, TagListBlock,
        UnparsedTextList, UserBlockName, ValueBlockError,
    };

    // FIN codec
    pub use ironswift_fin::{
        Decoder, Encoder, MessageChecksum, ParserConfig, calculate_checksum, parse, parse_with,
        serialize,
    };

    // Sequences
    pub use ironswift_sequence::{
        BracketMarkers, Delimiters, SequenceDescriptor, bracket_sub_block, bracket_sub_blocks,
        extract, split_by_letter_option, split_by_name, sub_blocks_delimited_with_optional_tail,
    };

    // Validation
    pub use ironswift_validation::{
        Bic, BicError, Iban, IbanError, validate_bic, validate_iban,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    const MT940: &str = "{1:F01BANKBEBBAXXX0000000000}{2:I940BANKDEFFXXXXN}{4:\r\n\
                         :20:STMT001\r\n\
                         :25:DE89370400440532013000\r\n\
                         :28C:1/1\r\n\
                         :60F:C231017EUR1000,00\r\n\
                         :61:2310181018C500,00NTRFREF1\r\n\
                         :86:FIRST\r\n\
                         :61:2310181018D200,00NTRFREF2\r\n\
                         :86:SECOND\r\n\
                         :62F:C231018EUR1300,00\r\n\
                         -}";

    #[test]
    fn test_parse_extract_validate() {
        let message = parse(MT940).unwrap();
        assert_eq!(serialize(&message), MT940);

        let sender = message.block1().and_then(Block1::sender_bic).unwrap();
        assert_eq!(sender, "BANKBEBBXXX");
        assert_eq!(validate_bic(&sender), Ok(()));

        let body = message.block4().unwrap();
        let account = body.tag_value("25").unwrap();
        assert_eq!(validate_iban(account), Ok(()));

        let lines = split_by_name(body, "61");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].tag_value("86"), Some("FIRST"));
        assert_eq!(lines[1].tag_value("86"), Some("SECOND"));
    }

    #[test]
    fn test_checksum_round_trip() {
        let message = parse(MT940).unwrap().with_checksum_trailer().unwrap();
        let text = serialize(&message);
        let reparsed = parse_with(&text, &ParserConfig::strict().with_checksum_validation(true));
        assert!(reparsed.is_ok());
        assert_eq!(reparsed.unwrap().block5(), message.block5());
    }
}
