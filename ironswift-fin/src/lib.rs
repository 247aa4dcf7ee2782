/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # IronSwift FIN
//!
//! FIN text encoding and decoding for SWIFT MT messages.
//!
//! This crate converts between brace-delimited FIN text and the
//! [`ironswift_core::Message`] model.
//!
//! ## Features
//!
//! - **Tolerant parsing**: Malformed content degrades to unparsed text instead of failing
//! - **Byte-identical output**: Parse then serialize gives back well-formed input
//! - **Fast delimiter search**: Uses `memchr` for brace and terminator scanning
//! - **Trailer checksum**: Block 5 `CHK` calculation and verification

pub mod checksum;
pub mod config;
pub mod decoder;
pub mod encoder;

pub use checksum::{
    CHECKSUM_TAG, MessageChecksum, calculate_checksum, message_checksum, verify_checksum,
    with_checksum_trailer,
};
pub use config::ParserConfig;
pub use decoder::{Decoder, parse, parse_attached, parse_with};
pub use encoder::{Encoder, serialize};
pub use ironswift_core::message::Message;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = String> {
        prop::collection::vec("[A-Z0-9/ ,.]{0,20}", 1..4).prop_map(|lines| lines.join("\r\n"))
    }

    fn arb_junk() -> impl Strategy<Value = Option<String>> {
        prop::option::of("[A-Z][A-Z ]{0,7}")
    }

    fn arb_text_body() -> impl Strategy<Value = String> {
        (
            prop::collection::vec("[A-Z][A-Z ]{0,7}", 0..2),
            prop::collection::vec(("[0-9]{2}[A-Z]?", arb_value()), 0..8),
        )
            .prop_map(|(noise, tags)| {
                let mut body = String::from("{4:\r\n");
                for line in noise {
                    body.push_str(&format!("{line}\r\n"));
                }
                for (name, value) in tags {
                    body.push_str(&format!(":{name}:{value}\r\n"));
                }
                body.push_str("-}");
                body
            })
    }

    /// `{name:value}` sub-blocks with text before, between and after them.
    fn arb_sub_blocks(
        names: &'static str,
        min_tags: usize,
        leading: bool,
    ) -> impl Strategy<Value = String> {
        (
            arb_junk(),
            prop::collection::vec((names, "[A-Z0-9 ./]{0,16}", arb_junk()), min_tags..4),
            arb_junk(),
        )
            .prop_map(move |(lead, tags, tail)| {
                let mut out = if leading { lead.unwrap_or_default() } else { String::new() };
                for (name, value, junk) in tags {
                    out.push_str(&format!("{{{name}:{value}}}"));
                    out.push_str(&junk.unwrap_or_default());
                }
                out.push_str(&tail.unwrap_or_default());
                out
            })
    }

    fn arb_block2() -> impl Strategy<Value = String> {
        prop_oneof![
            ("[A-Z]{6}[A-Z0-9]{6}", "[NU]")
                .prop_map(|(receiver, priority)| format!("I{{MT}}{receiver}{priority}")),
            ("[0-9]{10}", "[A-Z]{6}[A-Z0-9]{6}", "[0-9]{20}", prop::option::of("[NU]")).prop_map(
                |(input, mir_lt, output, priority)| {
                    let priority = priority.unwrap_or_default();
                    format!("O{{MT}}{input}{mir_lt}{output}{priority}")
                }
            ),
        ]
    }

    /// Header layout: none, user message, system message or service message.
    #[derive(Debug, Clone, Copy)]
    enum Headers {
        None,
        User,
        System,
        Service,
    }

    fn arb_message() -> impl Strategy<Value = String> {
        (
            ("[A-Z]{6}[A-Z0-9]{6}", "[0-9]{10}"),
            prop_oneof![
                Just(Headers::None),
                Just(Headers::User),
                Just(Headers::System),
                Just(Headers::Service),
            ],
            (arb_block2(), "[1-9]", "[0-9]{2}"),
            prop::option::of(arb_sub_blocks("[0-9]{3}", 0, true)),
            arb_text_body(),
            arb_sub_blocks("[0-9]{3}", 1, false),
            any::<bool>(),
            prop::option::of(arb_sub_blocks("[A-Z]{3}", 0, true)),
            (
                prop::option::of(arb_sub_blocks("[A-Z]{3}", 0, true)),
                prop::option::of(arb_sub_blocks("[A-Z]{3}", 0, true)),
            ),
            prop::collection::vec(arb_junk(), 9),
        )
            .prop_map(
                |(
                    (sender, numbers),
                    headers,
                    (block2, category, mt),
                    block3,
                    text_body,
                    brace_body,
                    brace_without_headers,
                    block5,
                    (user_s, user_z),
                    gaps,
                )| {
                    let mut blocks = Vec::new();
                    let service = if matches!(headers, Headers::Service) { "21" } else { "01" };
                    if !matches!(headers, Headers::None) {
                        blocks.push(format!("{{1:F{service}{sender}{numbers}}}"));
                    }
                    if matches!(headers, Headers::User | Headers::System) {
                        let category = if matches!(headers, Headers::System) { "0" } else { category.as_str() };
                        let block2 = block2.replace("{MT}", &format!("{category}{mt}"));
                        blocks.push(format!("{{2:{block2}}}"));
                    }
                    if let Some(block3) = block3 {
                        blocks.push(format!("{{3:{block3}}}"));
                    }
                    let brace = match headers {
                        Headers::None => brace_without_headers,
                        Headers::User => false,
                        Headers::System | Headers::Service => true,
                    };
                    if brace {
                        blocks.push(format!("{{4:{brace_body}}}"));
                    } else {
                        blocks.push(text_body);
                    }
                    if let Some(block5) = block5 {
                        blocks.push(format!("{{5:{block5}}}"));
                    }
                    if let Some(user) = user_s {
                        blocks.push(format!("{{S:{user}}}"));
                    }
                    if let Some(user) = user_z {
                        blocks.push(format!("{{Z:{user}}}"));
                    }

                    let mut text = String::new();
                    let mut gaps = gaps.into_iter();
                    for block in blocks {
                        text.push_str(&gaps.next().flatten().unwrap_or_default());
                        text.push_str(&block);
                    }
                    text.push_str(&gaps.next().flatten().unwrap_or_default());
                    text
                },
            )
    }

    proptest! {
        #[test]
        fn test_round_trip_identity(text in arb_message()) {
            let message = parse_with(&text, &ParserConfig::strict()).unwrap();
            prop_assert_eq!(serialize(&message), text);
        }

        #[test]
        fn test_parse_never_panics(text in "[{}:0-9A-Z\r\n-]{0,64}") {
            let _ = parse(&text);
        }
    }

    #[test]
    fn test_round_trip_crlf_normalization() {
        let lf = "{1:F01BANKBEBBAXXX2222123456}{4:\n:20:REF\n:79:LINE1\nLINE2\n-}";
        let message = parse(lf).unwrap();
        assert_eq!(serialize(&message), lf.replace('\n', "\r\n"));
    }
}
