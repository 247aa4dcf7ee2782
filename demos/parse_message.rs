//! FIN Message Parsing Example
//!
//! Parses a FIN message (from the file given as first argument, or a built-in
//! MT103), extracts its sequences, validates the identifiers it carries and
//! stamps the trailer checksum.
//!
//! Run with `RUST_LOG=debug` to see the decoder's degradation events.

use ironswift::prelude::*;
use tracing::{info, warn};

const SAMPLE: &str = "{1:F01BANKBEBBAXXX2222123456}{2:I103BANKDEFFXXXXN}{3:{108:MUR0001}}{4:\r\n\
                      :20:TESTREF123\r\n\
                      :23B:CRED\r\n\
                      :32A:231018EUR1000,00\r\n\
                      :50K:/DE89370400440532013000\r\n\
                      JOHN DOE\r\n\
                      :57A:DEUTDEFF\r\n\
                      :59:/GB82WEST12345698765432\r\n\
                      JANE ROE\r\n\
                      :71A:SHA\r\n\
                      -}";

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

fn first_line(tag: &Tag) -> &str {
    tag.value().lines().next().unwrap_or_default()
}

/// Account in the first line of a party field (`/ACCOUNT`).
fn account(tag: &Tag) -> Option<&str> {
    first_line(tag).strip_prefix('/')
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };

    let message = parse(&text)?;
    info!(
        mt = message.message_type().unwrap_or("---"),
        sender = message.sender().as_deref().unwrap_or("-"),
        receiver = message.receiver().as_deref().unwrap_or("-"),
        mur = message.mur().unwrap_or("-"),
        "Parsed message"
    );
    if let Some(unparsed) = message.unparsed_texts() {
        warn!(count = unparsed.len(), "Message carries unparsed text");
    }

    let Some(body) = message.block4() else {
        warn!("No block 4, nothing more to do");
        return Ok(());
    };
    for tag in body {
        info!(name = tag.name(), value = ?tag.value(), "Field");
    }

    for bic in body.tags_by_number(57).into_iter().chain(body.tags_by_number(52)) {
        match validate_bic(first_line(bic)) {
            Ok(()) => info!(bic = bic.value(), "Valid BIC"),
            Err(e) => warn!(bic = bic.value(), error = %e, "Invalid BIC"),
        }
    }
    for party in body.tags_by_number(50).into_iter().chain(body.tags_by_number(59)) {
        if let Some(iban) = account(party) {
            match validate_iban(iban) {
                Ok(()) => info!(
                    field = party.name(),
                    iban = %Iban::new(iban).to_printable(),
                    "Valid IBAN"
                ),
                Err(e) => warn!(field = party.name(), iban, error = %e, "Invalid IBAN"),
            }
        }
    }

    let stamped = message.with_checksum_trailer()?;
    info!(checksum = stamped.checksum().as_deref().unwrap_or("-"), "Stamped trailer");
    println!("{}", serialize(&stamped));
    Ok(())
}
