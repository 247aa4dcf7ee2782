/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Fixed-width header blocks.
//!
//! This module provides:
//! - [`Block1`]: Basic header (application, service, logical terminal, session, sequence)
//! - [`Block2`]: Application header, either [`Block2Input`] or [`Block2Output`]
//!
//! Both blocks are positional. In strict mode the content length must match one
//! of the allowed layouts exactly. In lenient mode a short value fills the
//! sub-fields it reaches (the last one possibly truncated) and leaves the rest
//! absent, while an overlong value keeps the extra characters as unparsed text
//! so that serialization gives back the original content.

use crate::error::ValueBlockError;
use crate::types::{DeliveryMonitoring, LogicalTerminal, Priority};
use crate::unparsed::UnparsedTextList;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Block 1 content length.
pub const BLOCK1_LEN: usize = 25;

/// Accepted block 2 input lengths, direction character included.
pub const BLOCK2_INPUT_LENS: [usize; 4] = [16, 17, 18, 21];

/// Accepted block 2 output lengths, direction character included.
pub const BLOCK2_OUTPUT_LENS: [usize; 2] = [46, 47];

/// Splits `value` into consecutive fixed-width slices.
///
/// Returns one entry per width; entries past the end of the input are `None`
/// and the last reached entry may be shorter than its width. The second
/// element is whatever follows the last field.
fn split_fixed<'a, const N: usize>(
    value: &'a str,
    widths: [usize; N],
) -> ([Option<&'a str>; N], &'a str) {
    let mut fields = [None; N];
    let mut rest = value;
    for (slot, width) in fields.iter_mut().zip(widths) {
        if rest.is_empty() {
            break;
        }
        let cut = rest
            .char_indices()
            .nth(width)
            .map_or(rest.len(), |(i, _)| i);
        let (field, tail) = rest.split_at(cut);
        *slot = Some(field);
        rest = tail;
    }
    (fields, rest)
}

fn owned(field: Option<&str>) -> Option<String> {
    field.map(str::to_string)
}

fn overflow(rest: &str) -> Option<UnparsedTextList> {
    (!rest.is_empty()).then(|| std::iter::once(rest).collect())
}

fn push_fields(out: &mut String, fields: &[&Option<String>]) {
    for field in fields.iter().copied().flatten() {
        out.push_str(field);
    }
}

fn push_unparsed(out: &mut String, unparsed: Option<&UnparsedTextList>) {
    for text in unparsed.into_iter().flatten() {
        out.push_str(text);
    }
}

/// Basic header block (block 1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block1 {
    application_id: Option<String>,
    service_id: Option<String>,
    logical_terminal: Option<String>,
    session_number: Option<String>,
    sequence_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unparsed: Option<UnparsedTextList>,
}

impl Block1 {
    /// Creates a block 1 for a financial application message.
    ///
    /// Application id defaults to `F`, service id to `01`, session and
    /// sequence numbers to zero.
    ///
    /// # Arguments
    /// * `logical_terminal` - The sender logical terminal address
    #[must_use]
    pub fn new(logical_terminal: LogicalTerminal) -> Self {
        Self {
            application_id: Some("F".to_string()),
            service_id: Some("01".to_string()),
            logical_terminal: Some(logical_terminal.as_str().to_string()),
            session_number: Some("0000".to_string()),
            sequence_number: Some("000000".to_string()),
            unparsed: None,
        }
    }

    /// Parses block 1 content (the text between `{1:` and `}`).
    ///
    /// # Errors
    /// In strict mode returns [`ValueBlockError::Empty`] or
    /// [`ValueBlockError::InvalidLength`] unless the content is exactly
    /// [`BLOCK1_LEN`] characters.
    pub fn parse(value: &str, lenient: bool) -> Result<Self, ValueBlockError> {
        if !lenient {
            if value.is_empty() {
                return Err(ValueBlockError::Empty { block: 1 });
            }
            let actual = value.chars().count();
            if actual != BLOCK1_LEN {
                return Err(ValueBlockError::InvalidLength {
                    block: 1,
                    expected: BLOCK1_LEN.to_string(),
                    actual,
                });
            }
        }
        let ([app, service, lt, session, sequence], rest) = split_fixed(value, [1, 2, 12, 4, 6]);
        Ok(Self {
            application_id: owned(app),
            service_id: owned(service),
            logical_terminal: owned(lt),
            session_number: owned(session),
            sequence_number: owned(sequence),
            unparsed: overflow(rest),
        })
    }

    /// Returns the block content as written between `{1:` and `}`.
    #[must_use]
    pub fn value(&self) -> String {
        let mut out = String::with_capacity(BLOCK1_LEN);
        push_fields(
            &mut out,
            &[
                &self.application_id,
                &self.service_id,
                &self.logical_terminal,
                &self.session_number,
                &self.sequence_number,
            ],
        );
        push_unparsed(&mut out, self.unparsed.as_ref());
        out
    }

    /// Returns true if every sub-field is present with its full width and no
    /// extra content follows.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unparsed.is_none() && self.value().chars().count() == BLOCK1_LEN
    }

    /// Application identifier (`F`, `A` or `L`).
    #[must_use]
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    /// Service identifier (`01` for user-to-user, `21` for ACK/NAK, ...).
    #[must_use]
    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    /// Raw logical terminal sub-field.
    #[must_use]
    pub fn logical_terminal(&self) -> Option<&str> {
        self.logical_terminal.as_deref()
    }

    /// Logical terminal as a validated address.
    #[must_use]
    pub fn logical_terminal_address(&self) -> Option<LogicalTerminal> {
        self.logical_terminal.as_deref().and_then(LogicalTerminal::new)
    }

    /// Sender BIC11 derived from the logical terminal.
    #[must_use]
    pub fn sender_bic(&self) -> Option<String> {
        self.logical_terminal_address().map(|lt| lt.bic11())
    }

    /// Returns true when the service identifier marks a system or service message.
    #[must_use]
    pub fn is_service_message(&self) -> bool {
        self.service_id().is_some_and(|id| id != "01")
    }

    /// Session number sub-field.
    #[must_use]
    pub fn session_number(&self) -> Option<&str> {
        self.session_number.as_deref()
    }

    /// Sequence number sub-field.
    #[must_use]
    pub fn sequence_number(&self) -> Option<&str> {
        self.sequence_number.as_deref()
    }

    /// Returns the unparsed texts attached to this block.
    #[must_use]
    pub fn unparsed_texts(&self) -> Option<&UnparsedTextList> {
        self.unparsed.as_ref()
    }

    /// Sets the application identifier.
    #[must_use]
    pub fn with_application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = Some(id.into());
        self
    }

    /// Sets the service identifier.
    #[must_use]
    pub fn with_service_id(mut self, id: impl Into<String>) -> Self {
        self.service_id = Some(id.into());
        self
    }

    /// Sets the session number, zero padded to four digits.
    #[must_use]
    pub fn with_session_number(mut self, session: u16) -> Self {
        self.session_number = Some(format!("{:04}", session % 10_000));
        self
    }

    /// Sets the sequence number, zero padded to six digits.
    #[must_use]
    pub fn with_sequence_number(mut self, sequence: u32) -> Self {
        self.sequence_number = Some(format!("{:06}", sequence % 1_000_000));
        self
    }
}

/// Application header block (block 2).
///
/// The direction character selects the variant; each variant carries only the
/// sub-fields defined for that direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block2 {
    /// Input (sent to the network) application header, `I...`.
    Input(Block2Input),
    /// Output (delivered by the network) application header, `O...`.
    Output(Block2Output),
}

impl Block2 {
    /// Parses block 2 content (the text between `{2:` and `}`).
    ///
    /// # Errors
    /// Always fails on empty content or an unknown direction character. In
    /// strict mode also fails with [`ValueBlockError::InvalidLength`] when the
    /// length is not one of the layouts of the direction.
    pub fn parse(value: &str, lenient: bool) -> Result<Self, ValueBlockError> {
        let direction = value
            .chars()
            .next()
            .ok_or(ValueBlockError::Empty { block: 2 })?;
        let (expected, body): (&[usize], &str) = match direction {
            'I' => (&BLOCK2_INPUT_LENS[..], &value[1..]),
            'O' => (&BLOCK2_OUTPUT_LENS[..], &value[1..]),
            other => return Err(ValueBlockError::InvalidDirection(other)),
        };
        let actual = value.chars().count();
        if !lenient && !expected.contains(&actual) {
            return Err(ValueBlockError::InvalidLength {
                block: 2,
                expected: expected
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("|"),
                actual,
            });
        }
        Ok(match direction {
            'I' => Self::Input(Block2Input::from_body(body)),
            _ => Self::Output(Block2Output::from_body(body)),
        })
    }

    /// Returns the block content as written between `{2:` and `}`.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Input(b) => b.value(),
            Self::Output(b) => b.value(),
        }
    }

    /// Returns the 3-digit message type, e.g. `103`.
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        match self {
            Self::Input(b) => b.message_type(),
            Self::Output(b) => b.message_type(),
        }
    }

    /// Returns the message priority, if present and known.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        match self {
            Self::Input(b) => b.priority(),
            Self::Output(b) => b.priority(),
        }
    }

    /// Returns true for an input header.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Returns true for an output header.
    #[must_use]
    pub const fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    /// Returns the unparsed texts attached to this block.
    #[must_use]
    pub fn unparsed_texts(&self) -> Option<&UnparsedTextList> {
        match self {
            Self::Input(b) => b.unparsed.as_ref(),
            Self::Output(b) => b.unparsed.as_ref(),
        }
    }
}

impl From<Block2Input> for Block2 {
    fn from(block: Block2Input) -> Self {
        Self::Input(block)
    }
}

impl From<Block2Output> for Block2 {
    fn from(block: Block2Output) -> Self {
        Self::Output(block)
    }
}

/// Input application header: message type, receiver, priority and options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block2Input {
    message_type: Option<String>,
    receiver_address: Option<String>,
    priority: Option<String>,
    delivery_monitoring: Option<String>,
    obsolescence_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unparsed: Option<UnparsedTextList>,
}

impl Block2Input {
    /// Creates an input header with normal priority.
    ///
    /// # Arguments
    /// * `message_type` - 3-digit message type, e.g. `"103"`
    /// * `receiver` - Receiver logical terminal address
    #[must_use]
    pub fn new(message_type: impl Into<String>, receiver: LogicalTerminal) -> Self {
        Self {
            message_type: Some(message_type.into()),
            receiver_address: Some(receiver.as_str().to_string()),
            priority: Some(Priority::Normal.as_char().to_string()),
            ..Self::default()
        }
    }

    fn from_body(body: &str) -> Self {
        let ([mt, receiver, priority, monitoring, obsolescence], rest) =
            split_fixed(body, [3, 12, 1, 1, 3]);
        Self {
            message_type: owned(mt),
            receiver_address: owned(receiver),
            priority: owned(priority),
            delivery_monitoring: owned(monitoring),
            obsolescence_period: owned(obsolescence),
            unparsed: overflow(rest),
        }
    }

    /// Returns the block content, direction character included.
    #[must_use]
    pub fn value(&self) -> String {
        let mut out = String::from("I");
        push_fields(
            &mut out,
            &[
                &self.message_type,
                &self.receiver_address,
                &self.priority,
                &self.delivery_monitoring,
                &self.obsolescence_period,
            ],
        );
        push_unparsed(&mut out, self.unparsed.as_ref());
        out
    }

    /// Message type sub-field.
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        self.message_type.as_deref()
    }

    /// Raw receiver address sub-field.
    #[must_use]
    pub fn receiver_address(&self) -> Option<&str> {
        self.receiver_address.as_deref()
    }

    /// Receiver address as a logical terminal.
    #[must_use]
    pub fn receiver(&self) -> Option<LogicalTerminal> {
        self.receiver_address.as_deref().and_then(LogicalTerminal::new)
    }

    /// Message priority.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        first_char(self.priority.as_deref()).and_then(Priority::from_char)
    }

    /// Delivery monitoring option.
    #[must_use]
    pub fn delivery_monitoring(&self) -> Option<DeliveryMonitoring> {
        first_char(self.delivery_monitoring.as_deref()).and_then(DeliveryMonitoring::from_char)
    }

    /// Obsolescence period sub-field (units of five minutes).
    #[must_use]
    pub fn obsolescence_period(&self) -> Option<&str> {
        self.obsolescence_period.as_deref()
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority.as_char().to_string());
        self
    }

    /// Sets the delivery monitoring option and, optionally, the obsolescence period.
    #[must_use]
    pub fn with_delivery_monitoring(
        mut self,
        monitoring: DeliveryMonitoring,
        obsolescence: Option<u16>,
    ) -> Self {
        self.delivery_monitoring = Some(monitoring.as_char().to_string());
        self.obsolescence_period = obsolescence.map(|p| format!("{:03}", p % 1000));
        self
    }
}

/// Output application header: message type, input reference (MIR) and delivery time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block2Output {
    message_type: Option<String>,
    sender_input_time: Option<String>,
    mir_date: Option<String>,
    mir_logical_terminal: Option<String>,
    mir_session_number: Option<String>,
    mir_sequence_number: Option<String>,
    receiver_output_date: Option<String>,
    receiver_output_time: Option<String>,
    priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unparsed: Option<UnparsedTextList>,
}

impl Block2Output {
    fn from_body(body: &str) -> Self {
        let ([mt, input_time, date, lt, session, sequence, out_date, out_time, priority], rest) =
            split_fixed(body, [3, 4, 6, 12, 4, 6, 6, 4, 1]);
        Self {
            message_type: owned(mt),
            sender_input_time: owned(input_time),
            mir_date: owned(date),
            mir_logical_terminal: owned(lt),
            mir_session_number: owned(session),
            mir_sequence_number: owned(sequence),
            receiver_output_date: owned(out_date),
            receiver_output_time: owned(out_time),
            priority: owned(priority),
            unparsed: overflow(rest),
        }
    }

    /// Returns the block content, direction character included.
    #[must_use]
    pub fn value(&self) -> String {
        let mut out = String::from("O");
        push_fields(
            &mut out,
            &[
                &self.message_type,
                &self.sender_input_time,
                &self.mir_date,
                &self.mir_logical_terminal,
                &self.mir_session_number,
                &self.mir_sequence_number,
                &self.receiver_output_date,
                &self.receiver_output_time,
                &self.priority,
            ],
        );
        push_unparsed(&mut out, self.unparsed.as_ref());
        out
    }

    /// Message type sub-field.
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        self.message_type.as_deref()
    }

    /// Sender input time (`HHMM`).
    #[must_use]
    pub fn sender_input_time(&self) -> Option<NaiveTime> {
        self.sender_input_time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H%M").ok())
    }

    /// Message input reference: date, logical terminal, session and sequence.
    ///
    /// `None` unless all four parts are present.
    #[must_use]
    pub fn mir(&self) -> Option<String> {
        Some(format!(
            "{}{}{}{}",
            self.mir_date.as_deref()?,
            self.mir_logical_terminal.as_deref()?,
            self.mir_session_number.as_deref()?,
            self.mir_sequence_number.as_deref()?
        ))
    }

    /// Date part of the MIR (`YYMMDD`).
    #[must_use]
    pub fn mir_date(&self) -> Option<NaiveDate> {
        parse_yymmdd(self.mir_date.as_deref())
    }

    /// Sender logical terminal from the MIR.
    #[must_use]
    pub fn mir_logical_terminal(&self) -> Option<LogicalTerminal> {
        self.mir_logical_terminal
            .as_deref()
            .and_then(LogicalTerminal::new)
    }

    /// Session number from the MIR.
    #[must_use]
    pub fn mir_session_number(&self) -> Option<&str> {
        self.mir_session_number.as_deref()
    }

    /// Sequence number from the MIR.
    #[must_use]
    pub fn mir_sequence_number(&self) -> Option<&str> {
        self.mir_sequence_number.as_deref()
    }

    /// Receiver output date.
    #[must_use]
    pub fn receiver_output_date(&self) -> Option<NaiveDate> {
        parse_yymmdd(self.receiver_output_date.as_deref())
    }

    /// Receiver output date and time combined.
    #[must_use]
    pub fn receiver_output_datetime(&self) -> Option<NaiveDateTime> {
        let date = self.receiver_output_date()?;
        let time = NaiveTime::parse_from_str(self.receiver_output_time.as_deref()?, "%H%M").ok()?;
        Some(date.and_time(time))
    }

    /// Message priority, when present.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        first_char(self.priority.as_deref()).and_then(Priority::from_char)
    }
}

fn first_char(field: Option<&str>) -> Option<char> {
    field.and_then(|s| s.chars().next())
}

fn parse_yymmdd(field: Option<&str>) -> Option<NaiveDate> {
    field.and_then(|d| NaiveDate::parse_from_str(d, "%y%m%d").ok())
}
