/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Core types for FIN header blocks.
//!
//! This module provides fundamental types used throughout IronSwift:
//! - [`LogicalTerminal`]: 12-character logical terminal address
//! - [`UserBlockName`]: Validated name of a user block
//! - [`Priority`]: Message priority (block 2)
//! - [`DeliveryMonitoring`]: Delivery monitoring option (block 2 input)

use crate::error::ModelError;
use arrayvec::ArrayString;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a logical terminal address.
pub const LOGICAL_TERMINAL_LEN: usize = 12;

/// Branch code used when an address carries no specific branch.
pub const DEFAULT_BRANCH: &str = "XXX";

/// Logical terminal address.
///
/// Layout: 8-character BIC, 1-character terminal code, 3-character branch code
/// (`BANKBEBBAXXX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct LogicalTerminal(ArrayString<LOGICAL_TERMINAL_LEN>);

impl LogicalTerminal {
    /// Creates a logical terminal address.
    ///
    /// # Arguments
    /// * `s` - Exactly 12 ASCII alphanumeric characters
    ///
    /// # Returns
    /// `Some(LogicalTerminal)` if the string has the right shape, `None` otherwise.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        if s.len() != LOGICAL_TERMINAL_LEN || !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        ArrayString::from(s).ok().map(Self)
    }

    /// Returns the address as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the 8-character BIC part.
    #[must_use]
    pub fn bic8(&self) -> &str {
        &self.0[..8]
    }

    /// Returns the terminal code (9th character).
    #[must_use]
    pub fn terminal(&self) -> char {
        char::from(self.0.as_bytes()[8])
    }

    /// Returns the 3-character branch code.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.0[9..]
    }

    /// Returns the 11-character BIC (BIC8 plus branch code).
    #[must_use]
    pub fn bic11(&self) -> String {
        format!("{}{}", self.bic8(), self.branch())
    }
}

impl fmt::Display for LogicalTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for LogicalTerminal {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Name of a user block: a single letter or one of the digits 0, 6, 7, 8, 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct UserBlockName(char);

impl UserBlockName {
    /// Creates a user block name.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidUserBlockName`] for anything other than a
    /// single ASCII letter or the digits 0, 6-9.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if Self::is_valid_char(c) => Ok(Self(c)),
            _ => Err(ModelError::InvalidUserBlockName(name.to_string())),
        }
    }

    /// Returns true if `c` may name a user block.
    #[inline]
    #[must_use]
    pub const fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphabetic() || matches!(c, '0' | '6'..='9')
    }

    /// Returns the name as a character.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for UserBlockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserBlockName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Message priority carried in block 2.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum Priority {
    /// System priority (`S`), service messages only.
    System = b'S',
    /// Urgent priority (`U`).
    Urgent = b'U',
    /// Normal priority (`N`).
    Normal = b'N',
}

impl Priority {
    /// Creates a priority from its wire character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_u8)
    }

    /// Returns the wire character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Delivery monitoring option of an input block 2.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum DeliveryMonitoring {
    /// Non-delivery warning (`1`).
    NonDeliveryWarning = b'1',
    /// Delivery notification (`2`).
    DeliveryNotification = b'2',
    /// Both non-delivery warning and delivery notification (`3`).
    Both = b'3',
}

impl DeliveryMonitoring {
    /// Creates a monitoring option from its wire character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_u8)
    }

    /// Returns the wire character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_terminal_parts() {
        let lt = LogicalTerminal::new("BANKBEBBAXXX").unwrap();
        assert_eq!(lt.bic8(), "BANKBEBB");
        assert_eq!(lt.terminal(), 'A');
        assert_eq!(lt.branch(), "XXX");
        assert_eq!(lt.bic11(), "BANKBEBBXXX");
        assert_eq!(lt.to_string(), "BANKBEBBAXXX");
    }

    #[test]
    fn test_logical_terminal_invalid() {
        assert!(LogicalTerminal::new("BANKBEBB").is_none());
        assert!(LogicalTerminal::new("BANKBEBBAXXXX").is_none());
        assert!(LogicalTerminal::new("BANK BEBAXXX").is_none());
    }

    #[test]
    fn test_user_block_name() {
        assert_eq!(UserBlockName::new("S").unwrap().as_char(), 'S');
        assert_eq!(UserBlockName::new("0").unwrap().as_char(), '0');
        assert!(UserBlockName::new("7").is_ok());
        assert!(UserBlockName::new("3").is_err());
        assert!(UserBlockName::new("SA").is_err());
        assert!(UserBlockName::new("").is_err());
    }

    #[test]
    fn test_priority_from_char() {
        assert_eq!(Priority::from_char('N'), Some(Priority::Normal));
        assert_eq!(Priority::from_char('U'), Some(Priority::Urgent));
        assert_eq!(Priority::from_char('S'), Some(Priority::System));
        assert_eq!(Priority::from_char('X'), None);
        assert_eq!(Priority::Urgent.as_char(), 'U');
    }

    #[test]
    fn test_delivery_monitoring_from_char() {
        assert_eq!(
            DeliveryMonitoring::from_char('3'),
            Some(DeliveryMonitoring::Both)
        );
        assert_eq!(DeliveryMonitoring::from_char('4'), None);
    }
}
