/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # IronSwift Validation
//!
//! Structural validation of the identifiers carried in SWIFT messages.
//!
//! This crate provides:
//! - **BIC**: [`Bic`] split into institution, country, location and branch codes
//! - **IBAN**: [`Iban`] with the per-country BBAN table and the MOD-97-10 check
//! - **Country codes**: The ISO 3166-1 alpha-2 table shared by both
//!
//! Every check returns a closed error enumeration naming the failed rule rather
//! than a bare boolean.

pub mod bic;
pub mod country;
pub mod iban;

pub use bic::{Bic, BicError, validate_bic};
pub use country::is_valid_country_code;
pub use iban::{
    Iban, IbanError, bban_format, bban_length, compute_check_digits, is_supported_country,
    validate_iban,
};
