/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Parser configuration.
//!
//! This module provides configuration options for the FIN decoder.

/// Configuration for the FIN decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Whether short or overlong block 1 and block 2 content is accepted.
    pub lenient: bool,
    /// Whether a block 5 `CHK` sub-field is verified against block 4.
    pub validate_checksum: bool,
}

impl ParserConfig {
    /// Creates a lenient configuration without checksum validation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lenient: true,
            validate_checksum: false,
        }
    }

    /// Lenient configuration: fixed-width header blocks may be truncated or overlong.
    #[must_use]
    pub const fn lenient() -> Self {
        Self::new()
    }

    /// Strict configuration: fixed-width header blocks must have an exact layout.
    #[must_use]
    pub const fn strict() -> Self {
        Self::new().with_lenient(false)
    }

    /// Sets whether fixed-width header blocks are parsed leniently.
    #[must_use]
    pub const fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Sets whether a declared block 5 checksum is verified.
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_default() {
        let config = ParserConfig::default();
        assert!(config.lenient);
        assert!(!config.validate_checksum);
        assert_eq!(config, ParserConfig::lenient());
    }

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::strict().with_checksum_validation(true);
        assert!(!config.lenient);
        assert!(config.validate_checksum);
        assert!(config.with_lenient(true).lenient);
    }
}
