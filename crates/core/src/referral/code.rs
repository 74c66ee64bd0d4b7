//! Partner Codes

use std::{fmt, str::FromStr};

use rand::{Rng, seq::SliceRandom};
use serde::Serialize;
use thiserror::Error;

/// Length of every partner code.
pub const PARTNER_CODE_LEN: usize = 8;

/// Characters a partner code is drawn from. Excludes `0`, `1`, `I` and `O`.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Errors raised when parsing a partner code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartnerCodeError {
    /// Nothing but whitespace was supplied.
    #[error("partner code is empty")]
    Empty,

    /// The code does not have exactly [`PARTNER_CODE_LEN`] characters.
    #[error("partner code must be {PARTNER_CODE_LEN} characters, got {0}")]
    WrongLength(usize),

    /// The code contains a character outside the partner code alphabet.
    #[error("partner code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Shareable code tied to a confirmed booking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PartnerCode(String);

impl PartnerCode {
    /// Parse user input into a partner code.
    ///
    /// Surrounding whitespace is ignored and letters are upper-cased, so `" ab3defgh "` parses
    /// as `AB3DEFGH`. Embedded whitespace is rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`PartnerCodeError`] when the normalised input is empty, has the wrong length,
    /// or contains a character outside the partner code alphabet.
    pub fn parse(input: &str) -> Result<Self, PartnerCodeError> {
        let normalised = input.trim().to_ascii_uppercase();

        if normalised.is_empty() {
            return Err(PartnerCodeError::Empty);
        }

        if let Some(invalid) = normalised
            .chars()
            .find(|c| !u8::try_from(*c).is_ok_and(|byte| ALPHABET.contains(&byte)))
        {
            return Err(PartnerCodeError::InvalidCharacter(invalid));
        }

        let length = normalised.chars().count();

        if length != PARTNER_CODE_LEN {
            return Err(PartnerCodeError::WrongLength(length));
        }

        Ok(Self(normalised))
    }

    /// Draw a new random partner code.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..PARTNER_CODE_LEN)
            .filter_map(|_| ALPHABET.choose(&mut *rng).copied())
            .map(char::from)
            .collect();

        Self(code)
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the code, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PartnerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PartnerCode {
    type Err = PartnerCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PartnerCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_normalises_case_and_whitespace() -> TestResult {
        let code = PartnerCode::parse("  ab3defgh \n")?;

        assert_eq!(code.as_str(), "AB3DEFGH");

        Ok(())
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(PartnerCode::parse("   "), Err(PartnerCodeError::Empty));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            PartnerCode::parse("ABC"),
            Err(PartnerCodeError::WrongLength(3))
        );
    }

    #[test]
    fn parse_rejects_ambiguous_characters() {
        assert_eq!(
            PartnerCode::parse("ABCDEFG0"),
            Err(PartnerCodeError::InvalidCharacter('0'))
        );
        assert_eq!(
            PartnerCode::parse("ABC DEFG"),
            Err(PartnerCodeError::InvalidCharacter(' '))
        );
        assert_eq!(
            PartnerCode::parse("ABCDEFG한"),
            Err(PartnerCodeError::InvalidCharacter('한'))
        );
    }

    #[test]
    fn generated_codes_parse() -> TestResult {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let code = PartnerCode::generate(&mut rng);

            assert_eq!(code.as_str().len(), PARTNER_CODE_LEN);
            assert_eq!(PartnerCode::parse(code.as_str())?, code);
        }

        Ok(())
    }

    #[test]
    fn generated_codes_differ() {
        let mut rng = StdRng::seed_from_u64(42);

        let first = PartnerCode::generate(&mut rng);
        let second = PartnerCode::generate(&mut rng);

        assert_ne!(first, second);
    }
}
