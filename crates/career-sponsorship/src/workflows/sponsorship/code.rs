use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::careers::validate_month;

pub const DEFAULT_CODE_PREFIX: &str = "UGPA-RGI2";
pub const DEFAULT_PROGRAM_TOKEN: &str = "PRO134";

/// Formatted sponsorship identifier, e.g. `UGPA-RGI2-07-PRO134-2025-03`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SponsorshipCode(String);

impl SponsorshipCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SponsorshipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("teacher has no sequence number yet; save the teacher before generating a code")]
    MissingSequence,
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

/// Year and month stamped into a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePeriod {
    pub year: i32,
    pub month: u32,
}

impl CodePeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, CodeError> {
        let month = validate_month(month).map_err(|_| CodeError::InvalidMonth(month))?;
        Ok(Self { year, month })
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }
}

/// Builds `PREFIX-SEQ-PROGRAM-YEAR-MONTH` with the sequence and month padded to
/// two digits.
pub fn generate(
    sequence: Option<u32>,
    program_token: &str,
    year: i32,
    month: u32,
) -> Result<SponsorshipCode, CodeError> {
    SponsorshipCodeGenerator::new(DEFAULT_CODE_PREFIX, program_token)
        .generate(sequence, CodePeriod::new(year, month)?)
}

/// Code generator bound to a configured prefix and program token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorshipCodeGenerator {
    prefix: String,
    program_token: String,
}

impl Default for SponsorshipCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_PREFIX, DEFAULT_PROGRAM_TOKEN)
    }
}

impl SponsorshipCodeGenerator {
    pub fn new(prefix: impl Into<String>, program_token: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            program_token: program_token.into(),
        }
    }

    pub fn program_token(&self) -> &str {
        &self.program_token
    }

    /// A sequence of zero counts as absent: the store numbers teachers from one.
    pub fn generate(
        &self,
        sequence: Option<u32>,
        period: CodePeriod,
    ) -> Result<SponsorshipCode, CodeError> {
        let sequence = sequence
            .filter(|value| *value > 0)
            .ok_or(CodeError::MissingSequence)?;
        let month = validate_month(period.month).map_err(|_| CodeError::InvalidMonth(period.month))?;

        Ok(SponsorshipCode(format!(
            "{}-{:02}-{}-{}-{:02}",
            self.prefix, sequence, self.program_token, period.year, month
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_single_digit_sequence_and_month() {
        let code = generate(Some(7), "PRO134", 2025, 3).expect("code");
        assert_eq!(code.as_str(), "UGPA-RGI2-07-PRO134-2025-03");
    }

    #[test]
    fn matches_expected_format_for_every_two_digit_sequence() {
        for sequence in 1..=99u32 {
            let code = generate(Some(sequence), "PRO134", 2025, 3).expect("code");
            let expected = if sequence < 10 {
                format!("UGPA-RGI2-0{sequence}-PRO134-2025-03")
            } else {
                format!("UGPA-RGI2-{sequence}-PRO134-2025-03")
            };
            assert_eq!(code.to_string(), expected);
        }
    }

    #[test]
    fn wide_sequences_keep_natural_width() {
        let code = generate(Some(123), "PRO134", 2026, 11).expect("code");
        assert_eq!(code.as_str(), "UGPA-RGI2-123-PRO134-2026-11");
    }

    #[test]
    fn absent_sequence_produces_no_code() {
        assert_eq!(
            generate(None, "PRO134", 2025, 3),
            Err(CodeError::MissingSequence)
        );
        assert_eq!(
            generate(Some(0), "PRO134", 2025, 3),
            Err(CodeError::MissingSequence)
        );
    }

    #[test]
    fn rejects_months_outside_calendar() {
        assert_eq!(
            generate(Some(4), "PRO134", 2025, 13),
            Err(CodeError::InvalidMonth(13))
        );
        assert_eq!(CodePeriod::new(2025, 0), Err(CodeError::InvalidMonth(0)));
    }

    #[test]
    fn configured_generator_uses_its_tokens() {
        let generator = SponsorshipCodeGenerator::new("UGPA-X", "PRO200");
        let period = CodePeriod::new(2024, 12).expect("period");
        let code = generator.generate(Some(15), period).expect("code");
        assert_eq!(code.as_str(), "UGPA-X-15-PRO200-2024-12");
    }

    #[test]
    fn current_period_is_a_calendar_month() {
        let period = CodePeriod::current();
        assert!((1..=12).contains(&period.month));
    }
}
