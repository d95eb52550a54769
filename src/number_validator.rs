// 🔢 Number Validator - fixed-point decimal format N(m.k)
//
// m = precision: max number of characters counted, sign included
//     (for negative numbers) plus integer and fraction digits, separator excluded
// k = scale: max number of fraction digits
// N(m) is shorthand for N(m.0), i.e. an integer format.

use crate::error::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

// ============================================================================
// NUMBER FORMAT
// ============================================================================

/// Validated `(precision, scale, only_positive)` triple.
///
/// Only constructible through [`NumberFormat::new`] (or deserialization and
/// notation parsing, which go through the same checks), so a held value
/// always satisfies `0 <= scale < precision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNumberFormat")]
pub struct NumberFormat {
    precision: u64,
    scale: u64,
    only_positive: bool,
}

/// Unchecked shape used for deserialization
#[derive(Deserialize)]
struct RawNumberFormat {
    precision: i64,
    #[serde(default)]
    scale: i64,
    #[serde(default)]
    only_positive: bool,
}

impl TryFrom<RawNumberFormat> for NumberFormat {
    type Error = ConfigurationError;

    fn try_from(raw: RawNumberFormat) -> Result<Self> {
        NumberFormat::new(raw.precision, raw.scale, raw.only_positive)
    }
}

impl NumberFormat {
    pub fn new(precision: i64, scale: i64, only_positive: bool) -> Result<Self> {
        if precision <= 0 {
            return Err(ConfigurationError::NonPositivePrecision(precision));
        }
        if scale < 0 || scale >= precision {
            return Err(ConfigurationError::ScaleOutOfRange { precision, scale });
        }

        Ok(NumberFormat {
            precision: precision as u64,
            scale: scale as u64,
            only_positive,
        })
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn scale(&self) -> u64 {
        self.scale
    }

    pub fn only_positive(&self) -> bool {
        self.only_positive
    }

    /// Builder: restrict to non-negative values
    pub fn positive_only(mut self) -> Self {
        self.only_positive = true;
        self
    }
}

/// Renders `N(m)` or `N(m.k)`. The sign policy has no notation and is not shown.
impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            write!(f, "N({})", self.precision)
        } else {
            write!(f, "N({}.{})", self.precision, self.scale)
        }
    }
}

/// Parses `N(m)`, `N(m.k)` or `N(m,k)`; `only_positive` is always false.
impl FromStr for NumberFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ConfigurationError::InvalidNotation(s.to_string());

        let body = s
            .trim()
            .strip_prefix(['N', 'n'])
            .and_then(|rest| rest.trim_start().strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let (precision, scale) = match body.split_once(['.', ',']) {
            Some((m, k)) => (m, Some(k)),
            None => (body, None),
        };

        let precision: i64 = precision.trim().parse().map_err(|_| invalid())?;
        let scale: i64 = match scale {
            Some(k) => k.trim().parse().map_err(|_| invalid())?,
            None => 0,
        };

        NumberFormat::new(precision, scale, false)
    }
}

// ============================================================================
// PARSED NUMBER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn as_char(&self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

/// Shape of a string that matched `[+-]?\d+([.,]\d+)?`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedNumber {
    pub sign: Option<Sign>,
    pub integer_digits: usize,
    pub separator: Option<char>,
    pub fraction_digits: usize,
}

impl ParsedNumber {
    /// Scan the whole string. Returns None unless every character belongs to
    /// the pattern; only ASCII digits count as digits.
    pub fn scan(value: &str) -> Option<ParsedNumber> {
        let bytes = value.as_bytes();

        let sign = match bytes.first() {
            Some(b'+') => Some(Sign::Plus),
            Some(b'-') => Some(Sign::Minus),
            _ => None,
        };
        let mut pos = usize::from(sign.is_some());

        let integer_digits = count_digits(&bytes[pos..]);
        if integer_digits == 0 {
            return None;
        }
        pos += integer_digits;

        if pos == bytes.len() {
            return Some(ParsedNumber {
                sign,
                integer_digits,
                separator: None,
                fraction_digits: 0,
            });
        }

        let separator = match bytes[pos] {
            b'.' => '.',
            b',' => ',',
            _ => return None,
        };
        pos += 1;

        let fraction_digits = count_digits(&bytes[pos..]);
        if fraction_digits == 0 || pos + fraction_digits != bytes.len() {
            return None;
        }

        Some(ParsedNumber {
            sign,
            integer_digits,
            separator: Some(separator),
            fraction_digits,
        })
    }

    /// Characters counted against precision: sign + integer + fraction digits
    pub fn digit_count(&self) -> usize {
        usize::from(self.sign.is_some()) + self.integer_digits + self.fraction_digits
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Some(Sign::Minus)
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// ============================================================================
// REJECTION
// ============================================================================

/// Why a value does not fit the format. Listed in the order checks run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// Absent or empty input
    Empty,

    /// Not `[+-]digits[(.|,)digits]`
    Malformed,

    /// Sign + integer + fraction digits exceed precision
    TooManyDigits { used: usize, precision: u64 },

    /// Fraction digits exceed scale
    TooManyFractionDigits { used: usize, scale: u64 },

    /// Explicit `-` while only positive values are allowed
    NegativeNotAllowed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "value is empty"),
            Rejection::Malformed => write!(f, "value is not a decimal number"),
            Rejection::TooManyDigits { used, precision } => {
                write!(f, "{} digits (sign included) exceed precision {}", used, precision)
            }
            Rejection::TooManyFractionDigits { used, scale } => {
                write!(f, "{} fraction digits exceed scale {}", used, scale)
            }
            Rejection::NegativeNotAllowed => write!(f, "negative values are not allowed"),
        }
    }
}

// ============================================================================
// NUMBER VALIDATOR
// ============================================================================

/// Checks strings against a fixed [`NumberFormat`].
///
/// Holds no mutable state; share freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberValidator {
    format: NumberFormat,
}

impl NumberValidator {
    /// Create a validator, rejecting `precision <= 0` and `scale` outside `0..precision`
    pub fn new(precision: i64, scale: i64, only_positive: bool) -> Result<Self> {
        Ok(Self::from_format(NumberFormat::new(precision, scale, only_positive)?))
    }

    /// Integer-only validator accepting either sign
    pub fn with_precision(precision: i64) -> Result<Self> {
        Self::new(precision, 0, false)
    }

    pub fn from_format(format: NumberFormat) -> Self {
        NumberValidator { format }
    }

    pub fn format(&self) -> &NumberFormat {
        &self.format
    }

    pub fn is_valid_number(&self, value: Option<&str>) -> bool {
        self.check(value).is_ok()
    }

    /// Same verdict as [`is_valid_number`](Self::is_valid_number), with the reason
    pub fn check(&self, value: Option<&str>) -> std::result::Result<ParsedNumber, Rejection> {
        let result = self.evaluate(value);
        if let Err(rejection) = &result {
            trace!(value = ?value, format = %self.format, %rejection, "number rejected");
        }
        result
    }

    fn evaluate(&self, value: Option<&str>) -> std::result::Result<ParsedNumber, Rejection> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return Err(Rejection::Empty),
        };

        let parsed = ParsedNumber::scan(value).ok_or(Rejection::Malformed)?;

        let used = parsed.digit_count();
        if used as u64 > self.format.precision {
            return Err(Rejection::TooManyDigits {
                used,
                precision: self.format.precision,
            });
        }

        if parsed.fraction_digits as u64 > self.format.scale {
            return Err(Rejection::TooManyFractionDigits {
                used: parsed.fraction_digits,
                scale: self.format.scale,
            });
        }

        if self.format.only_positive && parsed.is_negative() {
            return Err(Rejection::NegativeNotAllowed);
        }

        Ok(parsed)
    }
}
