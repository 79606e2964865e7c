use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Dependents accepted by the form.
pub const MAX_DEPENDIENTES: u32 = 20;

/// Shown when the income text contained characters other than digits, commas and dots.
pub const INVALID_CHARS_MESSAGE: &str = "Solo se permiten números, comas y puntos.";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.,]").expect("static pattern is valid"));

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*(\.[0-9]*)?").expect("static pattern is valid"));

/// Error returned when form text cannot be turned into an input value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseInputError {
    #[error("income '{0}' is too large")]
    IncomeOutOfRange(String),

    #[error("dependents must be a whole number, got '{0}'")]
    InvalidDependientes(String),

    #[error("at most {MAX_DEPENDIENTES} dependents are allowed, got {0}")]
    TooManyDependientes(u32),
}

/// Income parsed from free-form text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIngresos {
    pub value: Decimal,
    /// Text left after dropping disallowed characters.
    pub filtered: String,
    /// Whether any character had to be dropped.
    pub had_invalid_chars: bool,
}

impl ParsedIngresos {
    /// Warning to show next to the field, if any.
    pub fn warning(&self) -> Option<&'static str> {
        self.had_invalid_chars.then_some(INVALID_CHARS_MESSAGE)
    }
}

/// Parses a monthly income typed into the form.
///
/// Anything other than digits, `.` and `,` is dropped (and flagged); commas
/// are thousands separators. The longest leading number is used, so
/// `"1.2.3"` reads as `1.2`. Empty or unparseable text is zero.
pub fn parse_ingresos(s: &str) -> Result<ParsedIngresos, ParseInputError> {
    let filtered = DISALLOWED.replace_all(s, "").into_owned();
    let had_invalid_chars = filtered != s;
    if had_invalid_chars {
        tracing::warn!(input = %s, filtered = %filtered, "dropped invalid characters from income");
    }

    let digits = filtered.replace(',', "");
    let number = LEADING_NUMBER
        .find(&digits)
        .map(|m| m.as_str().trim_end_matches('.'))
        .unwrap_or_default();

    let value = match number {
        "" => Decimal::ZERO,
        fraction if fraction.starts_with('.') => format!("0{fraction}")
            .parse()
            .map_err(|_| ParseInputError::IncomeOutOfRange(number.to_string()))?,
        _ => number
            .parse()
            .map_err(|_| ParseInputError::IncomeOutOfRange(number.to_string()))?,
    };

    Ok(ParsedIngresos {
        value,
        filtered,
        had_invalid_chars,
    })
}

/// Parses a dependent count. Empty text is zero.
pub fn parse_dependientes(s: &str) -> Result<u32, ParseInputError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let count: u32 = trimmed
        .parse()
        .map_err(|_| ParseInputError::InvalidDependientes(trimmed.to_string()))?;
    if count > MAX_DEPENDIENTES {
        return Err(ParseInputError::TooManyDependientes(count));
    }
    Ok(count)
}
