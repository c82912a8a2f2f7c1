//! The "twenty divided by" input exercise.
//!
//! Reads one value per line until the literal line `end`, printing either
//! `20 / value` or a one-letter marker naming the failure, then `OK`.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::num::IntErrorKind;

use log::debug;
use thiserror::Error;

pub const DIVIDEND: i64 = 20;
pub const END_TOKEN: &str = "end";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("not an integer: {0:?}")]
    InvalidValue(String),
    #[error("division by zero")]
    DivisionByZero,
    /// Negative values have no defined operation.
    #[error("no operation defined for negative value {0}")]
    UndefinedOperation(String),
}

impl ScriptError {
    pub fn marker(&self) -> char {
        match self {
            ScriptError::InvalidValue(_) => 'v',
            ScriptError::DivisionByZero => 'z',
            ScriptError::UndefinedOperation(_) => 'x',
        }
    }
}

/// Evaluate a single input line.
///
/// Integers are unbounded in meaning: a value too large for `i64` still
/// divides (to zero) when positive and still takes the negative path when
/// negative.  Single underscores between digits group them, as in `1_000`.
pub fn evaluate(line: &str) -> Result<i64, ScriptError> {
    let text = line.trim();
    let digits =
        strip_digit_separators(text).ok_or_else(|| ScriptError::InvalidValue(text.to_string()))?;
    match digits.parse::<i64>() {
        Ok(divisor) if divisor < 0 => Err(ScriptError::UndefinedOperation(text.to_string())),
        Ok(0) => Err(ScriptError::DivisionByZero),
        Ok(divisor) => Ok(DIVIDEND.div_euclid(divisor)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(0),
            IntErrorKind::NegOverflow => Err(ScriptError::UndefinedOperation(text.to_string())),
            _ => Err(ScriptError::InvalidValue(text.to_string())),
        },
    }
}

/// Drop the `_` separators from an optionally signed digit string.  `None`
/// when an underscore is doubled, leading or trailing.
fn strip_digit_separators(text: &str) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    let sign = &text[..text.len() - unsigned.len()];
    let mut joined = String::from(sign);
    for group in unsigned.split('_') {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        joined.push_str(group);
    }
    Some(Cow::Owned(joined))
}

/// Output token for one line: the quotient, or the failure's marker.
pub fn token(line: &str) -> String {
    match evaluate(line) {
        Ok(quotient) => quotient.to_string(),
        Err(e) => {
            debug!("{line:?}: {e}");
            e.marker().to_string()
        }
    }
}

/// Run the exercise over a whole stream.  Running out of input counts as `end`.
pub fn run<R: BufRead, W: Write>(input: R, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line == END_TOKEN {
            break;
        }
        write!(out, "{} ", token(&line))?;
    }
    writeln!(out, "OK")?;
    out.flush()
}
