//! Identifier synthesis for enum members.
//!
//! Strings are Pascal-cased, booleans become `True`/`False` and integers are
//! spelled out in English (`1456` → `OneThousandFourHundredFiftySix`). Any
//! value whose derived name is not a valid identifier is keyed by its literal
//! text instead, which the printer quotes.

use std::collections::HashSet;

use heck::ToUpperCamelCase;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::print::is_identifier;
use crate::types::{EnumMember, Literal};

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Convert an enum value to a literal.
///
/// # Errors
///
/// [`Error::UnsupportedEnumValueType`] for arrays and objects.
pub fn literal(value: &Value) -> Result<Literal> {
    match value {
        Value::String(s) => Ok(Literal::String(s.clone())),
        Value::Number(n) => Ok(Literal::Number(n.clone())),
        Value::Bool(b) => Ok(Literal::Bool(*b)),
        Value::Null => Ok(Literal::Null),
        Value::Array(_) | Value::Object(_) => Err(unsupported(value)),
    }
}

/// Member identifier for one enum value.
///
/// # Errors
///
/// [`Error::UnsupportedEnumValueType`] for `null`, arrays and objects.
pub fn member_name(value: &Value) -> Result<String> {
    let (candidate, fallback) = match value {
        Value::String(s) => (s.to_upper_camel_case(), s.clone()),
        Value::Bool(true) => return Ok("True".to_string()),
        Value::Bool(false) => return Ok("False".to_string()),
        Value::Number(n) => {
            let words = if let Some(u) = n.as_u64() {
                Some(number_to_words(u))
            } else {
                n.as_i64()
                    .map(|i| format!("minus {}", number_to_words(i.unsigned_abs())))
            };
            (
                words.map(|w| w.to_upper_camel_case()).unwrap_or_default(),
                n.to_string(),
            )
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return Err(unsupported(value)),
    };

    Ok(if is_identifier(&candidate) {
        candidate
    } else {
        fallback
    })
}

/// Members for an enum declaration, in declared order.
///
/// `null` entries are skipped (nullability is expressed on the use site).
/// When two values map to the same identifier, later ones are keyed by
/// their literal text.
///
/// # Errors
///
/// [`Error::UnsupportedEnumValueType`] for arrays and objects.
pub fn enum_members(values: &[Value]) -> Result<Vec<EnumMember>> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();
    for value in values.iter().filter(|v| !v.is_null()) {
        let mut identifier = member_name(value)?;
        if !seen.insert(identifier.clone()) {
            identifier = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            seen.insert(identifier.clone());
        }
        members.push(EnumMember {
            identifier,
            value: literal(value)?,
        });
    }
    Ok(members)
}

/// Spell `n` in English words, e.g. `1456` → `one thousand four hundred
/// fifty-six`.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    let mut scale = 0;
    while rest > 0 {
        let group = rest % 1000;
        if group > 0 {
            let mut words = below_thousand(group);
            if !SCALES[scale].is_empty() {
                words.push(' ');
                words.push_str(SCALES[scale]);
            }
            groups.push(words);
        }
        rest /= 1000;
        scale += 1;
    }
    groups.reverse();
    groups.join(" ")
}

fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let remainder = n % 100;
    let mut parts = Vec::new();
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[index(hundreds)]));
    }
    if remainder > 0 {
        parts.push(below_hundred(remainder));
    }
    parts.join(" ")
}

fn below_hundred(n: u64) -> String {
    if n < 20 {
        return ONES[index(n)].to_string();
    }
    let tens = TENS[index(n / 10)];
    match n % 10 {
        0 => tens.to_string(),
        ones => format!("{tens}-{}", ONES[index(ones)]),
    }
}

#[allow(clippy::cast_possible_truncation)] // always < 20
fn index(n: u64) -> usize {
    n as usize
}

fn unsupported(value: &Value) -> Error {
    Error::UnsupportedEnumValueType {
        value: value.to_string(),
    }
}
