use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("base {0} is outside the supported range 2..=36")]
    UnsupportedBase(u32),
    #[error("encoded value is empty")]
    Empty,
    #[error("invalid digit {character:?} at position {position} for base {base}")]
    InvalidDigit {
        character: char,
        position: usize,
        base: u32,
    },
}

/// Decodes `digits`, written most significant digit first in `base`, into an exact integer.
///
/// Digits are `0-9` then `a-z` (case-insensitive). No sign, whitespace or fractional part is accepted.
pub fn decode(digits: &str, base: u32) -> Result<BigUint, DecodeError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(DecodeError::UnsupportedBase(base));
    }
    if digits.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut value = BigUint::zero();
    for (position, character) in digits.chars().enumerate() {
        let digit = digit_value(character)
            .filter(|d| *d < base)
            .ok_or(DecodeError::InvalidDigit {
                character,
                position,
                base,
            })?;
        // Horner form of sum(digit * base^position_from_right)
        value = value * base + digit;
    }
    Ok(value)
}

/// Encodes `value` in `base` using lowercase digits, the inverse of [`decode`].
pub fn encode(value: &BigUint, base: u32) -> Result<String, DecodeError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(DecodeError::UnsupportedBase(base));
    }
    Ok(value.to_str_radix(base))
}

fn digit_value(character: char) -> Option<u32> {
    match character {
        '0'..='9' => Some(character as u32 - '0' as u32),
        'a'..='z' => Some(10 + character as u32 - 'a' as u32),
        'A'..='Z' => Some(10 + character as u32 - 'A' as u32),
        _ => None,
    }
}
