// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bitcoin amount parsing and validation.
//!
//! Users type amounts as decimal BTC strings (`"0.015"`); everything past this
//! module works in integral satoshis. The conversion never goes through a
//! floating-point value: the whole and fractional digit strings are parsed
//! separately and combined with checked integer arithmetic, so balances near
//! or above 2^53 satoshis convert exactly.
//!
//! ## Rules (applied in order)
//!
//! 1. Non-empty, plain decimal (`[+-]digits[.digits]`). No exponents, no
//!    `NaN`/`inf`, no inner whitespace.
//! 2. Strictly greater than zero.
//! 3. At most 8 fractional digits.
//! 4. `floor(value * 100_000_000)` must fit in a `u64`.
//! 5. When the balance is known, the amount must not exceed it.
//!
//! With an unknown balance (`None`) rule 5 is skipped. That is the
//! unchecked-balance mode: callers keep submission disabled until the balance
//! has loaded.

/// Satoshis in one bitcoin.
pub const SATOSHIS_PER_BTC: u64 = 100_000_000;

/// Maximum number of fractional digits (satoshi precision).
pub const MAX_DECIMALS: usize = 8;

/// Reason an amount was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is required")]
    Empty,

    #[error("amount is not a valid decimal number")]
    NotANumber,

    #[error("amount must be greater than zero")]
    NonPositive,

    #[error("amount has {digits} decimal places (max {max})", max = MAX_DECIMALS)]
    TooPrecise { digits: usize },

    #[error("amount is too large")]
    Overflow,

    #[error("amount of {requested} sats exceeds available balance of {available} sats")]
    ExceedsBalance { requested: u64, available: u64 },
}

/// Parse a decimal BTC string into satoshis (rules 1-4).
pub fn parse_btc_amount(input: &str) -> Result<u64, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::NotANumber);
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AmountError::NotANumber);
    }

    let is_zero = whole.bytes().chain(fraction.bytes()).all(|b| b == b'0');
    if negative || is_zero {
        return Err(AmountError::NonPositive);
    }

    if fraction.len() > MAX_DECIMALS {
        return Err(AmountError::TooPrecise {
            digits: fraction.len(),
        });
    }

    // u128 holds 38 full decimal digits; anything longer cannot fit a u64 anyway.
    let significant_whole = whole.trim_start_matches('0');
    if significant_whole.len() > 38 {
        return Err(AmountError::Overflow);
    }
    let whole_value = if significant_whole.is_empty() {
        0u128
    } else {
        significant_whole
            .parse::<u128>()
            .map_err(|_| AmountError::NotANumber)?
    };

    let padded = format!("{:0<width$}", fraction, width = MAX_DECIMALS);
    let fraction_value = padded
        .parse::<u128>()
        .map_err(|_| AmountError::NotANumber)?;

    let total = whole_value
        .checked_mul(SATOSHIS_PER_BTC as u128)
        .and_then(|w| w.checked_add(fraction_value))
        .ok_or(AmountError::Overflow)?;

    u64::try_from(total).map_err(|_| AmountError::Overflow)
}

/// Validate an amount and return it in satoshis (rules 1-5).
pub fn validate_amount(input: &str, available_balance: Option<u64>) -> Result<u64, AmountError> {
    let satoshis = parse_btc_amount(input)?;

    if let Some(available) = available_balance {
        if satoshis > available {
            return Err(AmountError::ExceedsBalance {
                requested: satoshis,
                available,
            });
        }
    }

    Ok(satoshis)
}

/// Boolean form of [`validate_amount`].
pub fn validate(input: &str, available_balance: Option<u64>) -> bool {
    validate_amount(input, available_balance).is_ok()
}

/// Format satoshis as BTC with exactly 8 decimals (`"2.50000000"`).
pub fn format_btc(satoshis: u64) -> String {
    format!(
        "{}.{:0width$}",
        satoshis / SATOSHIS_PER_BTC,
        satoshis % SATOSHIS_PER_BTC,
        width = MAX_DECIMALS
    )
}

/// Human-readable amount with trailing zeros trimmed (`"2.5 BTC"`).
pub fn display_btc(satoshis: u64) -> String {
    let whole = satoshis / SATOSHIS_PER_BTC;
    let remainder = satoshis % SATOSHIS_PER_BTC;

    if remainder == 0 {
        return format!("{whole} BTC");
    }

    let decimals = format!("{:0width$}", remainder, width = MAX_DECIMALS);
    format!("{}.{} BTC", whole, decimals.trim_end_matches('0'))
}
