use alloy_primitives::U256;

use crate::error::AmountError;

// 10^78 no longer fits in 256 bits.
const MAX_DECIMAL_EXPONENT: i64 = 77;

/// Parse a claimed balance into exact base units.
///
/// Accepts plain integers (`"100"`) and the scientific notation spreadsheets and
/// bignumber libraries emit (`"2e+26"`, `"1.5E3"`), as long as the value reduces to a
/// whole, non-negative number of base units.
pub fn parse_amount(text: &str) -> Result<U256, AmountError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(trimmed.to_string()));
    }

    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let invalid = || AmountError::Invalid(trimmed.to_string());

    let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
        Some(idx) => {
            let exponent = unsigned[idx + 1..].parse::<i64>().map_err(|_| invalid())?;
            (&unsigned[..idx], exponent)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let digits = format!("{}{}", int_part, frac_part);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    let scale = exponent
        .checked_sub(frac_part.len() as i64)
        .ok_or_else(|| AmountError::Overflow(trimmed.to_string()))?;

    if scale >= 0 {
        if scale > MAX_DECIMAL_EXPONENT {
            return Err(AmountError::Overflow(trimmed.to_string()));
        }
        let base = U256::from_str_radix(digits, 10)
            .map_err(|_| AmountError::Overflow(trimmed.to_string()))?;
        let factor = U256::from(10u64)
            .checked_pow(U256::from(scale as u64))
            .ok_or_else(|| AmountError::Overflow(trimmed.to_string()))?;
        return base
            .checked_mul(factor)
            .ok_or_else(|| AmountError::Overflow(trimmed.to_string()));
    }

    let shift = scale.unsigned_abs();
    if shift >= digits.len() as u64 {
        return Err(AmountError::Fractional(trimmed.to_string()));
    }
    let (whole, dropped) = digits.split_at(digits.len() - shift as usize);
    if dropped.bytes().any(|b| b != b'0') {
        return Err(AmountError::Fractional(trimmed.to_string()));
    }

    U256::from_str_radix(whole, 10).map_err(|_| AmountError::Overflow(trimmed.to_string()))
}

/// Exact sum, `None` if it does not fit in 256 bits.
pub fn checked_sum<I>(amounts: I) -> Option<U256>
where
    I: IntoIterator<Item = U256>,
{
    amounts
        .into_iter()
        .try_fold(U256::ZERO, |acc, amount| acc.checked_add(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_integers() {
        assert_eq!(parse_amount("100").unwrap(), U256::from(100u64));
        assert_eq!(parse_amount("  0 ").unwrap(), U256::ZERO);
        assert_eq!(parse_amount("000123").unwrap(), U256::from(123u64));
        assert_eq!(
            parse_amount("200000000000000000000000000").unwrap(),
            U256::from(200_000_000u64) * U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn test_parse_scientific_notation() {
        let expected = U256::from(2u64) * U256::from(10u64).pow(U256::from(26u64));
        assert_eq!(parse_amount("2e+26").unwrap(), expected);
        assert_eq!(parse_amount("2E26").unwrap(), expected);
        assert_eq!(parse_amount("1.5E3").unwrap(), U256::from(1500u64));
        assert_eq!(parse_amount("15000e-1").unwrap(), U256::from(1500u64));
        assert_eq!(parse_amount("12.000").unwrap(), U256::from(12u64));
    }

    #[test]
    fn test_parse_rejects_malformed_amounts() {
        assert_eq!(parse_amount(""), Err(AmountError::Empty));
        assert!(matches!(parse_amount("-5"), Err(AmountError::Negative(_))));
        assert!(matches!(parse_amount("1,000"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("abc"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("."), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("1e"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("1.5"), Err(AmountError::Fractional(_))));
        assert!(matches!(parse_amount("15e-2"), Err(AmountError::Fractional(_))));
        assert!(matches!(parse_amount("1e78"), Err(AmountError::Overflow(_))));
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum(Vec::new()), Some(U256::ZERO));
        assert_eq!(
            checked_sum(vec![U256::from(100u64), U256::from(200u64)]),
            Some(U256::from(300u64))
        );
        assert_eq!(checked_sum(vec![U256::MAX, U256::from(1u64)]), None);
    }
}
