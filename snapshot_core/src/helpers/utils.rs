use regex::Regex;

/// Trim and lower-case a ledger address so rows compare and report consistently.
pub fn normalize_address(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Pull the first run of digits out of a cell such as `"Block #6543210"`.
pub fn extract_block_number(text: &str) -> Option<u64> {
    let re_digits = Regex::new(r"\d+").ok()?;
    re_digits.find(text)?.as_str().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("  0xAbCdEF0000000000000000000000000000000001 "),
            "0xabcdef0000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_extract_block_number() {
        assert_eq!(extract_block_number("Block #6543210"), Some(6543210));
        assert_eq!(extract_block_number("6543210"), Some(6543210));
        assert_eq!(extract_block_number("chosen at 12 then 13"), Some(12));
        assert_eq!(extract_block_number("TBD"), None);
        assert_eq!(extract_block_number(""), None);
    }
}
