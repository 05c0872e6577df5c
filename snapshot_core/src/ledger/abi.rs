//! Just enough ERC-20 ABI encoding for `balanceOf`, `name` and `symbol`.

use alloy_primitives::{Address, U256};

use crate::error::{LedgerError, LedgerResult};

pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
pub const NAME_SELECTOR: [u8; 4] = [0x06, 0xfd, 0xde, 0x03];
pub const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];

const WORD: usize = 32;

pub fn encode_balance_of(holder: &Address) -> String {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(holder.as_slice());
    format!("0x{}", hex::encode(data))
}

pub fn encode_selector(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

pub fn block_tag(block: u64) -> String {
    format!("0x{:x}", block)
}

pub fn decode_hex(data: &str) -> LedgerResult<Vec<u8>> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|e| LedgerError::Query(format!("Invalid hex in result: {}", e)))
}

pub fn decode_uint256(data: &[u8]) -> LedgerResult<U256> {
    if data.len() != WORD {
        return Err(LedgerError::Query(format!(
            "Expected a 32-byte uint256, got {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(data))
}

/// Decode a `string` return value, falling back to `bytes32` for legacy tokens.
pub fn decode_string(data: &[u8]) -> LedgerResult<String> {
    if data.len() == WORD {
        let end = data.iter().rposition(|b| *b != 0).map_or(0, |idx| idx + 1);
        return String::from_utf8(data[..end].to_vec())
            .map_err(|e| LedgerError::Query(format!("bytes32 is not UTF-8: {}", e)));
    }

    if data.len() < 2 * WORD {
        return Err(LedgerError::Query(format!(
            "Expected an ABI string, got {} bytes",
            data.len()
        )));
    }

    let offset = word_to_usize(&data[..WORD])?;
    let len_end = offset
        .checked_add(WORD)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| LedgerError::Query("ABI string offset out of bounds".to_string()))?;
    let len = word_to_usize(&data[offset..len_end])?;
    let str_end = len_end
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| LedgerError::Query("ABI string length out of bounds".to_string()))?;

    String::from_utf8(data[len_end..str_end].to_vec())
        .map_err(|e| LedgerError::Query(format!("ABI string is not UTF-8: {}", e)))
}

fn word_to_usize(word: &[u8]) -> LedgerResult<usize> {
    let value = U256::from_be_slice(word);
    u64::try_from(value)
        .ok()
        .and_then(|value| usize::try_from(value).ok())
        .ok_or_else(|| LedgerError::Query("ABI word out of range".to_string()))
}
