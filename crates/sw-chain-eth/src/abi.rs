//! Minimal Solidity ABI encoding for the wallet contract's three functions.

use anyhow::{Result, bail};
use sha3::{Digest, Keccak256};
use sw_api_types::{AccountAddress, Wei};

pub const IS_ALLOWED_TO_SEND: &str = "isAllowedToSend(address)";
pub const ALLOW_ADDRESS_TO_SEND_MONEY: &str = "allowAddressToSendMoney(address)";
pub const SEND_FUNDS: &str = "sendFunds(uint256,address)";

/// Functions the wallet calls; a usable artifact must declare all of them.
pub const WALLET_FUNCTIONS: [&str; 3] = [IS_ALLOWED_TO_SEND, ALLOW_ADDRESS_TO_SEND_MONEY, SEND_FUNDS];

const WORD: usize = 32;

#[derive(Debug, Clone, Copy)]
pub enum Token<'a> {
    Address(&'a AccountAddress),
    Uint(Wei),
}

/// First four bytes of the Keccak-256 of the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// `"sendFunds(uint256,address)"` -> `"sendFunds"`.
pub fn function_name(signature: &str) -> &str {
    signature.split_once('(').map_or(signature, |(name, _)| name)
}

/// Encode a call as `0x`-prefixed calldata.
pub fn encode_call(signature: &str, tokens: &[Token<'_>]) -> Result<String> {
    let mut data = Vec::with_capacity(4 + tokens.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for token in tokens {
        let word = match token {
            Token::Address(address) => encode_address(address)?,
            Token::Uint(value) => encode_uint(*value),
        };
        data.extend_from_slice(&word);
    }
    Ok(format!("0x{}", hex::encode(data)))
}

fn encode_address(address: &AccountAddress) -> Result<[u8; WORD]> {
    let text = address.as_str().trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let bytes = match hex::decode(digits) {
        Ok(bytes) => bytes,
        Err(err) => bail!("invalid address '{text}': {err}"),
    };
    if bytes.len() != 20 {
        bail!("invalid address '{text}': expected 20 bytes, got {}", bytes.len());
    }
    let mut word = [0_u8; WORD];
    word[WORD - 20..].copy_from_slice(&bytes);
    Ok(word)
}

fn encode_uint(value: Wei) -> [u8; WORD] {
    value.to_be_bytes()
}

/// Decode a single ABI `bool` return value.
pub fn decode_bool(result: &str) -> Result<bool> {
    let digits = result.strip_prefix("0x").unwrap_or(result);
    let bytes = hex::decode(digits)?;
    if bytes.len() != WORD {
        bail!("expected a 32-byte bool word, got {} bytes", bytes.len());
    }
    match bytes[WORD - 1] {
        0 if bytes[..WORD - 1].iter().all(|b| *b == 0) => Ok(false),
        1 if bytes[..WORD - 1].iter().all(|b| *b == 0) => Ok(true),
        _ => bail!("malformed bool word 0x{digits}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_known_erc20_values() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
    }

    #[test]
    fn function_names_strip_parameters() {
        assert_eq!(function_name(SEND_FUNDS), "sendFunds");
        assert_eq!(function_name("fallback"), "fallback");
    }

    #[test]
    fn encodes_uint_then_address() {
        let dest = AccountAddress("0x00000000000000000000000000000000000000aa".to_owned());
        let data = encode_call(SEND_FUNDS, &[Token::Uint(Wei::from(1_000)), Token::Address(&dest)]).unwrap();

        assert_eq!(data.len(), 2 + 8 + 64 * 2);
        assert!(data.starts_with(&format!("0x{}", hex::encode(selector(SEND_FUNDS)))));
        assert!(data[10..74].ends_with("3e8"));
        assert!(data[74..].ends_with("aa"));
        assert!(data[74..138].starts_with("000000000000000000000000"));
    }

    #[test]
    fn encodes_full_width_uint() {
        let dest = AccountAddress("0x00000000000000000000000000000000000000aa".to_owned());
        let amount = Wei::from_hex_quantity("0x100000000000000000000000000000000").unwrap();
        let data = encode_call(SEND_FUNDS, &[Token::Uint(amount), Token::Address(&dest)]).unwrap();

        assert_eq!(&data[10..74], format!("{}1{}", "0".repeat(31), "0".repeat(32)));
    }

    #[test]
    fn rejects_malformed_addresses() {
        let short = AccountAddress("0x1234".to_owned());
        assert!(encode_call(IS_ALLOWED_TO_SEND, &[Token::Address(&short)]).is_err());

        let garbage = AccountAddress("not-an-address".to_owned());
        assert!(encode_call(ALLOW_ADDRESS_TO_SEND_MONEY, &[Token::Address(&garbage)]).is_err());
    }

    #[test]
    fn decodes_bool_words() {
        let truthy = format!("0x{}1", "0".repeat(63));
        let falsy = format!("0x{}", "0".repeat(64));
        assert!(decode_bool(&truthy).unwrap());
        assert!(!decode_bool(&falsy).unwrap());
        assert!(decode_bool("0x").is_err());
        assert!(decode_bool(&format!("0x{}2", "0".repeat(63))).is_err());
    }
}
