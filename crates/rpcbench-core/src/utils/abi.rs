//! Minimal contract ABI encoding for the read calls the engine issues.
//!
//! Only static `address` / `uint256` parameters are supported. Calls are encoded as the 4-byte
//! selector followed by one left-padded 32-byte word per parameter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::adapters::BenchError;

/// Sentinel vote for a string or metadata result that decoded to something present.
pub const VALID_DATA: &str = "Valid Data";

/// Sentinel vote for a result that is not valid hex or too short for its return type.
pub const DECODE_ERROR: &str = "Decode Error";

const WORD: usize = 32;

/// Read methods with a fixed selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbiMethod {
    #[serde(rename = "totalSupply")]
    TotalSupply,
    #[serde(rename = "balanceOf")]
    BalanceOf,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "symbol")]
    Symbol,
    #[serde(rename = "decimals")]
    Decimals,
    #[serde(rename = "ownerOf")]
    OwnerOf,
    #[serde(rename = "tokenURI")]
    TokenUri,
    #[serde(rename = "uri")]
    Uri,
    /// ERC-1155 `balanceOf(address,uint256)`.
    #[serde(rename = "balanceOf(address,uint256)")]
    BalanceOfToken,
}

/// How a method's return data is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Numeric,
    Address,
    /// Strings and metadata. Only presence matters.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Address,
    Uint,
}

impl AbiMethod {
    #[must_use]
    pub const fn signature(self) -> &'static str {
        match self {
            Self::TotalSupply => "totalSupply()",
            Self::BalanceOf => "balanceOf(address)",
            Self::Name => "name()",
            Self::Symbol => "symbol()",
            Self::Decimals => "decimals()",
            Self::OwnerOf => "ownerOf(uint256)",
            Self::TokenUri => "tokenURI(uint256)",
            Self::Uri => "uri(uint256)",
            Self::BalanceOfToken => "balanceOf(address,uint256)",
        }
    }

    /// First four bytes of the keccak-256 of [`Self::signature`].
    #[must_use]
    pub const fn selector(self) -> [u8; 4] {
        match self {
            Self::TotalSupply => [0x18, 0x16, 0x0d, 0xdd],
            Self::BalanceOf => [0x70, 0xa0, 0x82, 0x31],
            Self::Name => [0x06, 0xfd, 0xde, 0x03],
            Self::Symbol => [0x95, 0xd8, 0x9b, 0x41],
            Self::Decimals => [0x31, 0x3c, 0xe5, 0x67],
            Self::OwnerOf => [0x63, 0x52, 0x21, 0x1e],
            Self::TokenUri => [0xc8, 0x7b, 0x56, 0xdd],
            Self::Uri => [0x0e, 0x89, 0x34, 0x1c],
            Self::BalanceOfToken => [0x00, 0xfd, 0xd5, 0x8e],
        }
    }

    #[must_use]
    pub const fn params(self) -> &'static [ParamKind] {
        match self {
            Self::TotalSupply | Self::Name | Self::Symbol | Self::Decimals => &[],
            Self::BalanceOf => &[ParamKind::Address],
            Self::OwnerOf | Self::TokenUri | Self::Uri => &[ParamKind::Uint],
            Self::BalanceOfToken => &[ParamKind::Address, ParamKind::Uint],
        }
    }

    #[must_use]
    pub const fn return_kind(self) -> ReturnKind {
        match self {
            Self::TotalSupply | Self::BalanceOf | Self::Decimals | Self::BalanceOfToken => {
                ReturnKind::Numeric
            }
            Self::OwnerOf => ReturnKind::Address,
            Self::Name | Self::Symbol | Self::TokenUri | Self::Uri => ReturnKind::Opaque,
        }
    }
}

impl fmt::Display for AbiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature())
    }
}

/// One call argument, as written in configuration (`{ address = "0x…" }` or `{ uint = 1 }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiParam {
    Address(String),
    Uint(u64),
}

impl AbiParam {
    fn kind(&self) -> ParamKind {
        match self {
            Self::Address(_) => ParamKind::Address,
            Self::Uint(_) => ParamKind::Uint,
        }
    }

    fn to_word(&self) -> Result<[u8; WORD], BenchError> {
        let mut word = [0u8; WORD];
        match self {
            Self::Address(address) => word[12..].copy_from_slice(&parse_address(address)?),
            Self::Uint(value) => word[24..].copy_from_slice(&value.to_be_bytes()),
        }
        Ok(word)
    }
}

/// Parses a `0x`-prefixed 20-byte hex address.
///
/// # Errors
///
/// Returns [`BenchError::InvalidAddress`] for a missing prefix, wrong length or non-hex digits.
pub fn parse_address(address: &str) -> Result<[u8; 20], BenchError> {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| BenchError::InvalidAddress(address.to_string()))?;

    let mut out = [0u8; 20];
    hex::decode_to_slice(digits, &mut out)
        .map_err(|_| BenchError::InvalidAddress(address.to_string()))?;
    Ok(out)
}

/// Encodes `method(params…)` as `eth_call` data.
///
/// # Errors
///
/// Returns [`BenchError::InvalidCall`] when the parameters do not match the method's
/// signature, or [`BenchError::InvalidAddress`] for a malformed address argument.
///
/// # Examples
/// ```
/// use rpcbench_core::utils::abi::{encode_call, AbiMethod};
///
/// assert_eq!(encode_call(AbiMethod::TotalSupply, &[]).unwrap(), "0x18160ddd");
/// ```
pub fn encode_call(method: AbiMethod, params: &[AbiParam]) -> Result<String, BenchError> {
    let expected = method.params();
    if params.len() != expected.len() ||
        params.iter().zip(expected).any(|(param, kind)| param.kind() != *kind)
    {
        return Err(BenchError::InvalidCall(format!(
            "{} expects {} parameter(s), got {:?}",
            method.signature(),
            expected.len(),
            params
        )));
    }

    let mut data = Vec::with_capacity(4 + WORD * params.len());
    data.extend_from_slice(&method.selector());
    for param in params {
        data.extend_from_slice(&param.to_word()?);
    }
    Ok(format!("0x{}", hex::encode(data)))
}

/// Outcome of decoding an `eth_call` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// `0x` or an empty string: the call returned nothing.
    Empty,
    Value(String),
}

/// Decodes a raw `eth_call` result into a comparable vote.
///
/// Numeric results become decimal strings when they fit in 128 bits and normalized hex
/// otherwise. Opaque results become [`VALID_DATA`]. Anything malformed becomes
/// [`DECODE_ERROR`].
#[must_use]
pub fn decode_result(raw: &str, kind: ReturnKind) -> Decoded {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Decoded::Empty;
    }

    let Ok(bytes) = hex::decode(digits) else {
        return Decoded::Value(DECODE_ERROR.to_string());
    };

    let value = match kind {
        ReturnKind::Numeric => first_word(&bytes).map(word_to_string),
        ReturnKind::Address => {
            first_word(&bytes).map(|word| format!("0x{}", hex::encode(&word[12..])))
        }
        ReturnKind::Opaque => Some(VALID_DATA.to_string()),
    };

    Decoded::Value(value.unwrap_or_else(|| DECODE_ERROR.to_string()))
}

fn first_word(bytes: &[u8]) -> Option<&[u8]> {
    bytes.get(..WORD)
}

fn word_to_string(word: &[u8]) -> String {
    let (high, low) = word.split_at(16);
    if high.iter().all(|b| *b == 0) {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(low);
        u128::from_be_bytes(buf).to_string()
    } else {
        let encoded = hex::encode(word);
        format!("0x{}", encoded.trim_start_matches('0'))
    }
}

/// Decodes a `uint256` result that fits in 128 bits.
#[must_use]
pub fn decode_uint(raw: &str) -> Option<u128> {
    let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw)).ok()?;
    let word = first_word(&bytes)?;
    let (high, low) = word.split_at(16);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(low);
    Some(u128::from_be_bytes(buf))
}

/// Decodes a `string` result, accepting the legacy `bytes32` form some tokens return.
#[must_use]
pub fn decode_string(raw: &str) -> Option<String> {
    let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw)).ok()?;

    if bytes.len() == WORD {
        let trimmed: Vec<u8> = bytes.into_iter().take_while(|b| *b != 0).collect();
        return String::from_utf8(trimmed).ok().filter(|s| !s.is_empty());
    }

    let offset = usize::try_from(decode_uint(&hex::encode(bytes.get(..WORD)?))?).ok()?;
    let len_word = bytes.get(offset..offset.checked_add(WORD)?)?;
    let len = usize::try_from(decode_uint(&hex::encode(len_word))?).ok()?;
    let start = offset.checked_add(WORD)?;
    let data = bytes.get(start..start.checked_add(len)?)?;
    String::from_utf8(data.to_vec()).ok()
}
