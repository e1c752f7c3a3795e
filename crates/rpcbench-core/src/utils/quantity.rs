//! JSON-RPC quantities and block references.
//!
//! Heights show up in three shapes across providers: hex quantities from JSON-RPC (`"0x12a"`),
//! plain JSON numbers from REST aggregators, and decimal strings from some GraphQL gateways.

use serde_json::Value;
use std::fmt;

/// Block a state read is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Latest,
    Number(u64),
}

impl BlockRef {
    /// Wire form: `"latest"` or a hex quantity.
    #[must_use]
    pub fn to_param(self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Number(n) => format!("0x{n:x}"),
        }
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

/// Parses a hex quantity, with or without the `0x` prefix.
///
/// # Examples
/// ```
/// use rpcbench_core::utils::quantity::parse_quantity;
///
/// assert_eq!(parse_quantity("0xff"), Some(255));
/// assert_eq!(parse_quantity("0x"), None);
/// ```
#[must_use]
pub fn parse_quantity(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Wide variant of [`parse_quantity`] for wei amounts.
#[must_use]
pub fn parse_quantity_u128(raw: &str) -> Option<u128> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}

/// A JSON-RPC `result` holding a hex quantity.
#[must_use]
pub fn quantity_from_value(value: &Value) -> Option<u64> {
    value.as_str().and_then(parse_quantity)
}

/// A height in any shape a provider reports it.
///
/// # Examples
/// ```
/// use rpcbench_core::utils::quantity::height_from_value;
/// use serde_json::json;
///
/// assert_eq!(height_from_value(&json!("0x10")), Some(16));
/// assert_eq!(height_from_value(&json!("16")), Some(16));
/// assert_eq!(height_from_value(&json!(16)), Some(16));
/// ```
#[must_use]
pub fn height_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if s.starts_with("0x") => parse_quantity(s),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn wei_to_gwei(wei: u128) -> f64 {
    wei as f64 / 1_000_000_000.0
}
