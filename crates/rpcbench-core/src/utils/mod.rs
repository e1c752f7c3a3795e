//! Encoding helpers shared by the adapters and pipelines.
//!
//! ## Quantities (`quantity`)
//! - Hex quantities and block references for JSON-RPC params
//! - Height extraction from hex, decimal and numeric JSON values
//!
//! ## Contract ABI (`abi`)
//! - Fixed selector table for supply, balance and metadata reads
//! - Result decoding into comparable vote strings

pub mod abi;
pub mod quantity;

pub use abi::{decode_result, encode_call, AbiMethod, AbiParam, Decoded, ReturnKind};
pub use quantity::{height_from_value, parse_quantity, quantity_from_value, BlockRef};
