//! Normalization of decoded EVM return values.
//!
//! Every value coming back from a call is flattened into [`DecodedValue`], a
//! closed tagged variant over the EVM type grammar, so the report serializes
//! without type-specific branching at the boundary. Integers are rendered as
//! decimal strings to stay lossless over the full 256-bit range; byte
//! sequences are `0x`-prefixed hex; addresses are EIP-55 checksummed.

use alloy_dyn_abi::{DynSolValue, FunctionExt};
use alloy_json_abi::Function;
use serde::Serialize;

/// A decoded scalar or structure from a contract call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DecodedValue {
    Bool(bool),
    Uint(String),
    Int(String),
    Address(String),
    FixedBytes(String),
    Bytes(String),
    String(String),
    Tuple(Vec<DecodedValue>),
    Array(Vec<DecodedValue>),
}

/// Decode a call's raw return bytes against the function's declared output
/// types and normalize each value.
///
/// Any mismatch between the bytes and the declared types, and any type
/// outside the supported grammar, comes back as `Err` with a message the
/// engine tags as a decode failure.
pub fn decode_output(func: &Function, raw: &[u8]) -> Result<Vec<DecodedValue>, String> {
    let values = func
        .abi_decode_output(raw)
        .map_err(|e| format!("output did not decode against declared types: {e}"))?;
    values.iter().map(normalize).collect()
}

/// Normalize one dynamic value into the report representation.
pub fn normalize(value: &DynSolValue) -> Result<DecodedValue, String> {
    match value {
        DynSolValue::Bool(b) => Ok(DecodedValue::Bool(*b)),
        DynSolValue::Uint(v, _) => Ok(DecodedValue::Uint(v.to_string())),
        DynSolValue::Int(v, _) => Ok(DecodedValue::Int(v.to_string())),
        DynSolValue::Address(a) => Ok(DecodedValue::Address(a.to_checksum(None))),
        DynSolValue::FixedBytes(word, size) => Ok(DecodedValue::FixedBytes(format!(
            "0x{}",
            hex::encode(&word.as_slice()[..*size])
        ))),
        DynSolValue::Bytes(bytes) => Ok(DecodedValue::Bytes(format!("0x{}", hex::encode(bytes)))),
        DynSolValue::String(s) => Ok(DecodedValue::String(s.clone())),
        DynSolValue::Tuple(values) => Ok(DecodedValue::Tuple(
            values.iter().map(normalize).collect::<Result<_, _>>()?,
        )),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) => Ok(DecodedValue::Array(
            values.iter().map(normalize).collect::<Result<_, _>>()?,
        )),
        other => Err(format!(
            "unsupported return type: {}",
            other
                .sol_type_name()
                .map(|n| n.into_owned())
                .unwrap_or_else(|| "unknown".to_string())
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, I256, U256};

    #[test]
    fn test_normalize_uint_full_range() {
        let value = DynSolValue::Uint(U256::MAX, 256);
        assert_eq!(
            normalize(&value).unwrap(),
            DecodedValue::Uint(U256::MAX.to_string())
        );
    }

    #[test]
    fn test_normalize_negative_int() {
        let value = DynSolValue::Int(I256::try_from(-42i64).unwrap(), 256);
        assert_eq!(normalize(&value).unwrap(), DecodedValue::Int("-42".into()));
    }

    #[test]
    fn test_normalize_address_checksummed() {
        let addr: Address = "0xdac17f958d2ee523a2206206994597c13d831ec7".parse().unwrap();
        assert_eq!(
            normalize(&DynSolValue::Address(addr)).unwrap(),
            DecodedValue::Address("0xdAC17F958D2ee523a2206206994597C13D831ec7".into())
        );
    }

    #[test]
    fn test_normalize_fixed_bytes_truncates_to_width() {
        let mut word = [0u8; 32];
        word[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let value = DynSolValue::FixedBytes(B256::from(word), 4);
        assert_eq!(
            normalize(&value).unwrap(),
            DecodedValue::FixedBytes("0xdeadbeef".into())
        );
    }

    #[test]
    fn test_normalize_nested_tuple_and_array() {
        let value = DynSolValue::Tuple(vec![
            DynSolValue::Bool(true),
            DynSolValue::Array(vec![
                DynSolValue::Uint(U256::from(1u64), 256),
                DynSolValue::Uint(U256::from(2u64), 256),
            ]),
        ]);
        assert_eq!(
            normalize(&value).unwrap(),
            DecodedValue::Tuple(vec![
                DecodedValue::Bool(true),
                DecodedValue::Array(vec![
                    DecodedValue::Uint("1".into()),
                    DecodedValue::Uint("2".into()),
                ]),
            ])
        );
    }

    #[test]
    fn test_unsupported_type_is_an_error_not_a_panic() {
        let value = DynSolValue::Function(alloy_primitives::Function::ZERO);
        let err = normalize(&value).unwrap_err();
        assert!(err.contains("unsupported return type"));
    }

    #[test]
    fn test_decode_output_string() {
        let func: Function = serde_json::from_str(
            r#"{
                "name": "name", "type": "function", "inputs": [],
                "outputs": [{"name": "", "type": "string"}],
                "stateMutability": "view"
            }"#,
        )
        .unwrap();
        let raw = DynSolValue::Tuple(vec![DynSolValue::String("Tether USD".into())])
            .abi_encode_params();
        assert_eq!(
            decode_output(&func, &raw).unwrap(),
            vec![DecodedValue::String("Tether USD".into())]
        );
    }

    #[test]
    fn test_decode_output_rejects_garbage() {
        let func: Function = serde_json::from_str(
            r#"{
                "name": "decimals", "type": "function", "inputs": [],
                "outputs": [{"name": "", "type": "uint8"}],
                "stateMutability": "view"
            }"#,
        )
        .unwrap();
        assert!(decode_output(&func, &[0xff, 0x01]).is_err());
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(DecodedValue::Uint("6".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "uint", "value": "6"}));
    }
}
