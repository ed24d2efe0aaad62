//! Line-level encode/decode.
//!
//! A record field is one `key: value` line. The value carries no type
//! tag; its type is inferred from its shape on read: `[` starts an
//! array, `"` starts a string, a token containing `.`, `nan` or `inf`
//! is a float, anything else is an integer.

use std::collections::BTreeMap;

use fc_common::name::is_valid_name;

use crate::error::CodecError;
use crate::format::{format_float17, parse_float};
use crate::value::Value;

/// Validate a result key against the restricted identifier pattern.
pub fn validate_key(key: &str) -> Result<(), CodecError> {
    if !is_valid_name(key) {
        return Err(CodecError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Encode a value in its textual representation.
pub fn encode_value(key: &str, value: &Value) -> Result<String, CodecError> {
    match value {
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(format_float17(*f)),
        Value::Str(s) => {
            if s.contains('\n') || s.contains('\r') {
                return Err(CodecError::MultiLineStringUnsupported {
                    key: key.to_string(),
                });
            }
            // Wrapped in quotes, no escaping: embedded quotes survive a
            // round trip because decode only strips the outer pair.
            Ok(format!("\"{s}\""))
        }
        Value::IntArray(xs) => {
            let parts: Vec<String> = xs.iter().map(|x| x.to_string()).collect();
            Ok(format!("[{}]", parts.join(", ")))
        }
        Value::FloatArray(xs) => {
            let parts: Vec<String> = xs.iter().map(|x| format_float17(*x)).collect();
            Ok(format!("[{}]", parts.join(", ")))
        }
    }
}

/// Encode one field as a `key: value` line.
pub fn encode(key: &str, value: &Value) -> Result<String, CodecError> {
    validate_key(key)?;
    Ok(format!("{key}: {}", encode_value(key, value)?))
}

/// Decode one `key: value` line.
pub fn decode(line: &str) -> Result<(String, Value), CodecError> {
    let (key, token) = line.split_once(':').ok_or_else(|| CodecError::MalformedLine {
        line: line.to_string(),
    })?;
    let key = key.trim();
    validate_key(key)?;
    let value = decode_value(key, token.trim())?;
    Ok((key.to_string(), value))
}

fn decode_value(key: &str, token: &str) -> Result<Value, CodecError> {
    if let Some(inner) = token.strip_prefix('[') {
        return decode_array(key, inner);
    }
    if token.starts_with('"') {
        let inner = token
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .ok_or_else(|| CodecError::Parse {
                key: key.to_string(),
                what: "string",
                token: token.to_string(),
            })?;
        return Ok(Value::Str(inner.to_string()));
    }
    if token.starts_with('{') {
        // A historical codec variant swallowed these silently; here the
        // row is skipped with an explicit error instead.
        return Err(CodecError::UnsupportedType {
            key: key.to_string(),
        });
    }
    if is_float_token(token) {
        return parse_float(token).map(Value::Float).ok_or_else(|| CodecError::Parse {
            key: key.to_string(),
            what: "float",
            token: token.to_string(),
        });
    }
    token
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| CodecError::Parse {
            key: key.to_string(),
            what: "int",
            token: token.to_string(),
        })
}

fn decode_array(key: &str, inner: &str) -> Result<Value, CodecError> {
    if inner.contains('[') {
        return Err(CodecError::UnsupportedDimensionality {
            key: key.to_string(),
        });
    }
    let inner = inner.strip_suffix(']').ok_or_else(|| CodecError::Parse {
        key: key.to_string(),
        what: "array",
        token: inner.to_string(),
    })?;
    if inner.trim().is_empty() {
        return Ok(Value::FloatArray(Vec::new()));
    }
    let elements: Vec<&str> = inner.split(',').map(str::trim).collect();
    if is_float_token(inner) {
        let mut out = Vec::with_capacity(elements.len());
        for element in &elements {
            out.push(parse_float(element).ok_or_else(|| CodecError::Parse {
                key: key.to_string(),
                what: "float array",
                token: (*element).to_string(),
            })?);
        }
        Ok(Value::FloatArray(out))
    } else {
        let mut out = Vec::with_capacity(elements.len());
        for element in &elements {
            out.push(element.parse::<i64>().map_err(|_| CodecError::Parse {
                key: key.to_string(),
                what: "int array",
                token: (*element).to_string(),
            })?);
        }
        Ok(Value::IntArray(out))
    }
}

fn is_float_token(token: &str) -> bool {
    token.contains('.') || token.contains("nan") || token.contains("inf")
}

/// Encode a whole extension map as sorted `key: value` lines.
pub fn encode_map(map: &BTreeMap<String, Value>) -> Result<String, CodecError> {
    let mut lines = Vec::with_capacity(map.len());
    for (key, value) in map {
        lines.push(encode(key, value)?);
    }
    Ok(lines.join("\n"))
}

/// Decode a block of `key: value` lines into a map.
///
/// A single malformed line is a row-level soft failure: it is logged and
/// skipped, and the remaining fields still decode.
pub fn decode_map(text: &str) -> BTreeMap<String, Value> {
    let mut map = BTreeMap::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match decode(line) {
            Ok((key, value)) => {
                map.insert(key, value);
            }
            Err(err) => {
                tracing::error!(line = index + 1, %err, "skipping unparseable field");
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(key: &str, value: Value) {
        let line = encode(key, &value).unwrap();
        let (k, v) = decode(&line).unwrap();
        assert_eq!(k, key);
        assert_eq!(v, value);
    }

    #[test]
    fn test_round_trip_all_types() {
        round_trip("count", Value::Int(-42));
        round_trip("score", Value::Float(1.0 / 3.0));
        round_trip("method", Value::Str("CMAES".into()));
        round_trip("iters", Value::IntArray(vec![20, 40, 80]));
        round_trip("ess", Value::FloatArray(vec![0.9, 0.95, 0.99]));
        round_trip("empty", Value::FloatArray(vec![]));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        for key in ["1bad", "bad key", "", "dash-ed", "dot.ted"] {
            assert!(matches!(
                encode(key, &Value::Int(1)),
                Err(CodecError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_multi_line_string_rejected() {
        let err = encode("msg", &Value::Str("two\nlines".into())).unwrap_err();
        assert!(matches!(err, CodecError::MultiLineStringUnsupported { .. }));
        let err = encode("msg", &Value::Str("cr\rhere".into())).unwrap_err();
        assert!(matches!(err, CodecError::MultiLineStringUnsupported { .. }));
    }

    #[test]
    fn test_decode_nested_array_rejected() {
        let err = decode("matrix: [[1, 2], [3, 4]]").unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedDimensionality { .. }));
    }

    #[test]
    fn test_decode_object_rejected() {
        let err = decode("blob: {\"a\": 1}").unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType { .. }));
    }

    #[test]
    fn test_decode_malformed_line() {
        assert!(matches!(
            decode("no separator here"),
            Err(CodecError::MalformedLine { .. })
        ));
        assert!(matches!(
            decode("n: 12x"),
            Err(CodecError::Parse { what: "int", .. })
        ));
        assert!(matches!(
            decode("x: 1.2.3"),
            Err(CodecError::Parse { what: "float", .. })
        ));
    }

    #[test]
    fn test_float_type_sniffing() {
        assert_eq!(decode("a: 3").unwrap().1, Value::Int(3));
        assert_eq!(decode("a: 3.0").unwrap().1, Value::Float(3.0));
        assert_eq!(decode("a: inf").unwrap().1, Value::Float(f64::INFINITY));
        let (_, v) = decode("a: nan").unwrap();
        assert!(matches!(v, Value::Float(x) if x.is_nan()));
    }

    #[test]
    fn test_map_round_trip_is_sorted() {
        let mut map = BTreeMap::new();
        map.insert("zeta".to_string(), Value::Int(1));
        map.insert("alpha".to_string(), Value::Float(2.0));
        let text = encode_map(&map).unwrap();
        let first_line = text.lines().next().unwrap();
        assert!(first_line.starts_with("alpha:"));
        assert_eq!(decode_map(&text), map);
    }

    #[test]
    fn test_map_decode_skips_bad_rows() {
        let text = "good: 1\nbroken line without colon\nalso_good: 2.0\nbad: 1x2";
        let map = decode_map(text);
        assert_eq!(map.len(), 2);
        assert_eq!(map["good"], Value::Int(1));
        assert_eq!(map["also_good"], Value::Float(2.0));
    }
}
