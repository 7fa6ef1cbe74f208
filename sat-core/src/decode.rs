//! Segment splitting and payload decoding.
//!
//! Only the payload segment is read. The header and signature segments are
//! counted but never decoded or verified.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::error::TokenError;
use crate::types::{GrantEntry, Payload};

#[derive(Deserialize)]
struct Claims {
    sub: Option<Value>,
    iss: Option<Value>,
    exp: Option<Value>,
    grants: Option<Value>,
}

/// Decode the payload segment of a raw token.
///
/// Fails with `TokenError::Malformed` when the token does not have exactly
/// three segments, when the payload is not base64url-encoded JSON, or when
/// `exp` is missing or cannot be read as an instant. Other claims degrade:
/// an unusable `sub`/`iss` becomes `None` and unusable grants are dropped.
pub fn decode_payload(raw: &str) -> Result<Payload, TokenError> {
    let segments: Vec<&str> = raw.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let bytes = decode_segment(segments[1])?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::malformed(format!("payload is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(TokenError::malformed("payload is not a JSON object"));
    }

    let claims = Claims::deserialize(value)
        .map_err(|e| TokenError::malformed(format!("invalid payload claims: {e}")))?;

    let exp = match claims.exp {
        None | Some(Value::Null) => return Err(TokenError::malformed("missing exp claim")),
        Some(exp) => expiration_instant(&exp)
            .ok_or_else(|| TokenError::malformed(format!("exp {exp} is not a valid instant")))?,
    };

    Ok(Payload {
        sub: claims.sub.and_then(sid_claim),
        iss: claims.iss.and_then(sid_claim),
        exp,
        grants: claims.grants.map(grant_entries).unwrap_or_default(),
    })
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    // Unpadded is canonical for JWTs, but some issuers keep the padding.
    URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| URL_SAFE.decode(segment))
        .map_err(|e| TokenError::malformed(format!("payload is not valid base64url: {e}")))
}

/// Read a SID claim. Strings are taken as-is and numbers in their JSON form;
/// anything else is treated as absent.
fn sid_claim(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert `exp` seconds into an instant, keeping millisecond precision for
/// fractional values. Numeric strings such as `"1700000000"` are accepted.
fn expiration_instant(exp: &Value) -> Option<DateTime<Utc>> {
    match exp {
        Value::Number(n) => instant_from_number(n),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                return DateTime::from_timestamp(secs, 0);
            }
            let secs = s.parse::<f64>().ok().filter(|v| v.is_finite())?;
            DateTime::from_timestamp_millis((secs * 1000.0).trunc() as i64)
        }
        _ => None,
    }
}

fn instant_from_number(exp: &Number) -> Option<DateTime<Utc>> {
    if let Some(secs) = exp.as_i64() {
        return DateTime::from_timestamp(secs, 0);
    }
    let secs = exp.as_f64()?;
    DateTime::from_timestamp_millis((secs * 1000.0).trunc() as i64)
}

/// Extract grant entries, skipping anything that is not `{ res: string, .. }`.
fn grant_entries(grants: Value) -> Vec<GrantEntry> {
    let Value::Array(items) = grants else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| {
            let Value::Object(mut fields) = item else {
                return None;
            };
            let Some(Value::String(res)) = fields.remove("res") else {
                return None;
            };
            let act = match fields.remove("act") {
                Some(Value::Array(actions)) => actions
                    .into_iter()
                    .filter_map(|a| match a {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            Some(GrantEntry { res, act })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(payload: &Value) -> String {
        let seg = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("header.{seg}.signature")
    }

    #[test]
    fn test_decode_minimal_payload() {
        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": 1_700_000_000 }));
        let payload = decode_payload(&raw).expect("Should decode");
        assert_eq!(payload.sub.as_deref(), Some("AC1"));
        assert_eq!(payload.iss.as_deref(), Some("SK1"));
        assert_eq!(payload.exp.timestamp(), 1_700_000_000);
        assert!(payload.grants.is_empty());
    }

    #[test]
    fn test_segment_count() {
        for raw in ["", "one", "a.b", "a.b.c.d", "not.a.valid.jwt.token"] {
            let err = decode_payload(raw).unwrap_err();
            assert!(err.is_malformed(), "{raw:?} should be malformed");
        }
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_payload("header.***.signature").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_invalid_json() {
        let seg = URL_SAFE_NO_PAD.encode("{not json");
        let err = decode_payload(&format!("h.{seg}.s")).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_invalid_utf8_payload() {
        let seg = URL_SAFE_NO_PAD.encode([0xff, 0xfe]);
        let err = decode_payload(&format!("h.{seg}.s")).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_non_object_payload() {
        let raw = encode(&json!(["AC1", "SK1", 1_700_000_000]));
        assert!(decode_payload(&raw).unwrap_err().is_malformed());
    }

    #[test]
    fn test_padded_segment_accepted() {
        let payload = r#"{"sub":"AC12","iss":"SK1","exp":1}"#;
        let seg = URL_SAFE.encode(payload);
        assert!(seg.ends_with('='), "fixture should carry padding");
        let decoded = decode_payload(&format!("h.{seg}.s")).expect("Should decode padded");
        assert_eq!(decoded.exp.timestamp(), 1);
    }

    #[test]
    fn test_missing_exp_is_error() {
        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1" }));
        assert!(decode_payload(&raw).unwrap_err().is_malformed());

        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": null }));
        assert!(decode_payload(&raw).unwrap_err().is_malformed());
    }

    #[test]
    fn test_non_numeric_exp_is_error() {
        for exp in [json!("tomorrow"), json!(""), json!(true), json!([1]), json!({ "s": 1 })] {
            let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": exp.clone() }));
            assert!(decode_payload(&raw).unwrap_err().is_malformed(), "exp {exp} should fail");
        }
    }

    #[test]
    fn test_numeric_string_exp_accepted() {
        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": "4000000000" }));
        let payload = decode_payload(&raw).expect("Should decode");
        assert_eq!(payload.exp.timestamp(), 4_000_000_000);

        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": " 10.5 " }));
        let payload = decode_payload(&raw).expect("Should decode");
        assert_eq!(payload.exp.timestamp_millis(), 10_500);
    }

    #[test]
    fn test_out_of_range_exp_is_error() {
        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": 1e300 }));
        assert!(decode_payload(&raw).unwrap_err().is_malformed());
    }

    #[test]
    fn test_fractional_exp_keeps_millis() {
        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": 10.5 }));
        let payload = decode_payload(&raw).expect("Should decode");
        assert_eq!(payload.exp.timestamp_millis(), 10_500);
    }

    #[test]
    fn test_missing_sids_still_decode() {
        let raw = encode(&json!({
            "exp": 4_000_000_000_i64,
            "grants": [{ "res": "sip:a@x", "act": ["invite"] }]
        }));
        let payload = decode_payload(&raw).expect("Should decode without sub/iss");
        assert_eq!(payload.sub, None);
        assert_eq!(payload.iss, None);
        assert_eq!(payload.grants, vec![GrantEntry::new("sip:a@x", ["invite"])]);
    }

    #[test]
    fn test_non_string_sids_are_lenient() {
        let raw = encode(&json!({ "sub": 123, "iss": null, "exp": 1 }));
        let payload = decode_payload(&raw).expect("Should decode numeric sub");
        assert_eq!(payload.sub.as_deref(), Some("123"));
        assert_eq!(payload.iss, None);

        let raw = encode(&json!({ "sub": ["AC1"], "iss": { "id": "SK1" }, "exp": 1 }));
        let payload = decode_payload(&raw).expect("Should decode structured sids");
        assert_eq!(payload.sub, None);
        assert_eq!(payload.iss, None);
    }

    #[test]
    fn test_unrecognized_grants_are_skipped() {
        let raw = encode(&json!({
            "sub": "AC1",
            "iss": "SK1",
            "exp": 1,
            "grants": [
                "just a string",
                { "act": ["invite"] },
                { "res": 42, "act": ["invite"] },
                { "res": "sip:bob@example.com" },
                { "res": "sip:carol@example.com", "act": ["listen", 7, null] }
            ]
        }));
        let payload = decode_payload(&raw).expect("Should decode");
        assert_eq!(
            payload.grants,
            vec![
                GrantEntry::new("sip:bob@example.com", Vec::<String>::new()),
                GrantEntry::new("sip:carol@example.com", ["listen"]),
            ]
        );
    }

    #[test]
    fn test_non_array_grants_are_empty() {
        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": 1, "grants": {} }));
        assert!(decode_payload(&raw).expect("Should decode").grants.is_empty());

        let raw = encode(&json!({ "sub": "AC1", "iss": "SK1", "exp": 1, "grants": null }));
        assert!(decode_payload(&raw).expect("Should decode").grants.is_empty());
    }
}
