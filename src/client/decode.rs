// src/client/decode.rs
//! Tolerant decoding of endpoint responses. Gateways in front of the function
//! have been seen to return the payload directly, as a JSON-encoded string, or
//! wrapped in `{"statusCode": .., "body": ..}`. Decoders are tried in order.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AlertError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{"location": ..}`
    RawObject,
    /// `"{\"location\": ..}"`
    EncodedString,
    /// `{"statusCode": 200, "body": ..}` where body is an object or an encoded string
    Enveloped,
}

pub const DECODE_ORDER: [Envelope; 3] = [
    Envelope::RawObject,
    Envelope::EncodedString,
    Envelope::Enveloped,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub via: Envelope,
    pub value: T,
}

impl Envelope {
    pub fn try_decode<T: DeserializeOwned>(self, v: &Value) -> Option<T> {
        match self {
            Envelope::RawObject => from_object(v),
            Envelope::EncodedString => v.as_str().and_then(from_text),
            Envelope::Enveloped => {
                let inner = v.as_object()?.get("body")?;
                match inner {
                    Value::String(s) => from_text(s),
                    other => from_object(other),
                }
            }
        }
    }
}

fn from_object<T: DeserializeOwned>(v: &Value) -> Option<T> {
    if !v.is_object() {
        return None;
    }
    serde_json::from_value(v.clone()).ok()
}

fn from_text<T: DeserializeOwned>(s: &str) -> Option<T> {
    let v: Value = serde_json::from_str(s.trim()).ok()?;
    from_object(&v)
}

/// Status carried inside a `{"statusCode": .., "body": ..}` envelope, if the
/// body is one. A gateway may answer HTTP 200 around an inner error status.
pub fn inner_status(body: &str) -> Option<u16> {
    let v: Value = serde_json::from_str(body.trim()).ok()?;
    let obj = v.as_object()?;
    obj.get("body")?;
    let code = obj.get("statusCode")?;
    code.as_u64()
        .or_else(|| code.as_str().and_then(|s| s.trim().parse().ok()))
        .and_then(|c| u16::try_from(c).ok())
}

/// Run the decoder chain over a response body; first success wins.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<Decoded<T>> {
    let trimmed = body.trim();
    let v: Value = serde_json::from_str(trimmed)
        .map_err(|e| AlertError::Parse(format!("response is not JSON ({e}): {trimmed}")))?;

    DECODE_ORDER
        .iter()
        .find_map(|env| env.try_decode(&v).map(|value| Decoded { via: *env, value }))
        .ok_or_else(|| AlertError::Parse(format!("no decoder matched response: {trimmed}")))
}
