//! Decoding of response bodies
//!
//! Write endpoints answer `200 OK` with a wrapper:
//!
//! ```json
//! {"json": {"errors": [["CODE", "message", "field"]], "data": {...}}}
//! ```
//!
//! A non-empty `errors` list means the call failed even though the HTTP
//! status was a success. Read endpoints answer with a bare JSON document.
//! Both shapes decode into [`Payload`], so callers read `data` the same way
//! whichever verb produced it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiErrorEntry, ErrorList, Result, SnooError};

/// The contents of a successful `json` envelope
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeBody {
    /// Always empty for a decoded payload; kept for inspection
    pub errors: ErrorList,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A bare JSON document, as returned by read endpoints
    Plain(Value),
    /// An unwrapped `json` envelope with no errors
    Envelope(EnvelopeBody),
}

impl Payload {
    /// The useful part of the response: `data` for envelopes, the whole
    /// document otherwise
    pub fn data(&self) -> Option<&Value> {
        match self {
            Payload::Plain(value) => Some(value),
            Payload::Envelope(body) => body.data.as_ref(),
        }
    }

    pub fn into_data(self) -> Value {
        match self {
            Payload::Plain(value) => value,
            Payload::Envelope(body) => body.data.unwrap_or(Value::Null),
        }
    }

    pub fn is_envelope(&self) -> bool {
        matches!(self, Payload::Envelope(_))
    }

    /// Deserialize the data part into a typed record
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.into_data())
            .map_err(|e| SnooError::MalformedResponse(format!("unexpected payload: {}", e)))
    }
}

/// Parse a raw response body, surfacing embedded API errors
pub fn decode(raw: &str) -> Result<Payload> {
    let mut value: Value = serde_json::from_str(raw)
        .map_err(|e| SnooError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let wrapped = value.as_object_mut().and_then(|obj| obj.remove("json"));
    let Some(wrapped) = wrapped else {
        return Ok(Payload::Plain(value));
    };

    let Value::Object(mut body) = wrapped else {
        return Err(SnooError::MalformedResponse(
            "`json` envelope is not an object".to_string(),
        ));
    };

    let errors = match body.remove("errors") {
        Some(errors) => parse_errors(errors)?,
        None => ErrorList::default(),
    };

    if !errors.is_empty() {
        tracing::warn!("API reported errors: {}", errors);
        return Err(SnooError::Api(errors));
    }

    Ok(Payload::Envelope(EnvelopeBody {
        errors,
        data: body.remove("data"),
    }))
}

fn parse_errors(value: Value) -> Result<ErrorList> {
    let Value::Array(items) = value else {
        return Err(SnooError::MalformedResponse(
            "`json.errors` is not a list".to_string(),
        ));
    };

    items
        .into_iter()
        .map(parse_error_entry)
        .collect::<Result<Vec<_>>>()
        .map(ErrorList)
}

fn parse_error_entry(item: Value) -> Result<ApiErrorEntry> {
    let parts = match item {
        Value::Array(parts) => parts,
        other => {
            return Err(SnooError::MalformedResponse(format!(
                "error entry is not a list: {}",
                other
            )))
        }
    };

    let text = |index: usize| -> Option<String> {
        parts.get(index).and_then(Value::as_str).map(str::to_string)
    };

    let code = text(0).ok_or_else(|| {
        SnooError::MalformedResponse("error entry has no code".to_string())
    })?;

    Ok(ApiErrorEntry {
        message: text(1).unwrap_or_else(|| code.clone()),
        field: text(2).filter(|field| !field.is_empty()),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_yields_api_error() {
        let raw = r#"{"json":{"errors":[["WRONG_PASSWORD","invalid password"]],"data":{}}}"#;
        match decode(raw) {
            Err(SnooError::Api(errors)) => {
                assert_eq!(errors.messages(), vec!["invalid password"]);
                assert_eq!(errors.codes(), vec!["WRONG_PASSWORD"]);
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_errors_keep_order_and_field() {
        let raw = r#"{"json":{"errors":[
            ["NO_TEXT","we need something here","title"],
            ["BAD_URL","you should check that url","url"]
        ]}}"#;
        let err = decode(raw).unwrap_err();
        let errors = err.api_errors().unwrap();
        assert_eq!(
            errors.messages(),
            vec!["we need something here", "you should check that url"]
        );
        assert_eq!(errors.entries()[0].field.as_deref(), Some("title"));
        assert_eq!(err.to_string(), "API error: we need something here; you should check that url");
    }

    #[test]
    fn test_success_envelope_exposes_data() {
        let raw = r#"{"json":{"errors":[],"data":{"modhash":"abc","cookie":"xyz"}}}"#;
        let payload = decode(raw).unwrap();

        assert!(payload.is_envelope());
        match &payload {
            Payload::Envelope(body) => {
                assert!(body.errors.is_empty());
                assert_eq!(body.data.as_ref().unwrap()["modhash"], "abc");
            }
            Payload::Plain(_) => panic!("Expected envelope"),
        }
        assert_eq!(payload.data().unwrap()["cookie"], "xyz");
    }

    #[test]
    fn test_success_envelope_without_data() {
        let payload = decode(r#"{"json":{"errors":[]}}"#).unwrap();
        assert!(payload.data().is_none());
        assert_eq!(payload.into_data(), Value::Null);
    }

    #[test]
    fn test_plain_document_is_returned_unchanged() {
        let raw = r#"{"kind":"Listing","data":{"children":[]}}"#;
        let payload = decode(raw).unwrap();
        assert_eq!(
            payload,
            Payload::Plain(json!({"kind": "Listing", "data": {"children": []}}))
        );
    }

    #[test]
    fn test_plain_array_document() {
        let payload = decode("[1, 2, 3]").unwrap();
        assert_eq!(payload.into_data(), json!([1, 2, 3]));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            decode("<html>Service Unavailable</html>"),
            Err(SnooError::MalformedResponse(_))
        ));
        assert!(matches!(decode(""), Err(SnooError::MalformedResponse(_))));
    }

    #[test]
    fn test_malformed_envelope_shapes() {
        assert!(matches!(
            decode(r#"{"json": "oops"}"#),
            Err(SnooError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode(r#"{"json": {"errors": "oops"}}"#),
            Err(SnooError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode(r#"{"json": {"errors": [42]}}"#),
            Err(SnooError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_decode_into_typed_record() {
        #[derive(serde::Deserialize)]
        struct Pair {
            modhash: String,
        }

        let payload = decode(r#"{"json":{"errors":[],"data":{"modhash":"abc"}}}"#).unwrap();
        let pair: Pair = payload.decode().unwrap();
        assert_eq!(pair.modhash, "abc");

        let payload = decode(r#"{"json":{"errors":[],"data":{}}}"#).unwrap();
        assert!(matches!(
            payload.decode::<Pair>(),
            Err(SnooError::MalformedResponse(_))
        ));
    }
}
