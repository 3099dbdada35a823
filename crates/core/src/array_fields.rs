//! JSON-encoded array fields.
//!
//! The backend persists list-valued form fields (community cards, goal and
//! objective lists) as JSON text columns. Browser-facing payloads always
//! carry native arrays, backend-facing payloads always carry strings.

use serde_json::{Map, Value};

/// Encode a list as the JSON text the backend stores.
pub fn encode_list(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}

/// Decode stored JSON text into a list. Anything that is not a JSON array
/// of strings yields an empty list.
pub fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Stringify every named field of a write body whose value is an array.
///
/// Non-object bodies and non-array field values are left alone.
pub fn encode_array_fields(body: &mut Value, fields: &[&str]) {
    let Some(map) = body.as_object_mut() else {
        return;
    };
    for field in fields {
        if let Some(value) = map.get_mut(*field) {
            if value.is_array() {
                *value = Value::String(value.to_string());
            }
        }
    }
}

/// Turn every named field back into an array on a read payload.
///
/// `payload` may be a single record or an array of records. Strings are
/// JSON-parsed; a parse failure, a non-array result, `null`, or a missing
/// field becomes `[]`. Values that already are arrays stay untouched.
pub fn decode_array_fields(payload: &mut Value, fields: &[&str]) {
    if fields.is_empty() {
        return;
    }
    match payload {
        Value::Object(map) => decode_record(map, fields),
        Value::Array(records) => {
            for record in records.iter_mut() {
                if let Value::Object(map) = record {
                    decode_record(map, fields);
                }
            }
        }
        _ => {}
    }
}

fn decode_record(map: &mut Map<String, Value>, fields: &[&str]) {
    for field in fields {
        let decoded = match map.get(*field) {
            Some(Value::Array(_)) => continue,
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(parsed @ Value::Array(_)) => parsed,
                _ => Value::Array(Vec::new()),
            },
            _ => Value::Array(Vec::new()),
        };
        map.insert((*field).to_string(), decoded);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[&str] = &["community_list", "community_card_icon"];

    #[test]
    fn list_round_trips() {
        for items in [
            vec![],
            vec!["a".to_string()],
            vec!["with \"quotes\"".to_string(), "ünïcode".to_string(), String::new()],
        ] {
            assert_eq!(decode_list(&encode_list(&items)), items);
        }
    }

    #[test]
    fn decode_list_garbage_is_empty() {
        assert!(decode_list("not json").is_empty());
        assert!(decode_list("{\"a\":1}").is_empty());
        assert!(decode_list("").is_empty());
    }

    #[test]
    fn encode_stringifies_only_arrays() {
        let mut body = json!({
            "community_list": ["a", "b"],
            "community_card_icon": "already-a-string",
            "title": ["untouched"],
        });
        encode_array_fields(&mut body, FIELDS);
        assert_eq!(body["community_list"], "[\"a\",\"b\"]");
        assert_eq!(body["community_card_icon"], "already-a-string");
        assert_eq!(body["title"], json!(["untouched"]));
    }

    #[test]
    fn decode_parses_strings_and_defaults_missing() {
        let mut record = json!({
            "community_list": "[\"a\",\"b\"]",
        });
        decode_array_fields(&mut record, FIELDS);
        assert_eq!(record["community_list"], json!(["a", "b"]));
        assert_eq!(record["community_card_icon"], json!([]));
    }

    #[test]
    fn decode_bad_json_and_null_become_empty() {
        let mut record = json!({
            "community_list": "[oops",
            "community_card_icon": null,
        });
        decode_array_fields(&mut record, FIELDS);
        assert_eq!(record["community_list"], json!([]));
        assert_eq!(record["community_card_icon"], json!([]));
    }

    #[test]
    fn decode_non_array_json_becomes_empty() {
        let mut record = json!({ "community_list": "\"just a string\"" });
        decode_array_fields(&mut record, &["community_list"]);
        assert_eq!(record["community_list"], json!([]));
    }

    #[test]
    fn decode_handles_record_lists() {
        let mut records = json!([
            { "community_list": "[\"x\"]" },
            { "community_list": ["y"] },
            "not a record",
        ]);
        decode_array_fields(&mut records, &["community_list"]);
        assert_eq!(records[0]["community_list"], json!(["x"]));
        assert_eq!(records[1]["community_list"], json!(["y"]));
        assert_eq!(records[2], "not a record");
    }

    #[test]
    fn encode_then_decode_restores_body() {
        let original = json!({
            "community_list": ["a", "b"],
            "community_card_icon": [],
        });
        let mut body = original.clone();
        encode_array_fields(&mut body, FIELDS);
        decode_array_fields(&mut body, FIELDS);
        assert_eq!(body, original);
    }
}
