//! Field readers over structured transaction records.
//!
//! Records arrive as JSON from node APIs. Integer fields show up either as
//! JSON numbers or as decimal strings depending on the endpoint, so both are
//! accepted. A `null` field counts as absent.

use serde_json::Value;

use super::TransactionError;

fn malformed(field: &'static str, reason: impl Into<String>) -> TransactionError {
    TransactionError::malformed(field, reason)
}

/// Present and not `null`.
pub fn has(record: &Value, field: &str) -> bool {
    record.get(field).map_or(false, |v| !v.is_null())
}

fn require<'a>(record: &'a Value, field: &'static str) -> Result<&'a Value, TransactionError> {
    match record.get(field) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(malformed(field, "is missing")),
    }
}

fn as_u64(value: &Value, field: &'static str) -> Result<u64, TransactionError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| malformed(field, format!("is not an unsigned integer: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| malformed(field, format!("is not an unsigned integer: {}", e))),
        other => Err(malformed(field, format!("has unexpected type: {}", other))),
    }
}

pub fn read_u64(record: &Value, field: &'static str) -> Result<u64, TransactionError> {
    as_u64(require(record, field)?, field)
}

pub fn read_opt_u64(record: &Value, field: &'static str) -> Result<Option<u64>, TransactionError> {
    if !has(record, field) {
        return Ok(None);
    }
    read_u64(record, field).map(Some)
}

pub fn read_u8(record: &Value, field: &'static str) -> Result<u8, TransactionError> {
    let value = read_u64(record, field)?;
    u8::try_from(value).map_err(|_| malformed(field, format!("{} does not fit in a byte", value)))
}

pub fn read_opt_u8(record: &Value, field: &'static str) -> Result<Option<u8>, TransactionError> {
    if !has(record, field) {
        return Ok(None);
    }
    read_u8(record, field).map(Some)
}

pub fn read_str<'a>(record: &'a Value, field: &'static str) -> Result<&'a str, TransactionError> {
    require(record, field)?
        .as_str()
        .ok_or_else(|| malformed(field, "is not a string"))
}

pub fn read_opt_str<'a>(
    record: &'a Value,
    field: &'static str,
) -> Result<Option<&'a str>, TransactionError> {
    if !has(record, field) {
        return Ok(None);
    }
    read_str(record, field).map(Some)
}

pub fn read_str_list<'a>(
    record: &'a Value,
    field: &'static str,
) -> Result<Vec<&'a str>, TransactionError> {
    let items = require(record, field)?
        .as_array()
        .ok_or_else(|| malformed(field, "is not a list"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .ok_or_else(|| malformed(field, format!("entry {} is not a string", i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_as_numbers_or_strings() {
        let rec = json!({ "a": 5, "b": "6", "c": " 7 " });
        assert_eq!(read_u64(&rec, "a").unwrap(), 5);
        assert_eq!(read_u64(&rec, "b").unwrap(), 6);
        assert_eq!(read_u64(&rec, "c").unwrap(), 7);
    }

    #[test]
    fn missing_and_null_are_absent() {
        let rec = json!({ "x": null });
        assert!(!has(&rec, "x"));
        assert!(!has(&rec, "y"));
        assert_eq!(read_opt_u64(&rec, "x").unwrap(), None);
        assert!(matches!(
            read_u64(&rec, "y"),
            Err(TransactionError::Malformed { field: "y", .. })
        ));
    }

    #[test]
    fn negative_and_fractional_are_malformed() {
        let rec = json!({ "neg": -1, "frac": 1.5, "word": "ten" });
        assert!(read_u64(&rec, "neg").is_err());
        assert!(read_u64(&rec, "frac").is_err());
        assert!(read_u64(&rec, "word").is_err());
    }

    #[test]
    fn byte_overflow_is_malformed() {
        let rec = json!({ "type": 256 });
        let err = read_u8(&rec, "type").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed transaction: field `type` 256 does not fit in a byte"
        );
    }

    #[test]
    fn string_lists() {
        let rec = json!({ "ok": ["a", "b"], "bad": ["a", 1], "not": "a" });
        assert_eq!(read_str_list(&rec, "ok").unwrap(), vec!["a", "b"]);
        assert!(read_str_list(&rec, "bad").is_err());
        assert!(read_str_list(&rec, "not").is_err());
    }
}
