//! Encryption of a caller-chosen subset of a record's fields.
//!
//! Records are flat JSON objects, the shape rows take between the
//! application and the database layer. Only the named members are touched;
//! everything else is copied through with the same value and type. There is
//! no scanning for "sensitive-looking" members.
//!
//! Every selected member is checked before any of them is transformed, so an
//! error never leaves a half-encrypted record behind.

pub mod typed;

pub use typed::{decrypt_record, encrypt_record, EncryptedFields, FieldSlot};

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::crypto::{CryptoError, FieldCipher};

/// A flat record keyed by column name.
pub type Record = Map<String, Value>;

/// Return a copy of `record` with every member named in `fields` encrypted.
///
/// Names absent from `record` are ignored; repeated names are encrypted once.
///
/// # Errors
///
/// Returns [`CryptoError::Validation`] if a selected member holds anything
/// other than a string or null, and propagates cipher errors.
pub fn encrypt_object<S: AsRef<str>>(
    cipher: &FieldCipher,
    record: &Record,
    fields: &[S],
) -> Result<Record, CryptoError> {
    transform(record, fields, |value| cipher.encrypt_for_database(value))
}

/// Return a copy of `record` with every member named in `fields` decrypted.
///
/// # Errors
///
/// Returns [`CryptoError::Validation`] if a selected member holds anything
/// other than a string or null, and propagates envelope and cipher errors.
pub fn decrypt_object<S: AsRef<str>>(
    cipher: &FieldCipher,
    record: &Record,
    fields: &[S],
) -> Result<Record, CryptoError> {
    transform(record, fields, |value| cipher.decrypt_from_database(value))
}

fn transform<S, F>(record: &Record, fields: &[S], op: F) -> Result<Record, CryptoError>
where
    S: AsRef<str>,
    F: Fn(Option<&str>) -> Result<Option<String>, CryptoError>,
{
    let selected: BTreeSet<&str> = fields
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| record.contains_key(*name))
        .collect();

    let mut inputs = Vec::with_capacity(selected.len());
    for name in selected {
        if let Some(value) = record.get(name) {
            inputs.push((name, as_text(name, value)?));
        }
    }

    let mut out = record.clone();
    for (name, value) in &inputs {
        let next = op(*value)?;
        out.insert((*name).to_owned(), next.map_or(Value::Null, Value::String));
    }

    debug!(fields = inputs.len(), "record fields transformed");
    Ok(out)
}

fn as_text<'a>(name: &str, value: &'a Value) -> Result<Option<&'a str>, CryptoError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.as_str())),
        other => Err(CryptoError::Validation(format!(
            "field `{name}` must be a string or null, found {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::tests::test_cipher;
    use crate::crypto::envelope::deserialize;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn sample() -> Record {
        record(json!({
            "id": 1,
            "name": "John Doe",
            "email": "john@example.com",
            "public_field": "public data"
        }))
    }

    #[test]
    fn selective_fields_round_trip() {
        let cipher = test_cipher();
        let original = sample();

        let sealed = encrypt_object(&cipher, &original, &["name", "email"]).unwrap();
        assert_eq!(sealed["id"], json!(1));
        assert_eq!(sealed["public_field"], json!("public data"));

        let name = sealed["name"].as_str().unwrap();
        let email = sealed["email"].as_str().unwrap();
        assert_ne!(name, "John Doe");
        assert_ne!(email, "john@example.com");
        assert_ne!(name, email);
        assert!(deserialize(name).is_ok());
        assert!(deserialize(email).is_ok());

        let opened = decrypt_object(&cipher, &sealed, &["name", "email"]).unwrap();
        assert_eq!(opened, original);
    }

    #[test]
    fn field_order_does_not_matter() {
        let cipher = test_cipher();
        let original = sample();
        let sealed = encrypt_object(&cipher, &original, &["email", "name"]).unwrap();
        let opened = decrypt_object(&cipher, &sealed, &["name", "email"]).unwrap();
        assert_eq!(opened, original);
    }

    #[test]
    fn duplicate_names_encrypt_once() {
        let cipher = test_cipher();
        let original = sample();
        let sealed = encrypt_object(&cipher, &original, &["name", "name"]).unwrap();
        let opened = decrypt_object(&cipher, &sealed, &["name"]).unwrap();
        assert_eq!(opened, original);
    }

    #[test]
    fn absent_names_are_ignored() {
        let cipher = test_cipher();
        let original = sample();
        let sealed = encrypt_object(&cipher, &original, &["phone"]).unwrap();
        assert_eq!(sealed, original);
        assert!(!sealed.contains_key("phone"));
    }

    #[test]
    fn empty_selection_is_identity() {
        let cipher = test_cipher();
        let original = sample();
        let none: [&str; 0] = [];
        assert_eq!(encrypt_object(&cipher, &original, &none).unwrap(), original);
    }

    #[test]
    fn null_fields_stay_null() {
        let cipher = test_cipher();
        let original = record(json!({"id": 2, "notes": null}));
        let sealed = encrypt_object(&cipher, &original, &["notes"]).unwrap();
        assert_eq!(sealed["notes"], Value::Null);
        let opened = decrypt_object(&cipher, &sealed, &["notes"]).unwrap();
        assert_eq!(opened, original);
    }

    #[test]
    fn non_string_field_is_validation_error() {
        let cipher = test_cipher();
        let original = sample();
        let err = encrypt_object(&cipher, &original, &["name", "id"]).unwrap_err();
        match err {
            CryptoError::Validation(msg) => {
                assert!(msg.contains("`id`"));
                assert!(msg.contains("number"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn decrypt_rejects_non_string_field() {
        let cipher = test_cipher();
        let original = record(json!({"tags": ["a", "b"]}));
        let err = decrypt_object(&cipher, &original, &["tags"]).unwrap_err();
        assert!(matches!(err, CryptoError::Validation(_)));
    }

    #[test]
    fn decrypt_of_unsealed_field_fails() {
        let cipher = test_cipher();
        let err = decrypt_object(&cipher, &sample(), &["name"]).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedEnvelope(_)));
    }

    #[test]
    fn unsealed_string_value_is_not_echoed() {
        let cipher = test_cipher();
        let original = record(json!({"name": "\"Jane Roe\""}));
        let err = decrypt_object(&cipher, &original, &["name"]).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedEnvelope(_)));
        assert!(!err.to_string().contains("Jane Roe"));
    }

    #[test]
    fn accepts_owned_field_names() {
        let cipher = test_cipher();
        let original = sample();
        let fields = vec!["email".to_owned()];
        let sealed = encrypt_object(&cipher, &original, &fields).unwrap();
        let opened = decrypt_object(&cipher, &sealed, &fields).unwrap();
        assert_eq!(opened, original);
    }
}
