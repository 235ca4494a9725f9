//! Statically typed records whose encrypted columns are declared by the type itself.

use crate::crypto::{CryptoError, FieldCipher};

/// A mutable view of one encrypted column.
pub enum FieldSlot<'a> {
    /// A column that always holds text.
    Text(&'a mut String),
    /// A nullable text column.
    Nullable(&'a mut Option<String>),
}

/// Record types that know which of their fields are stored encrypted.
///
/// Only `String` and `Option<String>` fields can be listed, so a
/// non-text column can never be selected by mistake.
pub trait EncryptedFields {
    /// Every field stored as an envelope, in any order.
    fn encrypted_fields(&mut self) -> Vec<FieldSlot<'_>>;
}

/// Return a copy of `record` with its encrypted fields sealed.
///
/// # Errors
///
/// Propagates any cipher error; `record` itself is never modified.
pub fn encrypt_record<R>(cipher: &FieldCipher, record: &R) -> Result<R, CryptoError>
where
    R: EncryptedFields + Clone,
{
    let mut out = record.clone();
    for slot in out.encrypted_fields() {
        match slot {
            FieldSlot::Text(text) => {
                if let Some(sealed) = cipher.encrypt_for_database(Some(text.as_str()))? {
                    *text = sealed;
                }
            }
            FieldSlot::Nullable(value) => {
                *value = cipher.encrypt_for_database(value.as_deref())?;
            }
        }
    }
    Ok(out)
}

/// Return a copy of `record` with its encrypted fields opened.
///
/// # Errors
///
/// Propagates any envelope or cipher error; `record` itself is never modified.
pub fn decrypt_record<R>(cipher: &FieldCipher, record: &R) -> Result<R, CryptoError>
where
    R: EncryptedFields + Clone,
{
    let mut out = record.clone();
    for slot in out.encrypted_fields() {
        match slot {
            FieldSlot::Text(text) => {
                if let Some(opened) = cipher.decrypt_from_database(Some(text.as_str()))? {
                    *text = opened;
                }
            }
            FieldSlot::Nullable(value) => {
                *value = cipher.decrypt_from_database(value.as_deref())?;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::tests::test_cipher;
    use crate::crypto::envelope::deserialize;

    #[derive(Debug, Clone, PartialEq)]
    struct Reading {
        id: u64,
        querent_name: String,
        email: Option<String>,
        notes: Option<String>,
        spread: String,
    }

    impl EncryptedFields for Reading {
        fn encrypted_fields(&mut self) -> Vec<FieldSlot<'_>> {
            vec![
                FieldSlot::Text(&mut self.querent_name),
                FieldSlot::Nullable(&mut self.email),
                FieldSlot::Nullable(&mut self.notes),
            ]
        }
    }

    fn sample() -> Reading {
        Reading {
            id: 7,
            querent_name: "John Doe".into(),
            email: Some("john@example.com".into()),
            notes: None,
            spread: "celtic-cross".into(),
        }
    }

    #[test]
    fn typed_round_trip() {
        let cipher = test_cipher();
        let original = sample();
        let sealed = encrypt_record(&cipher, &original).unwrap();

        assert_eq!(sealed.id, 7);
        assert_eq!(sealed.spread, "celtic-cross");
        assert!(sealed.notes.is_none());
        assert!(deserialize(&sealed.querent_name).is_ok());
        assert!(deserialize(sealed.email.as_deref().unwrap()).is_ok());

        assert_eq!(decrypt_record(&cipher, &sealed).unwrap(), original);
    }

    #[test]
    fn failed_decrypt_leaves_input_untouched() {
        let cipher = test_cipher();
        let mut sealed = encrypt_record(&cipher, &sample()).unwrap();
        sealed.notes = Some("not an envelope".into());
        let before = sealed.clone();
        let err = decrypt_record(&cipher, &sealed).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedEnvelope(_)));
        assert_eq!(sealed, before);
    }
}
