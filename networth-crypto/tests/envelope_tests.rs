use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use networth_crypto::{
    decrypt_string, derive_key, derive_key_with_params, encrypt_string, is_encrypted, CryptoError,
    DerivedKey, Envelope, KdfParams, ENVELOPE_TAG, NONCE_SIZE, TAG_SIZE,
};

fn fast_key(password: &str, user_id: &str) -> DerivedKey {
    derive_key_with_params(password, user_id, &KdfParams::fast_insecure()).unwrap()
}

// ── Concrete scenario (default parameters) ──

#[test]
fn scotiabank_chequing_scenario() {
    let key = derive_key("CorrectHorse8!", "user-42").unwrap();
    let plaintext = "Scotiabank Chequing";

    let envelope = encrypt_string(&key, plaintext).unwrap();
    assert!(envelope.as_str().starts_with("ENC:"));

    let decoded = STANDARD.decode(&envelope.as_str()[4..]).unwrap();
    assert_eq!(decoded.len(), NONCE_SIZE + TAG_SIZE + plaintext.len());

    assert_eq!(decrypt_string(&key, envelope.as_str()).unwrap(), plaintext);

    let other_user = derive_key("CorrectHorse8!", "user-43").unwrap();
    let err = decrypt_string(&other_user, envelope.as_str()).unwrap_err();
    assert!(matches!(err, CryptoError::Decryption(_)), "got {err:?}");
}

// ── Round trip / nonce uniqueness ──

#[test]
fn round_trip_unicode() {
    let key = fast_key("pw-unicode", "user-1");
    let text = "Café Crème · 東京 💸";
    let env = encrypt_string(&key, text).unwrap();
    assert_eq!(decrypt_string(&key, env.as_str()).unwrap(), text);
}

#[test]
fn round_trip_empty_string() {
    let key = fast_key("pw", "user-1");
    let env = encrypt_string(&key, "").unwrap();
    assert!(is_encrypted(env.as_str()));
    assert_eq!(decrypt_string(&key, env.as_str()).unwrap(), "");
}

#[test]
fn same_plaintext_gives_different_envelopes() {
    let key = fast_key("pw", "user-1");
    let a = encrypt_string(&key, "Monthly rent").unwrap();
    let b = encrypt_string(&key, "Monthly rent").unwrap();

    assert_ne!(a, b);
    assert_eq!(decrypt_string(&key, a.as_str()).unwrap(), "Monthly rent");
    assert_eq!(decrypt_string(&key, b.as_str()).unwrap(), "Monthly rent");
}

// ── Legacy pass-through ──

#[test]
fn untagged_value_passes_through() {
    let key = fast_key("pw", "user-1");
    let legacy = "TD Visa Infinite";
    assert!(!is_encrypted(legacy));
    assert_eq!(decrypt_string(&key, legacy).unwrap(), legacy);
}

#[test]
fn tag_is_case_sensitive() {
    let key = fast_key("pw", "user-1");
    assert!(!is_encrypted("enc:something"));
    assert_eq!(decrypt_string(&key, "enc:something").unwrap(), "enc:something");
}

// ── Failure modes ──

#[test]
fn wrong_password_is_integrity_failure() {
    let right = fast_key("right-password", "user-1");
    let wrong = fast_key("wrong-password", "user-1");
    let env = encrypt_string(&right, "balance sheet").unwrap();

    let err = env.open_string(&wrong).unwrap_err();
    assert!(err.is_integrity_failure());
    assert!(err.to_string().contains("wrong key"));
}

#[test]
fn tag_only_is_malformed() {
    let key = fast_key("pw", "user-1");
    let err = decrypt_string(&key, ENVELOPE_TAG).unwrap_err();
    assert!(matches!(err, CryptoError::MalformedEnvelope(_)));
    assert!(err.is_integrity_failure());
}

#[test]
fn too_short_payload_is_malformed() {
    let key = fast_key("pw", "user-1");
    let short = format!("{ENVELOPE_TAG}{}", STANDARD.encode([0u8; NONCE_SIZE + TAG_SIZE - 1]));
    assert!(matches!(
        decrypt_string(&key, &short),
        Err(CryptoError::MalformedEnvelope(_))
    ));
}

#[test]
fn minimum_length_payload_is_checked_by_tag() {
    let key = fast_key("pw", "user-1");
    let zeros = format!("{ENVELOPE_TAG}{}", STANDARD.encode([0u8; NONCE_SIZE + TAG_SIZE]));
    assert!(matches!(
        decrypt_string(&key, &zeros),
        Err(CryptoError::Decryption(_))
    ));
}

#[test]
fn every_payload_byte_is_authenticated() {
    let key = fast_key("pw", "user-1");
    let env = encrypt_string(&key, "tamper me").unwrap();
    let bytes = STANDARD.decode(&env.as_str()[ENVELOPE_TAG.len()..]).unwrap();

    for i in 0..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[i] ^= 0x01;
        let forged = Envelope::parse(format!("{ENVELOPE_TAG}{}", STANDARD.encode(&tampered))).unwrap();
        assert!(
            forged.open(&key).is_err(),
            "tampering at byte {i} should be detected"
        );
    }
}

#[test]
fn envelope_serializes_as_plain_string() {
    let key = fast_key("pw", "user-1");
    let env = encrypt_string(&key, "x").unwrap();
    let json = serde_json::to_string(&env).unwrap();
    assert_eq!(json, format!("\"{}\"", env.as_str()));
    let back: Envelope = serde_json::from_str(&json).unwrap();
    assert_eq!(back, env);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::LazyLock;

    static KEY_A: LazyLock<DerivedKey> = LazyLock::new(|| fast_key("prop-password-a", "prop-user"));
    static KEY_B: LazyLock<DerivedKey> = LazyLock::new(|| fast_key("prop-password-b", "prop-user"));

    proptest! {
        #[test]
        fn encrypt_decrypt_always_roundtrips(s in ".*") {
            let env = encrypt_string(&KEY_A, &s).unwrap();
            prop_assert_eq!(decrypt_string(&KEY_A, env.as_str()).unwrap(), s);
        }

        #[test]
        fn other_key_never_decrypts(s in ".{0,64}") {
            let env = encrypt_string(&KEY_A, &s).unwrap();
            let err = decrypt_string(&KEY_B, env.as_str()).unwrap_err();
            prop_assert!(matches!(err, CryptoError::Decryption(_)));
        }

        #[test]
        fn untagged_strings_pass_through(s in "[^E].*") {
            prop_assert_eq!(decrypt_string(&KEY_A, &s).unwrap(), s);
        }
    }
}
