//! Facade tests. These run the default (slow) key derivation, so they are
//! kept few and each derives only what it needs.

mod support;

use networth_crypto::CryptoError;
use networth_records::api;
use networth_records::RecordError;
use pretty_assertions::assert_eq;
use support::{account, transaction};

const PASSWORD: &str = "CorrectHorse8!";
const USER: &str = "user-42";

#[test]
fn value_round_trip_and_user_binding() {
    let env = api::encrypt_value("Scotiabank Chequing", PASSWORD, USER).unwrap();
    assert!(api::is_encrypted(env.as_str()));
    assert_eq!(
        api::decrypt_value(env.as_str(), PASSWORD, USER).unwrap(),
        "Scotiabank Chequing"
    );

    let err = api::decrypt_value(env.as_str(), PASSWORD, "user-43").unwrap_err();
    assert!(matches!(err, RecordError::Crypto(CryptoError::Decryption(_))));
}

#[test]
fn plain_value_passes_through_without_derivation() {
    assert!(!api::is_encrypted("Chequing"));
    // An empty password would fail derivation; pass-through never derives.
    assert_eq!(api::decrypt_value("Chequing", "", USER).unwrap(), "Chequing");
}

#[test]
fn account_and_transaction_round_trip() {
    let acct = account("Checking", 1500.50, Some("primary"));
    let row = api::encrypt_account(&acct, PASSWORD, USER).unwrap();
    assert_eq!(api::decrypt_account(&row, PASSWORD, USER).unwrap(), acct);

    let tx = transaction("Paycheque", 2750.00);
    let row = api::encrypt_transaction(&tx, PASSWORD, USER).unwrap();
    assert_eq!(api::decrypt_transaction(&row, PASSWORD, USER).unwrap(), tx);
}

#[test]
fn verify_password_distinguishes_passwords() {
    let sample = api::encrypt_value("verification", PASSWORD, USER).unwrap();
    assert!(api::verify_password(sample.as_str(), PASSWORD, USER).is_ok());

    let err = api::verify_password(sample.as_str(), "WrongHorse8!", USER).unwrap_err();
    assert_eq!(err.user_message(), "Could not decrypt your data. Check your password.");
}

#[test]
fn verify_password_rejects_plain_sample() {
    let err = api::verify_password("not sealed", PASSWORD, USER).unwrap_err();
    assert!(matches!(
        err,
        RecordError::Crypto(CryptoError::MalformedEnvelope(_))
    ));
}
