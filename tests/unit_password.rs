use classhub::utils::password::{hash_password, verify_password};

#[test]
fn test_hash_and_verify_roundtrip() {
    let hash = hash_password("correct horse battery staple").unwrap();

    assert!(verify_password("correct horse battery staple", &hash).unwrap());
    assert!(!verify_password("wrong password", &hash).unwrap());
}

#[test]
fn test_hash_is_salted() {
    let first = hash_password("same input").unwrap();
    let second = hash_password("same input").unwrap();

    assert_ne!(first, second);
    assert!(verify_password("same input", &first).unwrap());
    assert!(verify_password("same input", &second).unwrap());
}

#[test]
fn test_hash_does_not_contain_plaintext() {
    let hash = hash_password("visible-secret").unwrap();
    assert!(!hash.contains("visible-secret"));
}

#[test]
fn test_verify_rejects_garbage_hash() {
    assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
}
