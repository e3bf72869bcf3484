//! Database-level tests (pooling, encryption, migrations)

use super::*;

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::in_memory().unwrap();
    // Running migrations again must not fail or lose data
    let user = db.create_user("Acme").unwrap();
    db.run_migrations().unwrap();
    assert_eq!(db.get_user(user).unwrap().name, "Acme");
}

#[test]
fn test_derive_key_is_deterministic() {
    let a = derive_key("correct horse battery staple").unwrap();
    let b = derive_key("correct horse battery staple").unwrap();
    assert_eq!(a, b);

    let c = derive_key("different passphrase").unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_encrypted_database_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runway.db");
    let path_str = path.to_str().unwrap();

    {
        let db = Database::new_with_key(path_str, Some("passphrase")).unwrap();
        db.create_user("Acme").unwrap();
    }

    // Reopen with the same key and read the data back
    let db = Database::new_with_key(path_str, Some("passphrase")).unwrap();
    assert_eq!(db.list_users().unwrap().len(), 1);
}

#[test]
fn test_parse_datetime_formats() {
    let dt = parse_datetime("2026-03-02 09:30:00");
    assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-03-02 09:30:00");
}
