use std::collections::HashMap;

use solarbridge_storage::credentials::{CredentialSource, ServiceAccountKey};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn credentials_file_wins() {
    let source = CredentialSource::from_lookup(lookup(&[
        ("STORAGE_CREDENTIALS_FILE", "/etc/solarbridge/key.json"),
        ("AWS_ACCESS_KEY_ID", "AKIA"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
    ]));
    assert_eq!(
        source,
        CredentialSource::ServiceAccountFile {
            path: "/etc/solarbridge/key.json".into()
        }
    );
    assert_eq!(source.kind(), "service_account_file");
}

#[test]
fn inline_then_profile_then_default() {
    let inline = CredentialSource::from_lookup(lookup(&[
        ("AWS_ACCESS_KEY_ID", "AKIA"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
        ("AWS_PROFILE", "dev"),
    ]));
    assert_eq!(inline.kind(), "inline");

    let half_inline = CredentialSource::from_lookup(lookup(&[
        ("AWS_ACCESS_KEY_ID", "AKIA"),
        ("AWS_PROFILE", "dev"),
    ]));
    assert_eq!(
        half_inline,
        CredentialSource::Profile {
            profile_name: "dev".into()
        }
    );

    let blank = CredentialSource::from_lookup(lookup(&[("STORAGE_CREDENTIALS_FILE", "  ")]));
    assert_eq!(blank, CredentialSource::DefaultChain);
}

#[test]
fn service_account_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("key.json");
    std::fs::write(
        &path,
        r#"{"access_key_id":"AKIA","secret_access_key":"s3cr3t","region":"ap-south-1"}"#,
    )
    .unwrap();

    let key = ServiceAccountKey::load(&path).unwrap();
    assert_eq!(key.access_key_id, "AKIA");
    assert_eq!(key.region.as_deref(), Some("ap-south-1"));
    assert_eq!(key.session_token, None);

    std::fs::write(&path, b"not json").unwrap();
    assert!(ServiceAccountKey::load(&path).is_err());
    assert!(ServiceAccountKey::load(&dir.path().join("missing.json")).is_err());
}

#[test]
fn credential_source_config_shape() {
    let source: CredentialSource =
        serde_json::from_str(r#"{"type":"service_account_file","path":"key.json"}"#).unwrap();
    assert_eq!(source.kind(), "service_account_file");
}
