use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_smithy_http_client::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_types::body::SdkBody;
use jiff::Timestamp;
use uuid::Uuid;

use solarbridge_core::keys;
use solarbridge_core::models::assessment::{Assessment, NewAssessment};
use solarbridge_storage::error::StorageError;
use solarbridge_storage::s3::S3Store;
use solarbridge_storage::store::AssessmentStore;

const BUCKET: &str = "leads";

fn store(replay: &StaticReplayClient) -> S3Store {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("ap-south-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .force_path_style(true)
        .http_client(replay.clone())
        .build();
    S3Store::new(Client::from_conf(config), BUCKET)
}

/// The replay client only hands back responses in order; the recorded
/// request is never compared.
fn reply(status: u16, headers: &[(&str, &str)], body: impl Into<SdkBody>) -> ReplayEvent {
    let mut response = http::Response::builder().status(status);
    for (name, value) in headers {
        response = response.header(*name, *value);
    }
    ReplayEvent::new(
        http::Request::builder()
            .uri(format!("https://s3.ap-south-1.amazonaws.com/{BUCKET}"))
            .body(SdkBody::empty())
            .unwrap(),
        response.body(body.into()).unwrap(),
    )
}

fn list_page(object_keys: &[String], next_token: Option<&str>) -> ReplayEvent {
    let contents: String = object_keys
        .iter()
        .map(|k| format!("<Contents><Key>{k}</Key><Size>512</Size></Contents>"))
        .collect();
    let truncation = match next_token {
        Some(token) => format!(
            "<IsTruncated>true</IsTruncated><NextContinuationToken>{token}</NextContinuationToken>"
        ),
        None => "<IsTruncated>false</IsTruncated>".to_string(),
    };
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>{BUCKET}</Name><Prefix>assessments/</Prefix><KeyCount>{}</KeyCount><MaxKeys>1000</MaxKeys>{truncation}{contents}</ListBucketResult>"#,
        object_keys.len()
    );
    reply(200, &[("content-type", "application/xml")], body)
}

fn object(assessment: &Assessment) -> ReplayEvent {
    reply(
        200,
        &[("content-type", "application/json")],
        serde_json::to_vec(assessment).unwrap(),
    )
}

fn stored(name: &str, submitted_at: &str) -> Assessment {
    NewAssessment {
        name: name.into(),
        email: "lead@example.com".into(),
        ..Default::default()
    }
    .into_assessment(Uuid::new_v4(), submitted_at.parse().unwrap())
}

fn submission(name: &str) -> NewAssessment {
    NewAssessment {
        name: name.into(),
        email: "lead@example.com".into(),
        city: Some("Pune".into()),
        ..Default::default()
    }
}

/// (method, uri, if-none-match) for each request the client sent.
fn sent(replay: &StaticReplayClient) -> Vec<(String, String, Option<String>)> {
    replay
        .actual_requests()
        .map(|r| {
            (
                r.method().to_string(),
                r.uri().to_string(),
                r.headers().get("if-none-match").map(str::to_string),
            )
        })
        .collect()
}

#[tokio::test]
async fn insert_puts_only_if_absent() {
    let replay = StaticReplayClient::new(vec![
        list_page(&[], None),
        reply(200, &[("etag", "\"9b2cf535f27731c974343645a3985328\"")], SdkBody::empty()),
    ]);
    let store = store(&replay);

    let assessment = store.insert(submission("Asha Rao")).await.unwrap();
    assert_eq!(assessment.name, "Asha Rao");
    assert_eq!(assessment.city.as_deref(), Some("Pune"));

    let requests = sent(&replay);
    assert_eq!(requests.len(), 2);
    let (method, uri, _) = &requests[0];
    assert_eq!(method, "GET");
    assert!(uri.contains("list-type=2"), "{uri}");
    let (method, uri, if_none_match) = &requests[1];
    assert_eq!(method, "PUT");
    assert!(uri.contains(&keys::assessment(assessment.id)), "{uri}");
    assert_eq!(if_none_match.as_deref(), Some("*"));
}

#[tokio::test]
async fn taken_key_is_already_exists() {
    let conflict = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>PreconditionFailed</Code><Message>At least one of the pre-conditions you specified did not hold</Message><Condition>If-None-Match</Condition><RequestId>4442587FB7D0A2F9</RequestId></Error>"#;
    let replay = StaticReplayClient::new(vec![
        list_page(&[], None),
        reply(412, &[("content-type", "application/xml")], conflict),
    ]);
    let store = store(&replay);

    let err = store.insert(submission("Asha Rao")).await.unwrap_err();
    assert!(
        matches!(&err, StorageError::AlreadyExists { key } if key.starts_with(keys::ASSESSMENTS_PREFIX)),
        "{err}"
    );
}

#[tokio::test]
async fn list_follows_pages_skips_stray_keys_and_sorts_newest_first() {
    let older = stored("Asha", "2026-01-10T09:00:00Z");
    let newer = stored("Ravi", "2026-03-02T17:30:00Z");
    let replay = StaticReplayClient::new(vec![
        list_page(
            &[
                keys::assessment(older.id),
                "assessments/notes.txt".to_string(),
            ],
            Some("page-2"),
        ),
        list_page(&[keys::assessment(newer.id)], None),
        object(&older),
        object(&newer),
    ]);
    let store = store(&replay);

    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![newer, older]);

    let requests = sent(&replay);
    assert_eq!(requests.len(), 4);
    assert!(requests[1].1.contains("continuation-token=page-2"), "{}", requests[1].1);
}

#[tokio::test]
async fn insert_stamps_after_newest_stored_record() {
    let future: Timestamp = "2099-01-01T00:00:00Z".parse().unwrap();
    let existing = stored("Asha", "2099-01-01T00:00:00Z");
    let replay = StaticReplayClient::new(vec![
        list_page(&[keys::assessment(existing.id)], None),
        object(&existing),
        reply(200, &[("etag", "\"first\"")], SdkBody::empty()),
        reply(200, &[("etag", "\"second\"")], SdkBody::empty()),
    ]);
    let store = store(&replay);

    let first = store.insert(submission("Ravi")).await.unwrap();
    assert!(first.submitted_at > future);

    // The bucket is only scanned once.
    let second = store.insert(submission("Meera")).await.unwrap();
    assert!(second.submitted_at > first.submitted_at);
    assert_eq!(sent(&replay).len(), 4);
}

#[tokio::test]
async fn health_check_reports_missing_bucket() {
    let replay = StaticReplayClient::new(vec![
        reply(200, &[], SdkBody::empty()),
        reply(404, &[], SdkBody::empty()),
    ]);
    let store = store(&replay);

    store.health_check().await.unwrap();
    assert!(matches!(
        store.health_check().await,
        Err(StorageError::HeadBucket(_))
    ));
    assert_eq!(store.backend(), "s3");
}
