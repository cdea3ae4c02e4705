//! Property-based tests for the payloads `InsightClient` assembles.
//!
//! These run without a server: `ingest_request` builds exactly the body
//! that `ingest` posts.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use insight_stream::{FixedClock, InsightClient, SystemClock};
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};

fn client_at(at: DateTime<Utc>) -> InsightClient {
    InsightClient::builder()
        .with_url("http://127.0.0.1:9")
        .with_clock(FixedClock(at))
        .build()
        .expect("build client")
}

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

proptest! {
    #[test]
    fn generated_timestamp_is_utc_iso8601(
        labels in proptest::collection::btree_map("[a-z_]{1,8}", ".*", 0..4),
        message in ".*",
        at in instant(),
    ) {
        let client = client_at(at);
        let request = client.ingest_request(&labels, &message, None);

        prop_assert_eq!(request.streams.len(), 1);
        let stream = &request.streams[0];
        prop_assert_eq!(&stream.labels, &labels);
        prop_assert_eq!(stream.entries.len(), 1);

        let entry = &stream.entries[0];
        prop_assert_eq!(entry.line(), message.as_str());
        prop_assert!(entry.timestamp().ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(entry.timestamp()).expect("valid RFC3339");
        prop_assert_eq!(parsed.timestamp(), at.timestamp());
        prop_assert_eq!(parsed.timestamp_subsec_micros(), at.timestamp_subsec_micros());
    }

    #[test]
    fn explicit_timestamp_is_untouched(
        message in ".*",
        ts in ".+",
    ) {
        let client = client_at(Utc::now());
        let request = client.ingest_request([("app", "web")], &message, Some(ts.as_str()));
        prop_assert_eq!(request.streams[0].entries[0].timestamp(), ts.as_str());
    }

    #[test]
    fn body_round_trips_labels_and_line(
        labels in proptest::collection::btree_map(".*", ".*", 0..4),
        message in ".*",
    ) {
        let client = client_at(Utc::now());
        let request = client.ingest_request(&labels, &message, Some("t"));
        let body: Value = serde_json::to_value(&request).expect("serialise");

        let expected_labels: serde_json::Map<String, Value> = labels
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        prop_assert_eq!(&body["streams"][0]["labels"], &Value::Object(expected_labels));
        prop_assert_eq!(&body["streams"][0]["entries"][0]["line"], &json!(message));
        prop_assert_eq!(&body["streams"][0]["entries"][0]["ts"], &json!("t"));
    }
}

#[rstest]
fn empty_timestamp_falls_back_to_clock() {
    let at = Utc.with_ymd_and_hms(2022, 8, 1, 0, 0, 0).unwrap();
    let request = client_at(at).ingest_request(BTreeMap::<String, String>::new(), "m", Some(""));
    assert_eq!(
        request.streams[0].entries[0].timestamp(),
        "2022-08-01T00:00:00.000000Z"
    );
}

#[rstest]
fn system_clock_stamps_call_time() {
    let client = InsightClient::builder()
        .with_url("http://127.0.0.1:9")
        .with_clock(SystemClock)
        .build()
        .expect("build client");
    let before = Utc::now();
    let request = client.ingest_request([("app", "web")], "m", None);
    let after = Utc::now();

    let ts = DateTime::parse_from_rfc3339(request.streams[0].entries[0].timestamp())
        .expect("valid RFC3339")
        .with_timezone(&Utc);
    // Microsecond truncation can place the stamp just below `before`.
    assert!(ts >= before - chrono::Duration::microseconds(1));
    assert!(ts <= after);
}
