// Copyright 2026 Sage Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use sage::ClientError;
use sage::Projection;
use sage::SearchClient;
use sage::SearchParameters;
use sage::SearchSession;
use sage::model::UploadOutcome;
use sage::query::SortOrder;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::body_string_contains;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn meta(matched: i64, returned: i64) -> Value {
    json!({"meta": {
        "totalRecords": 100,
        "matchedRecords": matched,
        "returnedRecords": returned,
        "totalTime": "1.5ms"
    }})
}

fn log_record(id: &str, host: &str) -> Value {
    json!({
        "MsgId": id,
        "Hostname": host,
        "Message": format!("message {id}"),
        "Priority": 3
    })
}

fn client(server: &MockServer) -> SearchClient {
    SearchClient::new(&server.uri(), Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn fetch_all_hits_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            meta(2, 2),
            log_record("m1", "web-1"),
            log_record("m2", "web-2"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = SearchSession::new();
    let params = SearchParameters::default();
    let projection = client(&server)
        .submit(&session, Ok(params.simple_submission()))
        .await;

    assert_eq!(projection.rows.len(), 2);
    assert_eq!(
        projection.columns,
        vec!["MsgId", "Hostname", "Message", "Priority"]
    );
    assert_eq!(session.snapshot().await, projection);
}

#[tokio::test]
async fn free_text_hits_get_doc_with_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getDoc"))
        .and(query_param("query", "disk full"))
        .and(query_param("start", "20"))
        .and(query_param("limit", "5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([meta(1, 1), log_record("m9", "db-1")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParameters {
        query: "disk full".to_string(),
        skip: 20,
        limit: 5,
        custom_filter: "{not even json".to_string(),
        ..SearchParameters::default()
    };
    let projection = client(&server).search(&params.simple_submission()).await;
    let meta = projection.metadata.expect("metadata");
    assert_eq!(meta.matched_records, 1);
    assert_eq!(meta.total_time, json!("1.5ms"));
    assert_eq!(Projection::cell(&projection.rows[0], "Hostname"), "db-1");
}

#[tokio::test]
async fn get_doc_accepts_nanosecond_total_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getDoc"))
        .and(query_param("query", "disk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"meta": {
                "totalRecords": 100,
                "matchedRecords": 1,
                "returnedRecords": 1,
                "totalTime": 152340
            }},
            log_record("m7", "db-2"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParameters {
        query: "disk".to_string(),
        ..SearchParameters::default()
    };
    let projection = client(&server).search(&params.simple_submission()).await;
    assert_eq!(projection.rows.len(), 1);
    assert_eq!(Projection::cell(&projection.rows[0], "MsgId"), "m7");
    let meta = projection.metadata.expect("metadata");
    assert_eq!(meta.total_time, json!(152340));
}

#[tokio::test]
async fn structured_filter_posts_search_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({
            "query": {"Hostname": "db-1"},
            "limit": 25,
            "start": 0,
            "sort": "ascending",
            "matchType": "AND"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([meta(1, 1), log_record("m3", "db-1")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParameters {
        query: "stale free text".to_string(),
        limit: 25,
        sort: SortOrder::Asc,
        custom_filter: r#"{"Hostname": "db-1"}"#.to_string(),
        ..SearchParameters::default()
    };
    let session = SearchSession::new();
    let projection = client(&server)
        .submit(&session, params.structured_submission())
        .await;
    assert_eq!(projection.rows.len(), 1);
    assert_eq!(Projection::cell(&projection.rows[0], "MsgId"), "m3");
}

#[tokio::test]
async fn invalid_filter_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([meta(0, 0)])))
        .expect(0)
        .mount(&server)
        .await;

    let params = SearchParameters {
        custom_filter: "{bad json".to_string(),
        ..SearchParameters::default()
    };
    let session = SearchSession::new();
    let projection = client(&server)
        .submit(&session, params.structured_submission())
        .await;
    assert!(projection.is_empty());
    assert!(session.snapshot().await.is_empty());
}

#[tokio::test]
async fn server_errors_degrade_to_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getDoc"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let request = SearchParameters {
        query: "x".to_string(),
        ..SearchParameters::default()
    }
    .simple_submission();
    let client = client(&server);

    let err = client.send(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, ref message } if message == "boom"));
    assert_eq!(client.search(&request).await, Projection::empty());
}

#[tokio::test]
async fn malformed_body_degrades_to_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getDoc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "query key not found"})),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let fetch_all = SearchParameters::default().simple_submission();
    assert!(matches!(
        client.send(&fetch_all).await,
        Err(ClientError::Decode(_))
    ));
    assert!(client.search(&fetch_all).await.is_empty());

    let get_doc = SearchParameters {
        query: "x".to_string(),
        ..SearchParameters::default()
    }
    .simple_submission();
    assert!(client.search(&get_doc).await.is_empty());
}

#[tokio::test]
async fn unreachable_server_degrades_to_no_results() {
    let client = SearchClient::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("client");
    let projection = client
        .search(&SearchParameters::default().simple_submission())
        .await;
    assert!(projection.is_empty());
}

#[tokio::test]
async fn stats_reads_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 1234})))
        .mount(&server)
        .await;

    let stats = client(&server).stats().await.expect("stats");
    assert_eq!(stats.total, 1234);
}

#[tokio::test]
async fn upload_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"logs.csv\""))
        .and(body_string_contains("MsgId,Hostname"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "File saved and parsed successfully",
            "documentsParsed": 2,
            "duration": "3.2ms"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("logs.csv");
    std::fs::write(&file, "MsgId,Hostname\nm1,web-1\nm2,web-2\n").expect("write csv");

    match client(&server).upload(&file).await {
        UploadOutcome::Uploaded(receipt) => {
            assert_eq!(receipt.documents_parsed, 2);
            assert_eq!(receipt.duration, "3.2ms");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn upload_surfaces_server_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Parse failed: bad header"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("logs.parquet");
    std::fs::write(&file, "not parquet").expect("write parquet");

    let client = client(&server);
    let expected = UploadOutcome::Failed {
        error: "Parse failed: bad header".to_string(),
    };
    assert_eq!(client.upload_file(&file).await.expect("decoded"), expected);
    let outcome = client.upload(&file).await;
    assert!(!outcome.is_ok());
    assert_eq!(outcome, expected);
}

#[tokio::test]
async fn upload_failures_report_upload_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Only .csv and .parquet files are allowed"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let client = client(&server);

    let csv = dir.path().join("broken.csv");
    std::fs::write(&csv, "garbage").expect("write csv");
    assert_eq!(client.upload(&csv).await, UploadOutcome::failed());

    let missing = dir.path().join("missing.parquet");
    assert!(matches!(
        client.upload_file(&missing).await,
        Err(ClientError::Io { .. })
    ));
    assert_eq!(client.upload(&missing).await, UploadOutcome::failed());
}

#[tokio::test]
async fn unsupported_extension_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, "hello").expect("write");

    let client = client(&server);
    assert!(matches!(
        client.upload_file(&txt).await,
        Err(ClientError::UnsupportedFile(_))
    ));
    assert_eq!(client.upload(&txt).await, UploadOutcome::failed());
}

#[tokio::test]
async fn stale_submission_does_not_overwrite_newer_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getDoc"))
        .and(query_param("query", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([meta(1, 1), log_record("slow", "a")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getDoc"))
        .and(query_param("query", "fast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([meta(1, 1), log_record("fast", "b")])),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let session = SearchSession::new();
    let slow = SearchParameters {
        query: "slow".to_string(),
        ..SearchParameters::default()
    };
    let fast = SearchParameters {
        query: "fast".to_string(),
        ..SearchParameters::default()
    };

    let slow_fut = client.submit(&session, Ok(slow.simple_submission()));
    let fast_fut = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.submit(&session, Ok(fast.simple_submission())).await
    };
    let (slow_result, fast_result) = tokio::join!(slow_fut, fast_fut);

    assert_eq!(Projection::cell(&slow_result.rows[0], "MsgId"), "slow");
    assert_eq!(Projection::cell(&fast_result.rows[0], "MsgId"), "fast");
    let shown = session.snapshot().await;
    assert_eq!(Projection::cell(&shown.rows[0], "MsgId"), "fast");
}
