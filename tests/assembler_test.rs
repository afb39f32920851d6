//! Integration tests for [`ResponseAssembler`] against a wiremock upstream.
//!
//! Mock expectations (`.expect(n)`) are verified when the `MockServer` is
//! dropped, so each test also asserts the exact number of upstream calls.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use furqan::{CacheKey, Furqan, QueryParams, ResponseAssembler, UpstreamRequest};

fn assembler_for(server: &MockServer) -> ResponseAssembler {
    Furqan::builder()
        .base_url(server.uri())
        .build()
        .expect("failed to build assembler")
}

fn verses_payload() -> Value {
    json!({
        "verses": [
            {
                "id": 8,
                "verse_key": "2:1",
                "text_uthmani": "الٓمٓ",
                "translations": [
                    {"id": 1, "resource_id": 20, "text": "Alif,<sup foot_note=\"77\">1</sup>   Lam,\n Meem."}
                ]
            },
            {
                "id": 9,
                "verse_key": "2:2",
                "translations": [
                    {"id": 2, "resource_id": 20, "text": "This is the Book<sup foot_note=\"78\">2</sup> about which there is no doubt."}
                ]
            },
            {"id": 10, "verse_key": "2:3"}
        ],
        "pagination": {"per_page": 10, "current_page": 1, "total_pages": 29}
    })
}

async fn mount_verses(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/verses/by_chapter/2"))
        .and(query_param("language", "en"))
        .and(query_param("words", "false"))
        .and(query_param("translations", "20"))
        .and(query_param("audio", "7"))
        .and(query_param("fields", "text_uthmani"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verses_payload()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// =============================================================================
// Read-through behaviour
// =============================================================================

#[tokio::test]
async fn verses_fetched_once_across_repeated_calls() {
    let server = MockServer::start().await;
    mount_verses(&server, 1).await;
    let assembler = assembler_for(&server);

    let first = assembler.verses(2, 1).await.unwrap();
    let second = assembler.verses(2, 1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first["verses"][0]["translations"][0]["text"],
        "Alif, Lam, Meem."
    );
    assert_eq!(
        first["verses"][1]["translations"][0]["text"],
        "This is the Book about which there is no doubt."
    );
}

#[tokio::test]
async fn chapters_and_info_pass_through_unchanged() {
    let server = MockServer::start().await;
    let chapters = json!({"chapters": [{"id": 1, "name_simple": "Al-Fatihah"}]});
    let info = json!({"chapter_info": {"chapter_id": 1, "text": "<p>The  Opening</p><sup>1</sup>"}});

    Mock::given(method("GET"))
        .and(path("/chapters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&chapters))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chapters/1/info"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&info))
        .expect(1)
        .mount(&server)
        .await;

    let assembler = assembler_for(&server);
    assert_eq!(*assembler.chapters().await.unwrap(), chapters);
    assert_eq!(*assembler.chapters().await.unwrap(), chapters);
    assert_eq!(*assembler.chapter_info(1).await.unwrap(), info);
    assert_eq!(*assembler.chapter_info(1).await.unwrap(), info);
}

#[tokio::test]
async fn reordered_params_share_one_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chapters/3/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    let assembler = assembler_for(&server);

    let a = UpstreamRequest::new(
        "/chapters/3/info",
        QueryParams::from_pairs([("language", "en"), ("format", "html")]),
    );
    let b = UpstreamRequest::new(
        "/chapters/3/info",
        QueryParams::from_pairs([("format", "html"), ("language", "en")]),
    );
    assert_eq!(CacheKey::from(a.clone()), CacheKey::from(b.clone()));

    assembler.fetch_raw(a).await.unwrap();
    assembler.fetch_raw(b).await.unwrap();
}

#[tokio::test]
async fn raw_entry_not_mutated_by_normalization() {
    let server = MockServer::start().await;
    mount_verses(&server, 1).await;
    let assembler = assembler_for(&server);

    assembler.verses(2, 1).await.unwrap();

    let raw = assembler
        .cache()
        .get(&CacheKey::raw_verses(2, 1))
        .await
        .expect("raw entry cached");
    assert_eq!(*raw, verses_payload());
    assert_eq!(
        raw["verses"][0]["translations"][0]["text"],
        "Alif,<sup foot_note=\"77\">1</sup>   Lam,\n Meem."
    );
}

#[tokio::test]
async fn verse_without_translations_returned_unchanged() {
    let server = MockServer::start().await;
    mount_verses(&server, 1).await;
    let assembler = assembler_for(&server);

    let value = assembler.verses(2, 1).await.unwrap();
    assert_eq!(value["verses"][2], json!({"id": 10, "verse_key": "2:3"}));
    assert_eq!(value["pagination"], verses_payload()["pagination"]);
}

#[tokio::test]
async fn payload_without_verses_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verses/by_chapter/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pagination": {}})))
        .expect(1)
        .mount(&server)
        .await;
    let assembler = assembler_for(&server);

    let value = assembler.verses(5, 1).await.unwrap();
    assert_eq!(*value, json!({"pagination": {}}));
}

#[tokio::test]
async fn pages_are_cached_independently() {
    let server = MockServer::start().await;
    for page in ["1", "2"] {
        Mock::given(method("GET"))
            .and(path("/verses/by_chapter/7"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": page})))
            .expect(1)
            .mount(&server)
            .await;
    }
    let assembler = assembler_for(&server);

    assert_eq!(assembler.verses(7, 1).await.unwrap()["page"], "1");
    assert_eq!(assembler.verses(7, 2).await.unwrap()["page"], "2");
    assert_eq!(assembler.verses(7, 1).await.unwrap()["page"], "1");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn upstream_error_propagates_with_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chapters/999/info"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"not found"}"#))
        .expect(2)
        .mount(&server)
        .await;
    let assembler = assembler_for(&server);

    let err = assembler.chapter_info(999).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.detail(), r#"{"error":"not found"}"#);

    // Failures are not cached: the next call goes upstream again.
    assert!(!assembler.cache().contains(&CacheKey::chapter_info(999)));
    assert!(assembler.chapter_info(999).await.is_err());
}

#[tokio::test]
async fn non_json_success_body_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chapters"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let assembler = assembler_for(&server);

    let err = assembler.chapters().await.unwrap_err();
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    // Bind then drop a listener so the port is very likely closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let assembler = Furqan::builder()
        .base_url(format!("http://{addr}"))
        .build()
        .unwrap();

    let err = assembler.chapters().await.unwrap_err();
    assert_eq!(err.status_code(), 502);
    assert!(assembler.cache().is_empty().await);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_misses_share_one_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verses/by_chapter/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(verses_payload())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let assembler = Arc::new(assembler_for(&server));

    let tasks = (0..8).map(|_| {
        let assembler = assembler.clone();
        tokio::spawn(async move { assembler.verses(2, 1).await })
    });
    let results = futures_util::future::join_all(tasks).await;

    for result in results {
        let value = result.unwrap().unwrap();
        assert_eq!(
            value["verses"][0]["translations"][0]["text"],
            "Alif, Lam, Meem."
        );
    }
}

#[tokio::test]
async fn upstream_credentials_sent_as_headers() {
    use furqan::UpstreamCredentials;
    use wiremock::matchers::header;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chapters"))
        .and(header("x-auth-token", "tok"))
        .and(header("x-client-id", "cid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chapters": []})))
        .expect(1)
        .mount(&server)
        .await;

    let assembler = Furqan::builder()
        .base_url(server.uri())
        .credentials(UpstreamCredentials {
            auth_token: Some("tok".into()),
            client_id: Some("cid".into()),
        })
        .build()
        .unwrap();

    assembler.chapters().await.unwrap();
}
