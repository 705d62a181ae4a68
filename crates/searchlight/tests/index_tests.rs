//! Index operation tests against a mock engine.

mod common;

use common::{ack, client_for, error_body};
use searchlight::{EnsureIndex, Error, Page};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn movies_descriptor() -> serde_json::Value {
    json!({
        "uid": "movies",
        "primaryKey": "id",
        "createdAt": "2024-08-04T10:00:00Z",
        "updatedAt": "2024-08-04T10:05:00Z"
    })
}

#[tokio::test]
async fn test_create_index_posts_body_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(header("Authorization", "Bearer masterKey"))
        .and(body_json(json!({ "uid": "movies", "primaryKey": "id" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(ack(0, "movies", "indexCreation")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ack = client.create_index("movies", Some("id")).await.unwrap();

    assert_eq!(ack.task_uid, 0);
    assert_eq!(ack.index_uid.as_deref(), Some("movies"));
    assert_eq!(ack.kind, "indexCreation");
}

#[tokio::test]
async fn test_get_index_not_found_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/movies"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(error_body("index_not_found", "Index `movies` not found.")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.get_index("movies").await {
        Err(Error::IndexNotFound(uid)) => assert_eq!(uid, "movies"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_ensure_index_keeps_existing_primary_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies_descriptor()))
        .mount(&server)
        .await;
    // An existing index must never trigger a create call.
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(202).set_body_json(ack(0, "movies", "indexCreation")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);

    // Same primary key: benign, the descriptor comes back.
    match client.ensure_index("movies", Some("id")).await.unwrap() {
        EnsureIndex::AlreadyExists(descriptor) => {
            assert_eq!(descriptor.primary_key.as_deref(), Some("id"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Conflicting primary key: informational failure, original key untouched.
    match client.ensure_index("movies", Some("idx")).await {
        Err(Error::IndexAlreadyExists { uid, existing }) => {
            assert_eq!(uid, "movies");
            assert_eq!(existing.as_deref(), Some("id"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    server.verify().await;
}

#[tokio::test]
async fn test_ensure_index_creates_missing_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/movies"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(error_body("index_not_found", "Index `movies` not found.")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(202).set_body_json(ack(0, "movies", "indexCreation")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.ensure_index("movies", Some("id")).await.unwrap() {
        EnsureIndex::Created(ack) => assert_eq!(ack.task_uid, 0),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_indexes_translates_page_to_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .and(query_param("offset", "10"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [movies_descriptor()],
            "offset": 10,
            "limit": 10,
            "total": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.list_indexes(Page::new(2, 10)).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.offset, 10);
    assert_eq!(page.total, 11);
}

#[tokio::test]
async fn test_update_index_refuses_non_empty_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/movies/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numberOfDocuments": 6,
            "isIndexing": false,
            "fieldDistribution": {}
        })))
        .mount(&server)
        .await;
    // The no-op request must never reach the engine.
    Mock::given(method("PATCH"))
        .and(path("/indexes/movies"))
        .respond_with(ResponseTemplate::new(202).set_body_json(ack(1, "movies", "indexUpdate")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.update_index("movies", "idx").await {
        Err(Error::IndexNotEmpty { uid, documents }) => {
            assert_eq!(uid, "movies");
            assert_eq!(documents, 6);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    server.verify().await;
}

#[tokio::test]
async fn test_update_index_patches_empty_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/movies/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numberOfDocuments": 0,
            "isIndexing": false,
            "fieldDistribution": {}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/indexes/movies"))
        .and(body_json(json!({ "primaryKey": "idx" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(ack(1, "movies", "indexUpdate")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ack = client.update_index("movies", "idx").await.unwrap();
    assert_eq!(ack.kind, "indexUpdate");
}

#[tokio::test]
async fn test_delete_index_is_unconditional() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/indexes/movies"))
        .respond_with(ResponseTemplate::new(202).set_body_json(ack(2, "movies", "indexDeletion")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ack = client.delete_index("movies").await.unwrap();
    assert_eq!(ack.kind, "indexDeletion");
}

#[tokio::test]
async fn test_concurrent_index_creation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(202).set_body_json(ack(0, "test", "indexCreation")))
        .expect(8)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let creations = (1..=8).map(|i| {
        let client = client.clone();
        async move {
            let uid = format!("test{i}");
            client.create_index(&uid, Some("id")).await
        }
    });

    let results = futures::future::join_all(creations).await;
    assert!(results.iter().all(|r| r.is_ok()));
}
