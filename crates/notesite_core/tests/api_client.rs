use notesite_core::{ApiClient, ApiConfig, ApiError, NewNote, NoteApi, PostApi, TagApi};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

async fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(&server.uri(), TOKEN).expect("mock server uri should be a valid base url");
    ApiClient::new(&config).expect("client should build")
}

#[tokio::test]
async fn requests_carry_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "slug": "rust", "title": "Rust"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let tags = client.list_tags().await.expect("list tags should succeed");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].slug, "rust");
}

#[tokio::test]
async fn note_lookup_decodes_camel_case_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "slug": "hello",
            "title": "Hello",
            "markdown": "# Hi",
            "createdAt": 100,
            "updatedAt": 200
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let note = client
        .get_note("hello")
        .await
        .expect("note lookup should succeed")
        .expect("note should exist");
    assert_eq!(note.id, 4);
    assert_eq!(note.updated_at, Some(200));
}

#[tokio::test]
async fn missing_note_maps_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes/absent"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notes/null"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client
        .get_note("absent")
        .await
        .expect("404 lookup should succeed")
        .is_none());
    assert!(client
        .get_note("null")
        .await
        .expect("null lookup should succeed")
        .is_none());
}

#[tokio::test]
async fn server_errors_surface_status_and_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .list_notes()
        .await
        .expect_err("500 should surface as an error");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(err.to_string().contains("/notes"));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .list_notes()
        .await
        .expect_err("malformed body should fail");
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn create_note_posts_payload_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(body_json(json!({"slug": "a", "title": "A", "markdown": "body"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(42)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let id = client
        .create_note(&NewNote::new("A", "a", "body"))
        .await
        .expect("create note should succeed");
    assert_eq!(id, 42);
}

#[tokio::test]
async fn association_endpoints_use_note_and_tag_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notesToTags"))
        .and(body_json(json!({"noteId": 3, "tagId": 9})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/notesToTags/3/8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notesToTags/notes/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([8, 9])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.link_tag(3, 9).await.expect("link should succeed");
    client.unlink_tag(3, 8).await.expect("unlink should succeed");
    assert_eq!(
        client
            .tag_ids_for_note(3)
            .await
            .expect("tag ids should load"),
        vec![8, 9]
    );
}

#[tokio::test]
async fn post_routes_use_legacy_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getPosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"slug": "p", "title": "P", "markdown": "text"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/posts/p"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let posts = client.list_posts().await.expect("list posts should succeed");
    assert_eq!(posts[0].slug, "p");
    client
        .delete_post("p")
        .await
        .expect("delete post should succeed");
}

#[tokio::test]
async fn slug_lookups_percent_encode_the_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tags/c%2B%2B%20tips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 2, "slug": "c++ tips", "title": "C++ tips"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let tag = client
        .get_tag("c++ tips")
        .await
        .expect("tag lookup should succeed")
        .expect("tag should exist");
    assert_eq!(tag.id, 2);
}

#[tokio::test]
async fn optional_lookup_reports_unreachable_server_as_transport_error() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    drop(server);

    let err = client
        .get_note("hello")
        .await
        .expect_err("closed server should fail");
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.status().is_none());
}
