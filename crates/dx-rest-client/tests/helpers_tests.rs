//! Behavior of the request helpers against a scripted transport.

use std::sync::Arc;

use dx_api_contract::*;
use dx_client_api::{ClientApiError, DirectusApi, RequestBody, ResponseEncoding};
use dx_rest_client::*;
use dx_rest_client_mock::{MemoryCredentialStore, MockTransport};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::{json, Value};

fn client_with(transport: &Arc<MockTransport>, credentials: Option<Credentials>) -> DirectusClient {
    let mut store = MemoryCredentialStore::new();
    if let Some(credentials) = credentials {
        store = store.with(CREDENTIAL_NAME, credentials);
    }
    DirectusClient::new(HostContext::new(
        Arc::new(store),
        transport.clone(),
        Arc::new(Base64BinaryDataPreparer),
    ))
}

fn setup() -> (Arc<MockTransport>, DirectusClient) {
    let transport = Arc::new(MockTransport::new());
    let client = client_with(
        &transport,
        Some(Credentials::new("http://directus:8055/").with_access_token("static-token")),
    );
    (transport, client)
}

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[tokio::test]
async fn test_api_request_returns_body_unmodified() {
    let (transport, client) = setup();
    let body = json!({"data": [{"id": 1, "title": "Hello"}], "meta": {"total_count": 1}});
    transport.push_json(200, body.clone());

    let query = vec![("limit".to_string(), "1".to_string())];
    let result = client
        .api_request(HttpMethod::Get, "/items/articles", None, &query)
        .await
        .unwrap();

    assert_eq!(result, body);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "http://directus:8055/items/articles");
    assert_eq!(request.query, query);
    assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(request.headers.get(USER_AGENT).unwrap(), DIRECTUS_USER_AGENT);
    assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "Bearer static-token");
}

#[tokio::test]
async fn test_api_request_sends_json_body() {
    let (transport, client) = setup();
    transport.push_json(200, json!({"data": {"id": 7}}));

    client
        .api_request(
            HttpMethod::Post,
            "items/articles",
            Some(json!({"title": "x"})),
            &[],
        )
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.body, RequestBody::Json(json!({"title": "x"})));
}

#[tokio::test]
async fn test_trailing_slashes_yield_single_separator() {
    for base in ["http://cms.local", "http://cms.local/", "http://cms.local//"] {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(&transport, Some(Credentials::new(base)));
        transport.push_json(200, json!({}));

        client
            .api_request(HttpMethod::Get, "/server/info", None, &[])
            .await
            .unwrap();
        assert_eq!(transport.requests()[0].url, "http://cms.local/server/info");
    }
}

#[tokio::test]
async fn test_missing_token_sends_empty_bearer() {
    for token in [None, Some("")] {
        let transport = Arc::new(MockTransport::new());
        let mut credentials = Credentials::new("http://cms.local");
        credentials.access_token = token.map(str::to_string);
        let client = client_with(&transport, Some(credentials));
        transport.push_json(200, json!({}));

        client
            .api_request(HttpMethod::Get, "items/a", None, &[])
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].headers.get(AUTHORIZATION).unwrap(),
            "Bearer "
        );
    }
}

#[tokio::test]
async fn test_missing_credentials_fail_without_request() {
    let transport = Arc::new(MockTransport::new());
    let client = client_with(&transport, None);

    let err = client
        .api_request(HttpMethod::Get, "items/a", None, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DirectusError::CredentialsMissing { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_empty_url_counts_as_missing_credentials() {
    let transport = Arc::new(MockTransport::new());
    let client = client_with(&transport, Some(Credentials::new("")));

    let err = client
        .api_request(HttpMethod::Get, "items/a", None, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DirectusError::CredentialsMissing { .. }));
}

#[tokio::test]
async fn test_non_success_status_is_request_failed() {
    let (transport, client) = setup();
    transport.push_json(
        403,
        json!({"errors": [{"message": "You don't have permission to access this."}]}),
    );

    let err = client
        .api_request(HttpMethod::Get, "items/secret", None, &[])
        .await
        .unwrap_err();
    match err {
        DirectusError::RequestFailed(message) => {
            assert!(message.contains("403"));
            assert!(message.contains("permission"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_message_is_preserved() {
    let (transport, client) = setup();
    transport.push_failure("connection refused");

    let err = client
        .api_request(HttpMethod::Get, "items/a", None, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DirectusError::RequestFailed(_)));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_asset_request_combines_metadata_and_content() {
    let (transport, client) = setup();
    let metadata = json!({
        "id": "abc123",
        "filename_download": "photo.jpg",
        "type": "image/jpeg",
        "filesize": "4"
    });
    transport
        .push_json(200, json!({"data": metadata.clone()}))
        .push_bytes(200, vec![0xff, 0xd8, 0xff, 0xe0]);

    let result = client
        .asset_request(HttpMethod::Get, "abc123", "data", &[])
        .await
        .unwrap();

    assert_eq!(
        transport.request_lines(),
        ["GET /files/abc123", "GET /assets/abc123"]
    );
    let requests = transport.requests();
    assert_eq!(requests[0].response_encoding, ResponseEncoding::Json);
    assert_eq!(requests[1].response_encoding, ResponseEncoding::ArrayBuffer);

    assert_eq!(Value::Object(result.json), json!({"file": metadata}));
    let envelope = &result.binary["data"];
    assert_eq!(envelope.file_name.as_deref(), Some("photo.jpg"));
    assert_eq!(envelope.mime_type, "image/jpeg");
    assert_eq!(envelope.file_extension.as_deref(), Some("jpg"));
    assert_eq!(envelope.data, "/9j/4A==");
    assert_eq!(envelope.file_size, 4);
}

#[tokio::test]
async fn test_asset_request_fails_when_content_fetch_fails() {
    let (transport, client) = setup();
    transport
        .push_json(200, json!({"data": {"id": "abc123", "filename_download": "a.txt", "type": "text/plain"}}))
        .push_failure("socket hang up");

    let err = client
        .asset_request(HttpMethod::Get, "abc123", "data", &[])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("socket hang up"));
}

#[tokio::test]
async fn test_asset_request_stops_when_metadata_fetch_fails() {
    let (transport, client) = setup();
    transport.push_json(404, json!({"errors": [{"message": "Not found"}]}));

    let err = client
        .asset_request(HttpMethod::Get, "missing", "data", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DirectusError::RequestFailed(_)));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_asset_request_without_data_envelope_is_malformed() {
    let (transport, client) = setup();
    transport.push_json(200, json!({"id": "abc123"}));

    let err = client
        .asset_request(HttpMethod::Get, "abc123", "data", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DirectusError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_create_uploads_then_patches_metadata() {
    let (transport, client) = setup();
    let patched = json!({"data": {"id": "42", "title": "x", "description": "y"}});
    transport
        .push_json(200, json!({"data": {"id": "42", "title": "x"}}))
        .push_json(200, patched.clone());

    let form = FileForm::new()
        .with_field("title", "x")
        .with_file(FilePart::new(b"hello".to_vec(), "hello.txt").with_mime_type("text/plain"));
    let result = client
        .file_request(
            "files",
            FileChanges::create(form.clone(), object(json!({"description": "y"}))),
            &[],
        )
        .await
        .unwrap();

    assert_eq!(Value::Object(result), patched);
    assert_eq!(transport.request_lines(), ["POST /files", "PATCH /files/42"]);

    let requests = transport.requests();
    assert_eq!(requests[0].body, RequestBody::Multipart(form));
    assert_eq!(
        requests[0].headers.get(CONTENT_TYPE).unwrap(),
        "multipart/form-data"
    );
    assert_eq!(
        requests[1].body,
        RequestBody::Json(json!({"description": "y"}))
    );
    assert_eq!(
        requests[1].headers.get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_create_without_id_is_malformed() {
    let (transport, client) = setup();
    transport.push_json(200, json!({"data": {"title": "x"}}));

    let err = client
        .file_request(
            "files",
            FileChanges::create(FileForm::new().with_field("title", "x"), JsonObject::new()),
            &[],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DirectusError::MalformedResponse(_)));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_create_discards_upload_when_patch_fails() {
    let (transport, client) = setup();
    transport
        .push_json(200, json!({"data": {"id": "42"}}))
        .push_failure("connection reset by peer");

    let err = client
        .file_request(
            "files",
            FileChanges::create(FileForm::new().with_field("title", "x"), JsonObject::new()),
            &[],
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("connection reset by peer"));
}

#[tokio::test]
async fn test_update_with_form_only_skips_metadata_patch() {
    let (transport, client) = setup();
    transport.push_json(200, json!({"data": {"id": "42", "filename_download": "new.txt"}}));

    let form = FileForm::new().with_file(FilePart::new(b"new".to_vec(), "new.txt"));
    let result = client
        .file_request("files/42", FileChanges::update(form, JsonObject::new()), &[])
        .await
        .unwrap();

    assert_eq!(
        Value::Object(result),
        json!({"id": "42", "filename_download": "new.txt"})
    );
    assert_eq!(transport.request_lines(), ["PATCH /files"]);
}

#[tokio::test]
async fn test_update_with_both_runs_sequentially_and_merges() {
    let (transport, client) = setup();
    transport
        .push_json(200, json!({"data": {"id": "42", "title": "old"}}))
        .push_json(200, json!({"data": [{"id": "42", "title": "new"}]}));

    let result = client
        .file_request(
            "files/42",
            FileChanges::update(
                FileForm::new().with_field("title", "old"),
                object(json!({"keys": ["42"], "data": {"title": "new"}})),
            ),
            &[],
        )
        .await
        .unwrap();

    assert_eq!(transport.request_lines(), ["PATCH /files", "PATCH /files"]);
    assert_eq!(
        Value::Object(result),
        json!({"id": "42", "title": "old", "data": [{"id": "42", "title": "new"}]})
    );
}

#[tokio::test]
async fn test_update_with_nothing_makes_no_call() {
    let (transport, client) = setup();

    let result = client
        .file_request(
            "files",
            FileChanges::update(FileForm::new(), JsonObject::new()),
            &[],
        )
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_raw_entry_point_dispatches_on_method() {
    let (transport, client) = setup();
    transport.push_json(200, json!({"data": {"id": "42"}}));

    let result = client
        .file_request_raw(
            HttpMethod::Patch,
            "files",
            FileForm::new(),
            object(json!({"title": "t"})),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(Value::Object(result), json!({"data": {"id": "42"}}));
    assert_eq!(transport.request_lines(), ["PATCH /files"]);

    let ignored = client
        .file_request_raw(
            HttpMethod::Get,
            "files",
            FileForm::new().with_field("title", "t"),
            JsonObject::new(),
            &[],
        )
        .await
        .unwrap();
    assert!(ignored.is_empty());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_multipart_response_that_is_not_json_is_malformed() {
    let (transport, client) = setup();
    transport.push_bytes(200, "<html>gateway</html>");

    let err = client
        .file_request(
            "files",
            FileChanges::update(FileForm::new().with_field("title", "x"), JsonObject::new()),
            &[],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DirectusError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_connectivity_check_is_advisory() {
    let (transport, client) = setup();
    transport.push_json(200, json!({"data": {"id": "me"}}));
    assert_eq!(client.check_connectivity().await, ConnectivityStatus::Ok);
    assert_eq!(transport.request_lines(), ["GET /users/me"]);

    transport.push_json(401, json!({"errors": [{"message": "Invalid user credentials."}]}));
    match client.check_connectivity().await {
        ConnectivityStatus::Failed(reason) => assert!(reason.contains("401")),
        ConnectivityStatus::Ok => panic!("expected failure"),
    }
}

#[tokio::test]
async fn test_trait_object_maps_error_kinds() {
    let transport = Arc::new(MockTransport::new());
    let api: Arc<dyn DirectusApi> = Arc::new(client_with(&transport, None));

    let err = api
        .api_request(HttpMethod::Get, "items/a", None, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientApiError::CredentialsMissing(name) if name == CREDENTIAL_NAME));

    let (transport, client) = setup();
    transport.push_failure("boom");
    let api: Arc<dyn DirectusApi> = Arc::new(client);
    let err = api
        .asset_request(HttpMethod::Get, "abc", "data", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientApiError::RequestFailed(message) if message.contains("boom")));
}
