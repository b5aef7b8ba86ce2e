//! Integration tests for `InstagramClient` using wiremock HTTP mocks.

use creatorfit_core::InstagramAppConfig;
use creatorfit_oauth::{InstagramClient, OAuthError};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> InstagramClient {
    let app = InstagramAppConfig {
        client_id: "client-123".to_string(),
        client_secret: "shh".to_string(),
        redirect_uri: "https://creatorfit.example/auth/instagram/callback".to_string(),
    };
    InstagramClient::with_base_url(app, 5, base_url).expect("client construction should not fail")
}

#[tokio::test]
async fn exchange_code_posts_form_and_parses_flat_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("client_id=client-123"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "IGQV-token",
            "user_id": 17_841_400_000_u64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let token = client
        .exchange_code("the-code#_")
        .await
        .expect("exchange should succeed");

    assert_eq!(token.access_token, "IGQV-token");
    assert_eq!(token.user_id, "17841400000");
}

#[tokio::test]
async fn exchange_code_parses_wrapped_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "access_token": "IGAA-token",
                "user_id": "9001",
                "permissions": "instagram_business_basic"
            }]
        })))
        .mount(&server)
        .await;

    let token = test_client(&server.uri())
        .exchange_code("c")
        .await
        .expect("exchange should succeed");

    assert_eq!(token.access_token, "IGAA-token");
    assert_eq!(token.user_id, "9001");
    assert_eq!(token.permissions, vec!["instagram_business_basic".to_string()]);
}

#[tokio::test]
async fn rejected_code_surfaces_instagram_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_type": "OAuthException",
            "code": 400,
            "error_message": "This authorization code has been used"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .exchange_code("used")
        .await
        .expect_err("should fail");

    match err {
        OAuthError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "This authorization code has been used");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_profile_requests_fields_with_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(query_param("fields", "id,username,account_type,media_count"))
        .and(query_param("access_token", "IGQV-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "17841400000",
            "username": "jiwoo.eats",
            "account_type": "CREATOR",
            "media_count": 312
        })))
        .mount(&server)
        .await;

    let profile = test_client(&server.uri())
        .fetch_profile("IGQV-token")
        .await
        .expect("profile should parse");

    assert_eq!(profile.id, "17841400000");
    assert_eq!(profile.username.as_deref(), Some("jiwoo.eats"));
    assert_eq!(profile.account_type.as_deref(), Some("CREATOR"));
    assert_eq!(profile.media_count, Some(312));
}

#[tokio::test]
async fn fetch_profile_tolerates_missing_optional_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1" })))
        .mount(&server)
        .await;

    let profile = test_client(&server.uri())
        .fetch_profile("t")
        .await
        .expect("profile should parse");

    assert_eq!(profile.id, "1");
    assert!(profile.username.is_none());
    assert!(profile.media_count.is_none());
}

#[tokio::test]
async fn expired_token_maps_graph_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Error validating access token", "type": "OAuthException", "code": 190 }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_profile("stale")
        .await
        .expect_err("should fail");

    assert!(
        matches!(err, OAuthError::Api { status: 401, ref message } if message == "Error validating access token"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_profile("t")
        .await
        .expect_err("should fail");
    assert!(matches!(err, OAuthError::Deserialize { .. }), "got: {err:?}");
}
