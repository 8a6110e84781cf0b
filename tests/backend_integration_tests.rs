use pollcall::api::{ApiError, Backend, HttpBackend};
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri())
}

// ============================================================================
// Admin Write Tests
// ============================================================================

#[tokio::test]
async fn test_set_form_key_posts_form_key_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/formmethod"))
        .and(body_string("form_key=key123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server).set_form_key("key123").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_add_user_posts_add_email_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/usermethod"))
        .and(body_string("add_email=caller%40example.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server).add_user("caller@example.com").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_user_posts_delete_email_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/usermethod"))
        .and(body_string("delete_email=caller%40example.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server)
        .delete_user("caller@example.com")
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_record_outcome_posts_number_and_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/phonenumbers"))
        .and(body_string("phone_number=555-0100&contact_response=no+answer"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server)
        .record_outcome("555-0100", "no answer")
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_upload_numbers_posts_csv_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin"))
        .and(body_string("phone-number-csv=5550100%0A5550101"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server)
        .upload_numbers("5550100\n5550101")
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_write_rejection_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/formmethod"))
        .respond_with(ResponseTemplate::new(403).set_body_string("not an admin"))
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server).set_form_key("key123").await;
    assert!(matches!(result, Err(ApiError::Api { status: 403, .. })));
}

// ============================================================================
// Number Pool Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_number_parses_string_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/phonenumbers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"phone_number": "555-1234"}"#))
        .mount(&mock_server)
        .await;

    let assignment = backend(&mock_server).fetch_number().await.unwrap();
    assert_eq!(assignment.unwrap().phone_number, "555-1234");
}

#[tokio::test]
async fn test_fetch_number_parses_integer_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/phonenumbers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"phone_number": 2525550199}"#))
        .mount(&mock_server)
        .await;

    let assignment = backend(&mock_server).fetch_number().await.unwrap();
    assert_eq!(assignment.unwrap().phone_number, "2525550199");
}

#[tokio::test]
async fn test_fetch_number_empty_body_means_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/phonenumbers"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let assignment = backend(&mock_server).fetch_number().await.unwrap();
    assert!(assignment.is_none());
}

#[tokio::test]
async fn test_fetch_number_exhausted_marker_means_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/phonenumbers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"no number\""))
        .mount(&mock_server)
        .await;

    let assignment = backend(&mock_server).fetch_number().await.unwrap();
    assert!(assignment.is_none());
}

#[tokio::test]
async fn test_fetch_number_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/phonenumbers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server).fetch_number().await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_fetch_number_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/phonenumbers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("datastore down"))
        .mount(&mock_server)
        .await;

    let result = backend(&mock_server).fetch_number().await;
    assert!(matches!(result, Err(ApiError::Api { status: 500, .. })));
}

// ============================================================================
// Form Key Read Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_form_key_returns_stored_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/formmethod"))
        .respond_with(ResponseTemplate::new(200).set_body_string("key123"))
        .mount(&mock_server)
        .await;

    let key = backend(&mock_server).fetch_form_key().await.unwrap();
    assert_eq!(key.as_deref(), Some("key123"));
}

#[tokio::test]
async fn test_fetch_form_key_missing_is_none() {
    let mock_server = MockServer::start().await;

    // The backend answers 400 when no key has been stored yet.
    Mock::given(method("GET"))
        .and(path("/formmethod"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    let key = backend(&mock_server).fetch_form_key().await.unwrap();
    assert!(key.is_none());
}

#[tokio::test]
async fn test_fetch_form_key_empty_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/formmethod"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
        .mount(&mock_server)
        .await;

    let key = backend(&mock_server).fetch_form_key().await.unwrap();
    assert!(key.is_none());
}
