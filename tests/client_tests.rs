use std::sync::Arc;
use templating_client::mock::{MockResponse, MockTransport};
use templating_client::{Config, MediaType, Method, TemplatingClient, TemplatingError};

const BASE_URL: &str = "http://localhost.com";
const TOKEN_URL: &str =
    "http://localhost.com/auth/realms/micro-keycloak/protocol/openid-connect/token";

/// Generate random artifact bytes of specified size
fn generate_test_data(size: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut data = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

fn config() -> Config {
    Config::new(BASE_URL, TOKEN_URL, "template-client-id", "this-is-secret")
        .with_scope("content-provider-scope")
        .with_debug(true)
}

fn client_with(responses: Vec<MockResponse>) -> (TemplatingClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::with_responses(responses));
    let client = TemplatingClient::with_transport(config(), Arc::clone(&transport))
        .expect("failed to create client");
    (client, transport)
}

#[test]
fn test_fetch_example_sets_accept_for_every_media_type() {
    for media_type in MediaType::ALL {
        let (client, transport) = client_with(vec![
            MockResponse::token("abcvdef"),
            MockResponse::ok_with_body("artifact"),
        ]);

        client
            .fetch_example("template-id", media_type)
            .expect("fetch_example failed");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://localhost.com/template/template-id/example");
        assert_eq!(request.header("Accept"), Some(media_type.mime()));
        assert_eq!(request.header("Authorization"), Some("Bearer abcvdef"));
        assert!(request.body.is_none());
    }
}

#[test]
fn test_fetch_example_returns_bytes_unmodified() {
    let artifact = generate_test_data(20);
    let (client, _) = client_with(vec![
        MockResponse::token("abcvdef"),
        MockResponse::ok_with_body(artifact.clone()),
    ]);

    let response = client
        .fetch_example("template-id", MediaType::Html)
        .expect("fetch_example failed");

    assert_eq!(response.len(), 20);
    assert_eq!(response, artifact);
}

#[test]
fn test_list_templates() {
    let listing = serde_json::json!({
        "template_schema": "value",
        "field1": "value1",
        "field2": "value2",
    })
    .to_string();
    let (client, transport) = client_with(vec![
        MockResponse::token("abcvdef"),
        MockResponse::ok_with_body(listing),
    ]);

    let response = client.list_templates().expect("list_templates failed");
    assert!(response.contains("template_schema"));

    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "http://localhost.com/templates/");
    let names: Vec<&str> = request.headers.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Authorization"]);
}

#[test]
fn test_compose_sends_payload_verbatim() {
    let artifact = generate_test_data(30);
    let (client, transport) = client_with(vec![
        MockResponse::token("abcvdef"),
        MockResponse::ok_with_body(artifact.clone()),
    ]);

    // Not valid JSON on purpose: the payload is the service's to validate
    let payload = r#"{"recipient_name": "Subject 37", "certificate_number": "C12345""#;
    let response = client
        .compose("template-id", MediaType::Pdf, payload)
        .expect("compose failed");

    assert_eq!(response, artifact);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "http://localhost.com/template/template-id/compose");
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.header("Accept"), Some("application/pdf"));
    assert_eq!(request.body.as_deref(), Some(payload.as_bytes()));
}

#[test]
fn test_refresh_and_retry_succeeds() {
    let payload = generate_test_data(16);
    let (client, transport) = client_with(vec![
        MockResponse::token("abcvdef"),
        MockResponse::error(401, ""),
        MockResponse::token("ghijkl"),
        MockResponse::ok_with_body(payload.clone()),
    ]);

    let response = client
        .fetch_example("template-id", MediaType::Png)
        .expect("retry should succeed");

    assert_eq!(response, payload);
    assert_eq!(transport.request_count(), 4);

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls[0], TOKEN_URL);
    assert_eq!(urls[2], TOKEN_URL);
    assert_eq!(urls[1], urls[3]);
}

#[test]
fn test_second_rejection_is_terminal() {
    let (client, transport) = client_with(vec![
        MockResponse::token("abcvdef"),
        MockResponse::error(401, ""),
        MockResponse::token("abcvdef"),
        MockResponse::error(401, ""),
        MockResponse::ok_with_body("must not be reached"),
    ]);

    let err = client
        .fetch_example("template-id", MediaType::Html)
        .unwrap_err();

    assert!(matches!(err, TemplatingError::Service { status: 401, .. }));
    assert_eq!(
        err.to_string(),
        "failed to access templating service with http status: 401"
    );

    let service_calls = transport
        .requests()
        .iter()
        .filter(|r| r.url != TOKEN_URL)
        .count();
    assert_eq!(service_calls, 2);
    assert_eq!(transport.request_count(), 4);
}

#[test]
fn test_transport_failure_on_retry_is_terminal() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::token("abcvdef"),
        MockResponse::error(401, ""),
        MockResponse::token("ghijkl"),
    ]));
    transport.queue_failure("connection reset by peer");
    transport.queue_response(MockResponse::ok_with_body("must not be reached"));
    let client = TemplatingClient::with_transport(config(), Arc::clone(&transport)).unwrap();

    let err = client
        .fetch_example("template-id", MediaType::Pdf)
        .unwrap_err();

    assert!(matches!(err, TemplatingError::Transport { .. }), "got {:?}", err);
    assert_eq!(transport.request_count(), 4);
}

#[test]
fn test_template_id_stays_in_one_path_segment() {
    let (client, transport) = client_with(vec![
        MockResponse::token("abcvdef"),
        MockResponse::ok_with_body("artifact"),
        MockResponse::ok_with_body("artifact"),
    ]);

    client.fetch_example("cert?v=2", MediaType::Pdf).unwrap();
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://localhost.com/template/cert%3Fv=2/example"
    );

    client.compose("a/b", MediaType::Pdf, "{}").unwrap();
    assert_eq!(
        transport.last_request().unwrap().url,
        "http://localhost.com/template/a%2Fb/compose"
    );
}

#[test]
fn test_empty_token_response_fails_first_use() {
    let (client, _) = client_with(vec![MockResponse::ok_with_body("")]);

    let err = client.list_templates().unwrap_err();
    assert!(err.is_authentication());
    assert!(err.to_string().contains("no token obtainable"));
}

#[test]
fn test_empty_token_response_fails_eager_construction() {
    let transport = MockTransport::with_responses(vec![MockResponse::ok_with_body("")]);
    let result = TemplatingClient::with_transport(config().with_eager_auth(true), transport);

    match result {
        Err(err) => assert!(err.to_string().contains("no token obtainable")),
        Ok(_) => panic!("expected construction to fail"),
    }
}

#[test]
fn test_token_cached_across_calls() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::token(
        "abcvdef",
    )]));
    for _ in 0..2 {
        transport.queue_response(MockResponse::ok_with_body("[]"));
    }
    let client = TemplatingClient::with_transport(config(), Arc::clone(&transport)).unwrap();

    client.list_templates().expect("first call failed");
    client.list_templates().expect("second call failed");

    let token_requests = transport
        .requests()
        .iter()
        .filter(|r| r.url == TOKEN_URL)
        .count();
    assert_eq!(token_requests, 1);
    assert_eq!(transport.request_count(), 3);
}

#[test]
fn test_token_request_shape() {
    let (client, transport) = client_with(vec![
        MockResponse::token("abcvdef"),
        MockResponse::ok_with_body("[]"),
    ]);
    client.list_templates().unwrap();

    let token_request = &transport.requests()[0];
    assert_eq!(token_request.method, Method::Post);
    assert_eq!(token_request.header("Accept"), Some("application/json"));
    assert_eq!(
        token_request.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        token_request.body_text().unwrap(),
        "client_id=template-client-id&client_secret=this-is-secret\
         &grant_type=client_credentials&scope=content-provider-scope"
    );
}
