use std::time::Duration;

use pretty_assertions::assert_eq;
use preview_engine::{
    ClientSettings, ErrorReport, FailureKind, FixResult, GenerationApi, GenerationResult,
    ReqwestGenerationApi,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestGenerationApi {
    ReqwestGenerationApi::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn generate_sends_encoded_prompt_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generate"))
        .and(query_param("prompt", "a todo app & more?"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "preview_url": "https://host/abc123" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = api_for(&server)
        .generate("a todo app & more?")
        .await
        .expect("generate ok");
    assert_eq!(
        result,
        GenerationResult::Preview {
            preview_url: "https://host/abc123".to_string()
        }
    );
}

#[tokio::test]
async fn generate_maps_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "X" })))
        .mount(&server)
        .await;

    let result = api_for(&server).generate("counter").await.expect("generate ok");
    assert_eq!(result, GenerationResult::Error("X".to_string()));
}

#[tokio::test]
async fn generate_without_known_fields_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let result = api_for(&server).generate("counter").await.expect("generate ok");
    assert_eq!(result, GenerationResult::Unexpected);
}

#[tokio::test]
async fn generate_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api_for(&server).generate("counter").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn generate_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).generate("counter").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn generate_reports_network_failure() {
    // Nothing listens on port 1, so the connection is refused.
    let api = ReqwestGenerationApi::new(ClientSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        connect_timeout: Duration::from_millis(500),
        request_timeout: None,
    })
    .expect("client");
    let err = api.generate("counter").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

#[tokio::test]
async fn generate_times_out_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "preview_url": "https://host/slow" })),
        )
        .mount(&server)
        .await;

    let api = ReqwestGenerationApi::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::default()
    })
    .expect("client");
    let err = api.generate("counter").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn report_error_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report-error"))
        .and(body_json(json!({
            "errorMessage": "TypeError: x is undefined",
            "prompt": "todo app"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "fixed_code": "export default App;" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = ErrorReport {
        error_message: "TypeError: x is undefined".to_string(),
        prompt: "todo app".to_string(),
    };
    let fix = api_for(&server).report_error(&report).await.expect("report ok");
    assert_eq!(fix, FixResult::FixedCode("export default App;".to_string()));
}

#[tokio::test]
async fn report_error_maps_error_and_empty_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report-error"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "cannot fix" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/report-error"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let report = ErrorReport {
        error_message: "boom".to_string(),
        prompt: "todo app".to_string(),
    };
    assert_eq!(
        api.report_error(&report).await.expect("first report"),
        FixResult::Error("cannot fix".to_string())
    );
    assert_eq!(
        api.report_error(&report).await.expect("second report"),
        FixResult::Empty
    );
}

#[tokio::test]
async fn report_error_reads_body_of_failed_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report-error"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "cannot fix" })))
        .mount(&server)
        .await;

    let report = ErrorReport {
        error_message: "boom".to_string(),
        prompt: "todo app".to_string(),
    };
    let fix = api_for(&server).report_error(&report).await.expect("report ok");
    assert_eq!(fix, FixResult::Error("cannot fix".to_string()));
}

#[tokio::test]
async fn report_error_without_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report-error"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let report = ErrorReport {
        error_message: "boom".to_string(),
        prompt: "todo app".to_string(),
    };
    let err = api_for(&server).report_error(&report).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn load_frame_accepts_any_http_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/embed/abc123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let url = format!("{}/embed/abc123", server.uri());
    api.load_frame(&url).await.expect("frame loaded");

    let err = api.load_frame("not a url").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
