use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use coldmail_apify::ApifyClient;
use coldmail_generation::OpenAiClient;
use coldmail_pipeline::ResultCache;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PATH: &str = "/v2/acts/profile-actor/run-sync-get-dataset-items";
const COMPANY_PATH: &str = "/v2/acts/company-actor/run-sync-get-dataset-items";

fn app_for(base_url: &str) -> Router {
    let retriever = ApifyClient::with_base_url("apify-test", 5, base_url)
        .expect("apify client")
        .with_actors("profile-actor", "company-actor");
    let generator = OpenAiClient::with_base_url("sk-test", 5, base_url).expect("openai client");
    let pipeline = Pipeline::new(retriever, generator, ResultCache::new());
    build_app(AppState {
        pipeline: Arc::new(pipeline),
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("invalid_reference", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("profile_not_found", StatusCode::NOT_FOUND),
        ("provider_timeout", StatusCode::GATEWAY_TIMEOUT),
        ("generation_unavailable", StatusCode::BAD_GATEWAY),
        ("generation_format", StatusCode::BAD_GATEWAY),
        ("something_else", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn health_echoes_request_id() {
    let app = app_for("http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-42"
    );
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-42");
}

#[tokio::test]
async fn validate_url_reports_kind_and_identifier() {
    let app = app_for("http://127.0.0.1:9");
    let response = app
        .oneshot(post_json(
            "/api/validate-url",
            &json!({ "url": "https://www.linkedin.com/company/acme/" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["kind"], "organization");
    assert_eq!(json["data"]["identifier"], "acme");
}

#[tokio::test]
async fn validate_url_explains_invalid_shapes() {
    let app = app_for("http://127.0.0.1:9");
    let response = app
        .oneshot(post_json("/api/validate-url", &json!({ "url": "example.com/jane" })))
        .await
        .expect("response");

    let json = json_body(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["kind"], "invalid");
    assert!(json["data"].get("identifier").is_none());
    assert!(json["data"]["message"].as_str().unwrap().contains("/in/"));
}

#[tokio::test]
async fn get_result_before_any_generation_is_not_found() {
    let app = app_for("http://127.0.0.1:9");
    let response = app.oneshot(get_request("/api/get-result")).await.expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(
        json["error"]["message"],
        "No result found. Please generate an email first."
    );
}

#[tokio::test]
async fn generate_rejects_invalid_reference_with_validation_step() {
    let app = app_for("http://127.0.0.1:9");
    let response = app
        .oneshot(post_json(
            "/api/generate",
            &json!({ "url": "not-a-profile", "product_description": "Payroll API" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "invalid_reference");
    assert_eq!(json["error"]["step"], "validation");
}

#[tokio::test]
async fn generate_rejects_missing_product_description() {
    let app = app_for("http://127.0.0.1:9");
    let response = app
        .oneshot(post_json("/api/generate", &json!({ "url": "/in/jane-doe" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["message"], "Product description is required");
}

#[tokio::test]
async fn generate_reports_unknown_profile_as_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPANY_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    let response = app
        .oneshot(post_json(
            "/api/generate",
            &json!({ "url": "/company/unknown-co", "product_description": "Payroll API" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "profile_not_found");
    assert_eq!(json["error"]["step"], "fetch");
}

#[tokio::test]
async fn generate_then_get_result_returns_the_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "fullName": "Jane Doe",
            "headline": "Backend Engineer at Acme",
            "companyName": "Acme"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": [{
                "type": "message",
                "content": [{
                    "type": "output_text",
                    "text": "{\"email\": \"Saw your work at Acme. Worth a chat?\"}"
                }]
            }]
        })))
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/generate",
            &json!({ "url": "/in/jane-doe", "product_description": "AI meeting notetaker" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["email"], "Saw your work at Acme. Worth a chat?");
    assert_eq!(json["data"]["profile"]["name"], "Jane Doe");
    assert_eq!(json["data"]["profile"]["kind"], "individual");

    let response = app.oneshot(get_request("/api/get-result")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(
        json["data"],
        json!({ "email": "Saw your work at Acme. Worth a chat?" })
    );
}
