//! End-to-end pipeline tests against wiremock stand-ins for both providers.

use coldmail_apify::{ApifyClient, ApifyError};
use coldmail_core::{GenerationResult, ReferenceKind};
use coldmail_generation::{word_count, OpenAiClient, MAX_WORDS};
use coldmail_pipeline::{Pipeline, PipelineError, ResultCache};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PATH: &str = "/v2/acts/profile-actor/run-sync-get-dataset-items";
const COMPANY_PATH: &str = "/v2/acts/company-actor/run-sync-get-dataset-items";
const RESPONSES_PATH: &str = "/responses";

const JANE_EMAIL: &str = "Saw that you're building backend services at Acme with Node.js and \
MongoDB. Teams running that stack often lose hours to meeting follow-ups and scattered notes. \
Our AI meeting notetaker joins your calls, captures decisions and action items, and drops clean \
summaries into the tools you already use. Would it be worth a quick look to see if it saves your \
team time?";

fn pipeline(server: &MockServer, cache: ResultCache) -> Pipeline {
    let retriever = ApifyClient::with_base_url("apify-test", 5, &server.uri())
        .expect("apify client")
        .with_actors("profile-actor", "company-actor");
    let generator = OpenAiClient::with_base_url("sk-test", 5, &server.uri()).expect("openai client");
    Pipeline::new(retriever, generator, cache)
}

fn reply(text: &str) -> Value {
    json!({
        "output": [{
            "type": "message",
            "content": [{ "type": "output_text", "text": text }]
        }]
    })
}

async fn mount_jane(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "fullName": "Jane Doe",
            "headline": "Backend Engineer at Acme",
            "jobTitle": "Backend Engineer",
            "companyName": "Acme",
            "skills": ["Node.js", "MongoDB"]
        }])))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn individual_reference_produces_personalized_email() {
    let server = MockServer::start().await;
    mount_jane(&server).await;
    Mock::given(method("POST"))
        .and(path(RESPONSES_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply(&json!({ "email": JANE_EMAIL }).to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = ResultCache::new();
    let pipeline = pipeline(&server, cache.clone());
    let generated = pipeline
        .run("/in/jane-doe", "AI meeting notetaker")
        .await
        .expect("pipeline should succeed");

    assert_eq!(generated.profile.kind, ReferenceKind::Individual);
    assert_eq!(generated.profile.name, "Jane Doe");
    let email = &generated.result.email;
    assert!(email.contains("Node.js") && email.contains("Acme"));
    assert!(!email.starts_with("Hi"));
    assert!(word_count(email) <= MAX_WORDS);
    assert_eq!(cache.fetch_last(), Some(generated.result.clone()));

    let requests = server.received_requests().await.unwrap();
    let generation = requests
        .iter()
        .find(|r| r.url.path() == RESPONSES_PATH)
        .expect("generation request sent");
    let body: Value = serde_json::from_slice(&generation.body).unwrap();
    let prompt = body["input"].as_str().unwrap();
    assert!(prompt.contains("an individual professional"));
    assert!(prompt.contains("Node.js"));
    assert!(prompt.contains("- Employer: Acme"));
    assert!(prompt.contains("AI meeting notetaker"));
}

#[tokio::test]
async fn unknown_organization_fails_retrieval_and_leaves_cache_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPANY_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RESPONSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(r#"{"email": "x"}"#)))
        .expect(0)
        .mount(&server)
        .await;

    let cache = ResultCache::new();
    let earlier = GenerationResult {
        email: "An earlier message.".to_string(),
    };
    cache.store(earlier.clone());

    let err = pipeline(&server, cache.clone())
        .run_pipeline("/company/unknown-co", "Payroll API")
        .await
        .unwrap_err();

    assert!(
        matches!(err, PipelineError::Retrieval(ApifyError::NotFound { .. })),
        "expected Retrieval(NotFound), got: {err:?}"
    );
    assert_eq!(err.step(), "fetch");
    assert_eq!(cache.fetch_last(), Some(earlier));
}

#[tokio::test]
async fn prose_wrapped_reply_still_succeeds() {
    let server = MockServer::start().await;
    mount_jane(&server).await;
    Mock::given(method("POST"))
        .and(path(RESPONSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(
            r#"Here is your email: {"email": "Saw your Node.js work at Acme. Worth a chat?"}"#,
        )))
        .mount(&server)
        .await;

    let pipeline = pipeline(&server, ResultCache::new());
    let result = pipeline
        .run_pipeline("https://www.linkedin.com/in/jane-doe/", "AI meeting notetaker")
        .await
        .expect("repair should recover the object");

    assert_eq!(result.email, "Saw your Node.js work at Acme. Worth a chat?");
    assert_eq!(pipeline.last_result(), Some(result));
}

#[tokio::test]
async fn invalid_inputs_make_no_outbound_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = pipeline(&server, ResultCache::new());

    let err = pipeline
        .run("linkedin.com/jane", "AI meeting notetaker")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidReference { .. }));
    assert_eq!(err.step(), "validation");

    let err = pipeline.run("/in/jane-doe", "   ").await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidProduct(_)));

    let err = pipeline
        .run("/in/jane-doe", &"x".repeat(201))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidProduct(_)));
    assert_eq!(pipeline.last_result(), None);
}

#[tokio::test]
async fn unusable_reply_is_a_format_error() {
    let server = MockServer::start().await;
    mount_jane(&server).await;
    Mock::given(method("POST"))
        .and(path(RESPONSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("I'd rather not.")))
        .mount(&server)
        .await;

    let pipeline = pipeline(&server, ResultCache::new());
    let err = pipeline
        .run("/in/jane-doe", "AI meeting notetaker")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::GenerationFormat(_)));
    assert_eq!(err.user_message(), "No email was generated. Please try again.");
    assert_eq!(pipeline.last_result(), None);
}

#[tokio::test]
async fn service_outage_is_a_generation_service_error() {
    let server = MockServer::start().await;
    mount_jane(&server).await;
    Mock::given(method("POST"))
        .and(path(RESPONSES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = pipeline(&server, ResultCache::new())
        .run("/in/jane-doe", "AI meeting notetaker")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::GenerationService(_)));
}
