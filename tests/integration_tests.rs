//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: scope → first request → nextLink chain →
//! aggregated items, through the real `reqwest` transport.

use clap::Parser;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use resource_pager::cli::{Cli, Runner};
use resource_pager::http::{HttpClient, HttpClientConfig};
use resource_pager::types::BackoffType;
use resource_pager::{
    CallContext, ClientConfig, ErrorKind, FieldPredicate, ListClient, ListOptions, PageStage,
    ProviderCollection, RequestStage, ScopeId,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_VERSION: &str = "2020-10-15-preview";
const LIST_PATH: &str =
    "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.EventGrid/partnerRegistrations";

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Registration {
    name: String,
}

fn transport() -> Arc<HttpClient> {
    let config = HttpClientConfig::builder()
        .max_retries(0)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(10),
        )
        .build();
    Arc::new(HttpClient::with_config(config).unwrap())
}

fn client<T: serde::de::DeserializeOwned + 'static>(server: &MockServer) -> ListClient<T> {
    ListClient::new(
        transport(),
        &server.uri(),
        ProviderCollection::new("Microsoft.EventGrid", "partnerRegistrations"),
    )
    .unwrap()
    .with_api_version(API_VERSION)
    .with_operation("PartnerRegistrations.ListByResourceGroup")
}

fn scope() -> ScopeId {
    ScopeId::parse_known("/subscriptions/sub-1/resourceGroups/rg-1").unwrap()
}

fn names(items: &[Value]) -> Vec<&str> {
    items.iter().filter_map(|i| i["name"].as_str()).collect()
}

/// Two pages: [A, B] then [C], linked through an absolute nextLink on a
/// foreign host
async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("api-version", API_VERSION))
        .and(query_param("$filter", "name eq 'foo'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "A"}, {"name": "B"}],
            "nextLink": "https://h/x?api-version=v&$skiptoken=t1"
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/x"))
        .and(query_param("api-version", "v"))
        .and(query_param("$skiptoken", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "C"}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn filtered() -> ListOptions {
    ListOptions::new().with_filter("name eq 'foo'")
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_collect_all_follows_next_link() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let result = client::<Value>(&server)
        .collect_all(&CallContext::new(), &scope(), &filtered())
        .await
        .unwrap();

    assert_eq!(names(&result.items), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_collect_all_matching_typed_items() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let only_b = |r: &Registration| r.name == "B";
    let result = client::<Registration>(&server)
        .collect_all_matching(&CallContext::new(), &scope(), &filtered(), &only_b)
        .await
        .unwrap();

    assert_eq!(
        result.into_items(),
        vec![Registration { name: "B".into() }]
    );
}

#[tokio::test]
async fn test_collect_with_field_predicate() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let predicate = FieldPredicate::parse("name=C").unwrap();
    let result = client::<Value>(&server)
        .collect_all_matching(&CallContext::new(), &scope(), &filtered(), &predicate)
        .await
        .unwrap();

    assert_eq!(names(&result.items), vec!["C"]);
}

#[tokio::test]
async fn test_single_page_listing_sends_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("$top", "2"))
        .and(query_param_is_missing("$filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "A"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client::<Value>(&server)
        .collect_all(&CallContext::new(), &scope(), &ListOptions::new().with_top(2))
        .await
        .unwrap();

    assert_eq!(names(&result.items), vec!["A"]);
}

#[tokio::test]
async fn test_concurrent_listings_share_a_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "A"}],
            "nextLink": format!("{}/more?t=1", server.uri())
        })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/more"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "B"}]})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client::<Value>(&server);
    let ctx = CallContext::new();
    let scope = scope();
    let options = ListOptions::new();

    let (first, second) = tokio::join!(
        client.collect_all(&ctx, &scope, &options),
        client.collect_all(&ctx, &scope, &options)
    );

    assert_eq!(names(&first.unwrap().items), vec!["A", "B"]);
    assert_eq!(names(&second.unwrap().items), vec!["A", "B"]);
}

// ============================================================================
// Pager
// ============================================================================

#[tokio::test]
async fn test_manual_paging() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = client::<Value>(&server);
    let ctx = CallContext::new();

    let first = client
        .fetch_first_page(&ctx, &scope(), &filtered())
        .await
        .unwrap();
    assert!(client.has_more(&first));
    assert_eq!(names(&first.items), vec!["A", "B"]);

    let second = client.load_more(&ctx, &first).await.unwrap();
    assert!(!client.has_more(&second));
    assert_eq!(names(&second.items), vec!["C"]);

    let err = client.load_more(&ctx, &second).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Logic);
}

#[tokio::test]
async fn test_continuation_query_is_replayed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [],
            "nextLink": "/continue?a=1&b=2"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/continue"))
        .and(query_param("a", "1"))
        .and(query_param("b", "2"))
        .and(query_param_is_missing("api-version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "Z"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client::<Value>(&server)
        .collect_all(&CallContext::new(), &scope(), &ListOptions::new())
        .await
        .unwrap();

    assert_eq!(names(&result.items), vec!["Z"]);
}

#[tokio::test]
async fn test_continuation_under_base_path() {
    let server = MockServer::start().await;
    let list_path = format!("/mgmt{LIST_PATH}");

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .and(query_param("api-version", API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "A"}],
            "nextLink": format!("{}{list_path}?$skiptoken=t1", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .and(query_param("$skiptoken", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "B"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ListClient::<Value>::new(
        transport(),
        &format!("{}/mgmt/", server.uri()),
        ProviderCollection::new("Microsoft.EventGrid", "partnerRegistrations"),
    )
    .unwrap()
    .with_api_version(API_VERSION);

    let result = client
        .collect_all(&CallContext::new(), &scope(), &ListOptions::new())
        .await
        .unwrap();

    assert_eq!(names(&result.items), vec!["A", "B"]);
}

#[tokio::test]
async fn test_item_stream() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = client::<Registration>(&server);
    let ctx = CallContext::new();
    let scope = scope();
    let options = filtered();

    let items: Vec<Registration> = client
        .items(&ctx, &scope, &options)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[2].name, "C");
}

// ============================================================================
// Failure attribution
// ============================================================================

#[tokio::test]
async fn test_initial_page_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"NotFound"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let err = client::<Value>(&server)
        .collect_all(&CallContext::new(), &scope(), &ListOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Response);
    assert_eq!(err.page_stage(), Some(PageStage::InitialPage));
    assert_eq!(err.request_stage(), Some(RequestStage::RespondingToRequest));
    assert_eq!(err.response_body(), Some(r#"{"error":"NotFound"}"#));
    assert!(err.to_string().starts_with(
        "loading the initial page: PartnerRegistrations.ListByResourceGroup: failure responding to request"
    ));
}

#[tokio::test]
async fn test_next_page_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "A"}],
            "nextLink": "/broken?t=1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client::<Value>(&server)
        .collect_all(&CallContext::new(), &scope(), &ListOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Response);
    assert_eq!(err.page_stage(), Some(PageStage::NextPage));
    assert_eq!(err.response_body(), Some("not json"));
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"value": []}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let ctx = CallContext::new();
    let token = ctx.cancellation_token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = client::<Value>(&server)
        .collect_all(&ctx, &scope(), &ListOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.page_stage(), Some(PageStage::InitialPage));
    assert_eq!(err.request_stage(), Some(RequestStage::SendingRequest));
}

#[tokio::test]
async fn test_deadline_stops_next_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "A"}],
            "nextLink": "/slow"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"value": []}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let ctx = CallContext::new().with_timeout(Duration::from_millis(500));
    let err = client::<Value>(&server)
        .collect_all(&ctx, &scope(), &ListOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.page_stage(), Some(PageStage::NextPage));
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_client_from_config_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/sub-1/providers/Microsoft.Synapse/workspaces"))
        .and(query_param("api-version", "2021-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "ws"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "base_url: {}", server.uri()).unwrap();
    writeln!(file, "api_version: 2021-06-01").unwrap();
    writeln!(file, "max_retries: 0").unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    let client = config
        .list_client::<Value>(ProviderCollection::new("Microsoft.Synapse", "workspaces"))
        .unwrap();

    let result = client
        .collect_all(
            &CallContext::new(),
            &ScopeId::subscription("sub-1").unwrap(),
            &ListOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(names(&result.items), vec!["ws"]);
}

// ============================================================================
// CLI
// ============================================================================

#[tokio::test]
async fn test_page_command_follows_next_link_without_scope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/continue"))
        .and(query_param("$skiptoken", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "Z"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let cli = Cli::try_parse_from([
        "resource-pager",
        "--base-url",
        uri.as_str(),
        "page",
        "--collection",
        "Microsoft.EventGrid/partnerRegistrations",
        "--next-link",
        "/continue?$skiptoken=t1",
    ])
    .unwrap();

    Runner::new(cli).run().await.unwrap();
}
