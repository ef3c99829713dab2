//! HTTP contracts for the chat and search clients

use eira::clients::{ChatClient, GoogleSearchClient, OpenRouterClient, SearchClient};
use eira::EiraError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn chat_posts_prompt_and_reads_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "mistralai/mistral-7b-instruct",
            "messages": [{"role": "user", "content": "tell me a joke"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": " A pun walks into a bar. "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenRouterClient::new("sk-test")
        .unwrap()
        .with_base_url(server.uri());
    let reply = client.complete("tell me a joke").await.unwrap();

    assert_eq!(reply, "A pun walks into a bar.");
}

#[tokio::test]
async fn chat_maps_status_codes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer wrong"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer busy"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let unauthorized = OpenRouterClient::new("wrong")
        .unwrap()
        .with_base_url(server.uri());
    assert!(matches!(
        unauthorized.complete("hi").await,
        Err(EiraError::AuthError(_))
    ));

    let unavailable = OpenRouterClient::new("busy")
        .unwrap()
        .with_base_url(server.uri());
    assert!(matches!(
        unavailable.complete("hi").await,
        Err(EiraError::TransportError(_))
    ));
}

#[tokio::test]
async fn chat_rejects_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new("k").unwrap().with_base_url(server.uri());
    assert!(matches!(
        client.complete("hi").await,
        Err(EiraError::ParseError(_))
    ));
}

#[tokio::test]
async fn chat_connection_refused_is_transport_error() {
    // nothing listens on the discard port
    let client = OpenRouterClient::new("k")
        .unwrap()
        .with_base_url("http://127.0.0.1:9");
    let err = client.complete("hi").await.unwrap_err();
    assert!(matches!(err, EiraError::TransportError(_)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn search_requests_one_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "g-key"))
        .and(query_param("cx", "engine"))
        .and(query_param("q", "best espresso machine"))
        .and(query_param("num", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "title": "Top machines",
                "link": "https://example.com/espresso",
                "snippet": "The X9000 tops our list."
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GoogleSearchClient::new("g-key", "engine")
        .unwrap()
        .with_base_url(server.uri());
    let hit = client
        .search("best espresso machine")
        .await
        .unwrap()
        .expect("one hit");

    assert_eq!(hit.snippet.as_deref(), Some("The X9000 tops our list."));
    assert_eq!(hit.link.as_deref(), Some("https://example.com/espresso"));
}

#[tokio::test]
async fn search_without_items_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchInformation": {"totalResults": "0"}
        })))
        .mount(&server)
        .await;

    let client = GoogleSearchClient::new("k", "cx")
        .unwrap()
        .with_base_url(server.uri());
    assert_eq!(client.search("zzqx").await.unwrap(), None);
}

#[tokio::test]
async fn search_forbidden_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = GoogleSearchClient::new("k", "cx")
        .unwrap()
        .with_base_url(server.uri());
    assert!(matches!(
        client.search("x").await,
        Err(EiraError::AuthError(_))
    ));
}
