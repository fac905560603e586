// Integration tests for EventApiClient against a mock HTTP server.

use cbevents_sdk::{
    Event, EventApiClient, EventApiError, EventData, QueryBuilder, ServicesEndpoint, Target,
};
use mockito::Matcher;

const TOKEN: &str = "token";
// base64("token"), as carried in the Authorization header
const BEARER: &str = "Bearer dG9rZW4=";

fn client_for(server: &mockito::ServerGuard) -> EventApiClient {
    let endpoint = ServicesEndpoint::parse(&server.url()).unwrap();
    EventApiClient::with_endpoint(TOKEN, &endpoint).unwrap()
}

fn publishable_event() -> Event {
    let target = Target::new("https://example.com/res/1", ["info"]);
    Event::new(target, "info")
        .with_event_data(EventData::builder("Application helloworld deployed").build())
}

const STORED_EVENT: &str = r#"{
    "id": "123",
    "target": {"url": "https://example.com/res/1", "types": ["info"]},
    "event": {"title": "Application helloworld deployed"},
    "type": "info"
}"#;

#[tokio::test]
async fn test_publish_returns_location_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/events/")
        .match_header("authorization", BEARER)
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "type": "info",
            "event": {"title": "Application helloworld deployed"},
        })))
        .with_status(201)
        .with_header("location", "https://x/api/events/123")
        .create_async()
        .await;

    let client = client_for(&server);
    let location = client.publish(&publishable_event()).await.unwrap();

    assert_eq!(location, "https://x/api/events/123");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_publish_without_event_data_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/events/")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let target = Target::new("https://example.com/res/1", ["info"]);
    let err = client.publish(&Event::new(target, "info")).await.unwrap_err();

    assert!(matches!(err, EventApiError::Validation(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_publish_with_empty_title_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/events/")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let target = Target::new("https://example.com/res/1", ["info"]);
    let event = Event::new(target, "info").with_event_data(EventData::builder("").build());
    let err = client.publish(&event).await.unwrap_err();

    assert!(matches!(err, EventApiError::Validation(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_publish_failure_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/events/")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.publish(&publishable_event()).await.unwrap_err();

    match err {
        EventApiError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_event_decodes_the_stored_event() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/events/123")
        .match_header("authorization", BEARER)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(STORED_EVENT)
        .create_async()
        .await;

    let client = client_for(&server);
    let event = client
        .read_event(&format!("{}/api/events/123", server.url()))
        .await
        .unwrap();

    assert_eq!(event.id(), Some("123"));
    assert_eq!(event.event_type(), "info");
    assert_eq!(
        event.event_data().unwrap().title(),
        "Application helloworld deployed"
    );
}

#[tokio::test]
async fn test_read_event_maps_404_to_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/events/missing")
        .with_status(404)
        .with_body("no such event")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .read_event(&format!("{}/api/events/missing", server.url()))
        .await
        .unwrap_err();

    match err {
        EventApiError::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_query_returns_events_in_server_order() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"[
        {"id": "2", "target": {"url": "https://example.com/res/2", "types": []}, "type": "alert"},
        {"id": "1", "target": {"url": "https://example.com/res/1", "types": []}, "type": "info"}
    ]"#;
    let _mock = server
        .mock("GET", "/api/events/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("account".into(), "acme".into()),
            Matcher::UrlEncoded("types".into(), "info,alert".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .match_header("authorization", BEARER)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let query = QueryBuilder::new(format!("{}/api/events/", server.url()))
        .account("acme")
        .types(["info", "alert"])
        .limit(2)
        .build()
        .unwrap();
    let events = client.query(query.as_str()).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id(), Some("2"));
    assert_eq!(events[1].id(), Some("1"));
}

#[tokio::test]
async fn test_delete_is_confirmed_only_by_status_200() {
    let mut server = mockito::Server::new_async().await;
    let _deleted = server
        .mock("DELETE", "/api/events/1")
        .match_header("authorization", BEARER)
        .with_status(200)
        .create_async()
        .await;
    let _accepted = server
        .mock("DELETE", "/api/events/2")
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client
        .delete(&format!("{}/api/events/1", server.url()))
        .await
        .unwrap());
    assert!(!client
        .delete(&format!("{}/api/events/2", server.url()))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_delete_failure_is_an_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/api/events/1")
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .delete(&format!("{}/api/events/1", server.url()))
        .await
        .unwrap_err();

    match err {
        EventApiError::Api { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_survives_a_failed_call() {
    let mut server = mockito::Server::new_async().await;
    let _missing = server
        .mock("GET", "/api/events/missing")
        .with_status(404)
        .create_async()
        .await;
    let _found = server
        .mock("GET", "/api/events/123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(STORED_EVENT)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client
        .read_event(&format!("{}/api/events/missing", server.url()))
        .await
        .is_err());

    // The same client keeps working after a failure.
    let event = client
        .read_event(&format!("{}/api/events/123", server.url()))
        .await
        .unwrap();
    assert_eq!(event.id(), Some("123"));
}
