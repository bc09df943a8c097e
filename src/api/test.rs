use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{router, AppState};
use crate::keyword::{KeywordResponse, LastKeyword};
use crate::search::oauth::Credentials;
use crate::search::UserSearch;
use crate::token::{ConfiguredTokenManager, ErrorResponse, TokenLifeLengthResponse};

const SEARCH_PATH: &str = "/1.1/users/search.json";

fn credentials() -> Credentials {
    Credentials {
        consumer_key: "consumer_key".to_owned(),
        consumer_secret: "consumer_secret".to_owned(),
        token: "access_token".to_owned(),
        token_secret: "access_token_secret".to_owned(),
    }
}

fn app(search_url: Url, timeout: Duration) -> Router {
    let client = reqwest::Client::builder().timeout(timeout).build().unwrap();
    let search = UserSearch::new(client, credentials(), search_url, "Collarana".to_owned(), 100);
    let token_manager =
        ConfiguredTokenManager::new([("twitter".to_owned(), "3600".to_owned())], None);

    router(AppState {
        token_manager: Arc::new(token_manager),
        search: Arc::new(search),
        keyword: LastKeyword::default(),
    })
}

fn offline_app() -> Router {
    app(
        Url::parse("http://127.0.0.1:9/1.1/users/search.json").unwrap(),
        Duration::from_secs(1),
    )
}

fn mocked_app(server: &MockServer) -> Router {
    let url = Url::parse(&format!("{}{SEARCH_PATH}", server.uri())).unwrap();
    app(url, Duration::from_secs(1))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_owned());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn pages() {
    for (uri, title) in [
        ("/", "<title>FuhSen</title>"),
        ("/results", "<title>FuhSen - Results</title>"),
        ("/details", "<title>FuhSen - Details</title>"),
    ] {
        let (status, content_type, body) = get(offline_app(), uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert!(body.contains(title), "{uri} should contain {title}");
    }
}

#[tokio::test]
async fn token_life_length() {
    let (status, content_type, body) = get(offline_app(), "/token-life-length/twitter").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, r#"{"life_length":"3600"}"#);
    assert_eq!(
        serde_json::from_str::<TokenLifeLengthResponse>(&body).unwrap(),
        TokenLifeLengthResponse {
            life_length: "3600".to_owned()
        }
    );
}

#[tokio::test]
async fn unknown_wrapper_token_life_length() {
    let (status, _, body) = get(offline_app(), "/token-life-length/linkedin").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        serde_json::from_str::<ErrorResponse>(&body).unwrap(),
        ErrorResponse {
            error: "unknown wrapper `linkedin`".to_owned()
        }
    );
}

#[tokio::test]
async fn keyword_is_empty_before_any_search() {
    let (status, _, body) = get(offline_app(), "/keyword").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"keyword":""}"#);
    assert_eq!(
        serde_json::from_str::<KeywordResponse>(&body).unwrap(),
        KeywordResponse {
            keyword: String::new()
        }
    );
}

#[tokio::test]
async fn successful_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("count", "100"))
        .and(query_param("q", "Collarana"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[{\"id\":1,\n\"name\":\"a\"}]\n"))
        .expect(1)
        .mount(&server)
        .await;

    let app = mocked_app(&server);

    let (status, _, body) = get(app.clone(), "/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"OK [{"id":1,"name":"a"}]"#);

    let (_, _, body) = get(app, "/keyword").await;
    assert_eq!(
        serde_json::from_str::<KeywordResponse>(&body).unwrap(),
        KeywordResponse {
            keyword: "Collarana".to_owned()
        }
    );
}

#[tokio::test]
async fn search_drops_every_kind_of_line_break() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("a\rb\r\nc\n"))
        .mount(&server)
        .await;

    let (status, _, body) = get(mocked_app(&server), "/search").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK abc");
}

#[tokio::test]
async fn search_sends_an_oauth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    get(mocked_app(&server), "/search").await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(authorization.starts_with("OAuth "));
    assert!(authorization.contains(r#"oauth_consumer_key="consumer_key""#));
    assert!(authorization.contains(r#"oauth_token="access_token""#));
    assert!(authorization.contains(r#"oauth_signature_method="HMAC-SHA1""#));
    assert!(authorization.contains("oauth_signature=\""));
    assert!(!authorization.contains("consumer_secret"));
    assert!(!authorization.contains("access_token_secret"));
}

#[tokio::test]
async fn upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"errors\":[]}"))
        .mount(&server)
        .await;

    let (status, _, body) = get(mocked_app(&server), "/search").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "NOT OK 401 Unauthorized");
}

#[tokio::test]
async fn upstream_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let app = mocked_app(&server);
    let (status, _, body) = get(app.clone(), "/search").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.starts_with("NOT OK Exception "), "{body}");

    // the keyword is recorded even though the search failed
    let (_, _, body) = get(app, "/keyword").await;
    assert_eq!(body, r#"{"keyword":"Collarana"}"#);
}

#[tokio::test]
async fn openapi_document() {
    let (status, _, body) = get(offline_app(), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);

    let document: serde_json::Value = serde_json::from_str(&body).unwrap();
    let paths = document["paths"].as_object().unwrap();
    for documented in [
        "/",
        "/results",
        "/details",
        "/token-life-length/{wrapper_id}",
        "/keyword",
        "/search",
    ] {
        assert!(paths.contains_key(documented), "missing {documented}");
    }
}

#[tokio::test]
async fn unknown_route() {
    let (status, _, _) = get(offline_app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
