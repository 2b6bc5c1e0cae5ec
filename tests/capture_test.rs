use std::{net::SocketAddr, time::Duration};

use reqwest::{Client, StatusCode};
use spotback::{
    Error,
    api::RELAY_SCRIPT,
    server::{self, CaptureState},
    types::{AccessToken, Authorization},
};
use tokio::{sync::oneshot, task::JoinHandle, time::timeout};

async fn start_capture() -> (SocketAddr, JoinHandle<spotback::Res<AccessToken>>) {
    let listener = server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(server::capture_token(listener));
    (addr, handle)
}

fn browser() -> Client {
    Client::builder().pool_max_idle_per_host(0).build().unwrap()
}

#[tokio::test]
async fn redirect_relays_fragment_to_token_route() {
    let (addr, handle) = start_capture().await;

    let response = browser()
        .get(format!("http://{addr}/redirect"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = response.text().await.unwrap();
    assert_eq!(body, RELAY_SCRIPT);
    assert!(body.contains(r#""token?" + location.hash.slice(1)"#));
    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test]
async fn token_route_captures_token_and_stops_server() {
    let (addr, handle) = start_capture().await;
    let browser = browser();

    let unknown = browser.get(format!("http://{addr}/unknown")).send().await.unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let bare = browser.get(format!("http://{addr}/token")).send().await.unwrap();
    assert_eq!(bare.status(), StatusCode::NOT_FOUND);

    let malformed = browser
        .get(format!("http://{addr}/token?token_type=Bearer"))
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert!(!handle.is_finished());

    let captured = browser
        .get(format!(
            "http://{addr}/token?access_token=ABC123&token_type=Bearer&expires_in=3600"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(captured.status(), StatusCode::OK);
    assert!(captured.text().await.unwrap().contains("close()"));

    let token = timeout(Duration::from_secs(5), handle)
        .await
        .expect("capture server did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(token, AccessToken::new("ABC123"));

    // the port is released once the flow finished
    server::bind(addr).await.unwrap();
}

#[tokio::test]
async fn denied_authorization_ends_flow_with_error() {
    let (addr, handle) = start_capture().await;

    let response = browser()
        .get(format!("http://{addr}/token?error=access_denied"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result = timeout(Duration::from_secs(5), handle)
        .await
        .expect("capture server did not stop")
        .unwrap();
    assert!(matches!(result, Err(Error::AuthorizationDenied(reason)) if reason == "access_denied"));
}

#[tokio::test]
async fn bind_fails_when_port_is_taken() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();

    let result = server::bind(addr).await;

    assert!(matches!(result, Err(Error::Bind { addr: failed, .. }) if failed == addr));
}

#[tokio::test]
async fn only_first_authorization_completes() {
    let (tx, rx) = oneshot::channel();
    let state = CaptureState::new(tx);

    assert!(state.complete(Authorization::Granted(AccessToken::new("first"))).await);
    assert!(!state.complete(Authorization::Granted(AccessToken::new("second"))).await);
    assert_eq!(
        rx.await.unwrap(),
        Authorization::Granted(AccessToken::new("first"))
    );
}
