#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::Router;
use spotback::{
    config::{Config, RetryPolicy},
    spotify::SpotifyClient,
    types::AccessToken,
};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";

/// Starts a mock Spotify API on an ephemeral port and returns its base URL
/// (`http://127.0.0.1:<port>/v1/`). `build` receives that base URL so
/// handlers can hand out absolute `next` links.
pub async fn spawn_api<F>(build: F) -> String
where
    F: FnOnce(String) -> Router,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/v1/", listener.local_addr().unwrap());
    let app = build(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(1),
        max_pages: 50,
    }
}

pub fn client(base: &str) -> SpotifyClient {
    let config = Config::default()
        .with_api_url(base)
        .with_retry(fast_retry());
    SpotifyClient::with_config(AccessToken::new(TOKEN), &config).unwrap()
}

/// Request log shared between a mock handler and the test.
#[derive(Clone, Default)]
pub struct Requests(Arc<Mutex<Vec<String>>>);

impl Requests {
    pub fn record(&self, uri: &axum::http::Uri) {
        self.0.lock().unwrap().push(uri.to_string());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}
