use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};

use crate::{
    Error, Res, api,
    types::{AccessToken, Authorization},
};

/// Completion handle shared by the capture routes. The sender is taken by the
/// first completed authorization, so there is at most one.
#[derive(Clone)]
pub struct CaptureState {
    done: Arc<Mutex<Option<oneshot::Sender<Authorization>>>>,
}

impl CaptureState {
    pub fn new(done: oneshot::Sender<Authorization>) -> Self {
        Self {
            done: Arc::new(Mutex::new(Some(done))),
        }
    }

    /// Signals the end of the flow. Returns false if it already ended.
    pub async fn complete(&self, authorization: Authorization) -> bool {
        match self.done.lock().await.take() {
            Some(done) => done.send(authorization).is_ok(),
            None => false,
        }
    }
}

pub fn router(state: CaptureState) -> Router {
    Router::new()
        .route("/redirect", get(api::redirect))
        .route("/token", get(api::token).layer(Extension(state)))
        .fallback(api::not_found)
}

pub async fn bind(addr: SocketAddr) -> Res<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })
}

/// Serves the capture routes on `listener` until `/token` completed the flow,
/// then shuts down gracefully and releases the listener.
pub async fn capture_token(listener: TcpListener) -> Res<AccessToken> {
    let (done_tx, done_rx) = oneshot::channel();
    let app = router(CaptureState::new(done_tx));

    let outcome: Arc<Mutex<Option<Authorization>>> = Arc::new(Mutex::new(None));
    let shutdown = {
        let outcome = Arc::clone(&outcome);
        async move {
            if let Ok(authorization) = done_rx.await {
                *outcome.lock().await = Some(authorization);
            }
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(Error::Serve)?;

    let authorization = outcome.lock().await.take();
    match authorization {
        Some(Authorization::Granted(token)) => Ok(token),
        Some(Authorization::Denied(reason)) => Err(Error::AuthorizationDenied(reason)),
        None => Err(Error::AuthorizationAborted),
    }
}
