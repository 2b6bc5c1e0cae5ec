mod common;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, Uri},
    routing::get,
};
use serde_json::{Value, json};
use spotback::{Error, spotify::paging::Container};

use common::{Requests, TOKEN, client, fast_retry, spawn_api};

#[tokio::test]
async fn list_follows_next_links_in_page_order() {
    let requests = Requests::default();
    let log = requests.clone();
    let base = spawn_api(move |base| {
        let first = log.clone();
        let second = log.clone();
        Router::new()
            .route(
                "/v1/me/albums",
                get(move |uri: Uri| async move {
                    first.record(&uri);
                    Json(json!({"items": [{"name": "A"}], "next": format!("{base}page2")}))
                }),
            )
            .route(
                "/v1/page2",
                get(move |uri: Uri| async move {
                    second.record(&uri);
                    Json(json!({"items": [{"name": "B"}], "next": null}))
                }),
            )
    })
    .await;

    let items = client(&base)
        .list("me/albums", &[("limit", "50")])
        .await
        .unwrap();

    assert_eq!(items, vec![json!({"name": "A"}), json!({"name": "B"})]);
    // the next link is fetched verbatim, without the caller's params
    assert_eq!(requests.all(), vec!["/v1/me/albums?limit=50", "/v1/page2"]);
}

#[tokio::test]
async fn list_collects_every_item_of_a_long_chain() {
    let sizes = [3usize, 0, 2, 1, 4];
    let base = spawn_api(move |base| {
        Router::new().route(
            "/v1/me/tracks",
            get(move |uri: Uri| async move {
                let page: usize = uri
                    .query()
                    .and_then(|q| q.strip_prefix("page="))
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0);
                let offset: usize = sizes[..page].iter().sum();
                let items: Vec<Value> = (0..sizes[page]).map(|i| json!(offset + i)).collect();
                let next = (page + 1 < sizes.len())
                    .then(|| format!("{base}me/tracks?page={}", page + 1));
                Json(json!({"items": items, "next": next}))
            }),
        )
    })
    .await;

    let items = client(&base).list("me/tracks", &[]).await.unwrap();

    let expected: Vec<Value> = (0..sizes.iter().sum::<usize>()).map(|i| json!(i)).collect();
    assert_eq!(items, expected);
}

#[tokio::test]
async fn list_by_cursor_stops_when_after_is_null() {
    let requests = Requests::default();
    let log = requests.clone();
    let base = spawn_api(move |_| {
        Router::new().route(
            "/v1/me/following",
            get(move |uri: Uri| async move {
                log.record(&uri);
                Json(json!({"artists": {"items": [{"name": "X"}], "cursors": {"after": null}}}))
            }),
        )
    })
    .await;

    let artists = client(&base)
        .list_by_cursor(
            "me/following?type=artist",
            &[("limit", "50")],
            &Container::new("artists"),
        )
        .await
        .unwrap();

    assert_eq!(artists, vec![json!({"name": "X"})]);
    assert_eq!(requests.all(), vec!["/v1/me/following?type=artist&limit=50"]);
}

#[tokio::test]
async fn list_by_cursor_rerequests_same_path_with_cursor() {
    let requests = Requests::default();
    let log = requests.clone();
    let base = spawn_api(move |_| {
        Router::new().route(
            "/v1/me/following",
            get(move |uri: Uri| async move {
                log.record(&uri);
                let query = uri.query().unwrap_or_default().to_string();
                let page = if query.contains("after=c2") {
                    json!({"artists": {"items": [{"name": "Z"}], "cursors": {"after": null}}})
                } else if query.contains("after=c1") {
                    json!({"artists": {"items": [{"name": "Y"}], "cursors": {"after": "c2"}}})
                } else {
                    json!({"artists": {"items": [{"name": "X"}], "cursors": {"after": "c1"}}})
                };
                Json(page)
            }),
        )
    })
    .await;

    let artists = client(&base)
        .list_by_cursor(
            "me/following?type=artist",
            &[("limit", "50")],
            &Container::new("artists"),
        )
        .await
        .unwrap();

    assert_eq!(
        artists,
        vec![json!({"name": "X"}), json!({"name": "Y"}), json!({"name": "Z"})]
    );
    assert_eq!(
        requests.all(),
        vec![
            "/v1/me/following?type=artist&limit=50",
            "/v1/me/following?type=artist&after=c1&limit=50",
            "/v1/me/following?type=artist&after=c2&limit=50",
        ]
    );
}

#[tokio::test]
async fn list_rejects_a_next_cycle() {
    let base = spawn_api(|base| {
        Router::new().route(
            "/v1/me/albums",
            get(move || async move {
                Json(json!({"items": [1], "next": format!("{base}me/albums?offset=1")}))
            }),
        )
    })
    .await;

    let result = client(&base).list("me/albums", &[]).await;

    assert!(matches!(result, Err(Error::Pagination(_))));
}

#[tokio::test]
async fn list_stops_at_page_limit() {
    let base = spawn_api(|base| {
        Router::new().route(
            "/v1/me/albums",
            get(move |uri: Uri| async move {
                let offset: u64 = uri
                    .query()
                    .and_then(|q| q.strip_prefix("offset="))
                    .and_then(|o| o.parse().ok())
                    .unwrap_or(0);
                Json(json!({"items": [offset], "next": format!("{base}me/albums?offset={}", offset + 1)}))
            }),
        )
    })
    .await;

    let result = client(&base).list("me/albums", &[]).await;

    assert!(matches!(result, Err(Error::Pagination(_))));
}

#[tokio::test]
async fn list_rejects_next_link_back_to_first_page() {
    let requests = Requests::default();
    let log = requests.clone();
    let base = spawn_api(move |base| {
        Router::new().route(
            "/v1/me/albums",
            get(move |uri: Uri| async move {
                log.record(&uri);
                Json(json!({"items": [1], "next": format!("{base}me/albums?limit=50")}))
            }),
        )
    })
    .await;

    let result = client(&base).list("me/albums", &[("limit", "50")]).await;

    assert!(matches!(result, Err(Error::Pagination(_))));
    assert_eq!(requests.count(), 1);
}

#[tokio::test]
async fn list_by_cursor_stops_at_page_limit() {
    let requests = Requests::default();
    let log = requests.clone();
    let base = spawn_api(move |_| {
        Router::new().route(
            "/v1/me/following",
            get(move |uri: Uri| async move {
                log.record(&uri);
                Json(json!({"artists": {"items": [{"name": "X"}], "cursors": {"after": "again"}}}))
            }),
        )
    })
    .await;

    let result = client(&base)
        .list_by_cursor(
            "me/following?type=artist",
            &[("limit", "50")],
            &Container::new("artists"),
        )
        .await;

    assert!(matches!(result, Err(Error::Pagination(_))));
    assert_eq!(requests.count(), fast_retry().max_pages);
}

#[tokio::test]
async fn page_without_items_is_rejected() {
    let base = spawn_api(|_| {
        Router::new().route(
            "/v1/me/albums",
            get(|| async { Json(json!({"error": "gone", "next": null})) }),
        )
    })
    .await;

    let result = client(&base).list("me/albums", &[]).await;

    assert!(matches!(result, Err(Error::UnexpectedResponse(_))));
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let base = spawn_api(|_| {
        Router::new().route(
            "/v1/me",
            get(|headers: HeaderMap| async move {
                let expected = format!("Bearer {TOKEN}");
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some(value) if value == expected => {
                        (StatusCode::OK, Json(json!({"id": "u1"})))
                    }
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({"error": "no token"}))),
                }
            }),
        )
    })
    .await;

    let me = client(&base).get("me", &[]).await.unwrap();

    assert_eq!(me, json!({"id": "u1"}));
}
