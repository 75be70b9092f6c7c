use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use lander_common::{Language, Website, DEFAULT_TITLE};
use lander_server::{app, AppState, MemoryStore, Store, User};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> (MemoryStore, Router) {
    let store = MemoryStore::with_users([User::new("owner@example.com", "secret")]);
    let router = app(AppState::new(store.clone()));
    (store, router)
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(router: &Router) -> Website {
    let (status, body) = call(router, Method::POST, "/website/create", None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_create_seeds_every_language() {
    let (_, router) = router();
    let website = create(&router).await;

    assert_eq!(website.title, DEFAULT_TITLE);
    assert_eq!(website.languages(), vec![Language::JP, Language::EN, Language::TW, Language::CN]);
    assert!(website.localized_html.iter().all(|doc| doc.content.is_empty()));
}

#[tokio::test]
async fn test_get_and_list() {
    let (_, router) = router();
    let website = create(&router).await;
    create(&router).await;

    let (status, body) = call(&router, Method::GET, &format!("/website/{}", website.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["localizedHtml"].as_array().unwrap().len(), 4);
    assert_eq!(body["title"], DEFAULT_TITLE);

    let (status, body) = call(&router, Method::GET, "/website/getAll", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = call(&router, Method::GET, "/website/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Website not found" }));
}

#[tokio::test]
async fn test_update_upserts_one_language() {
    let (store, router) = router();
    let id = create(&router).await.id;

    let uri = format!("/website/update/{id}");
    let (status, body) = call(
        &router,
        Method::POST,
        &uri,
        Some(json!({ "language": "EN", "content": "<h1>Hello</h1>" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let website = store.get(id).unwrap();
    assert_eq!(website.content(Language::EN), "<h1>Hello</h1>");
    assert_eq!(website.content(Language::JP), "");
    assert_eq!(website.localized_html.len(), 4);
}

#[tokio::test]
async fn test_update_rejects_incomplete_bodies() {
    let (store, router) = router();
    let id = create(&router).await.id;
    let uri = format!("/website/update/{id}");

    for body in [
        json!({ "language": "JP" }),
        json!({ "content": "<p>x</p>" }),
        json!({ "html": "<p>legacy</p>" }),
    ] {
        let (status, response) = call(&router, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "language and content are required" }));
    }
    assert!(store.get(id).unwrap().localized_html.iter().all(|doc| doc.content.is_empty()));

    for body in [
        json!({ "title": "Half", "language": "JP" }),
        json!({ "title": "Half", "content": "<p>x</p>" }),
    ] {
        let (status, _) = call(&router, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_ne!(store.get(id).unwrap().title, "Half");

    let (status, _) = call(&router, Method::POST, &uri, Some(json!({ "title": "Renamed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.get(id).unwrap().title, "Renamed");

    let (status, _) = call(
        &router,
        Method::POST,
        "/website/update/42",
        Some(json!({ "language": "JP", "content": "<p>x</p>" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_title() {
    let (_, router) = router();
    let id = create(&router).await.id;
    let uri = format!("/website/updateTitle/{id}");

    let (status, body) = call(&router, Method::POST, &uri, Some(json!({ "title": "Spring sale" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["website"]["title"], "Spring sale");

    let (status, body) = call(&router, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Title is undefined" }));

    let (status, body) = call(
        &router,
        Method::POST,
        "/website/updateTitle/77",
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to update the website title" }));
}

#[tokio::test]
async fn test_delete_twice() {
    let (store, router) = router();
    let id = create(&router).await.id;

    let (status, body) = call(&router, Method::POST, "/website/delete", Some(json!({ "id": id.to_string() }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert!(store.is_empty());

    let (status, body) = call(&router, Method::POST, "/website/delete", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "削除に失敗しました" }));
}

#[tokio::test]
async fn test_login() {
    let (_, router) = router();

    let (status, body) = call(
        &router,
        Method::POST,
        "/login",
        Some(json!({ "email": "owner@example.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "userEmail": "owner@example.com" }));

    let (status, body) = call(
        &router,
        Method::POST,
        "/login",
        Some(json!({ "email": "owner@example.com", "password": "guess" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "ユーザーIDまたはパスワードが間違っています" }));
}
