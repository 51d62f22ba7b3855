// ABOUTME: Integration tests for the task endpoints
// ABOUTME: Exercises the HTTP contract end to end against an in-memory database

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_end_to_end_task_lifecycle() {
    let app = TestApp::new().await;
    let token = app.user_token("testuser").await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({
                "title": "End to End Task",
                "description": "This task is created in an end-to-end test.",
                "status": "WORKING",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/tasks/{}/", id);

    let (status, fetched) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "End to End Task");
    assert_eq!(fetched["status"], "WORKING");

    let (status, updated) = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({
                "title": "End to End Task",
                "description": "Updated description",
                "status": "COMPLETED",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "COMPLETED");

    let (_, fetched) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(fetched["status"], "COMPLETED");
    assert_eq!(fetched["timestamp"], created["timestamp"]);

    let (status, body) = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, body) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Not found." }));
}

#[tokio::test]
async fn test_unauthenticated_requests_are_forbidden() {
    let app = TestApp::new().await;
    let token = app.user_token("owner").await;
    let (_, created) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({"title": "t", "description": "d"})),
        )
        .await;
    let uri = format!("/api/tasks/{}/", created["id"]);

    for (method, path) in [
        (Method::GET, "/api/tasks/".to_string()),
        (Method::POST, "/api/tasks/".to_string()),
        (Method::GET, uri.clone()),
        (Method::PUT, uri.clone()),
        (Method::DELETE, uri.clone()),
    ] {
        let (status, body) = app
            .request(
                method,
                &path,
                None,
                Some(json!({"title": "t", "description": "d"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["detail"],
            "Authentication credentials were not provided."
        );
    }

    // The task survived every rejected call
    let (status, _) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_tokens_are_forbidden() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::GET, "/api/tasks/", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Given token not valid for any token type");
}

#[tokio::test]
async fn test_owner_comes_from_token_not_body() {
    let app = TestApp::new().await;
    let token = app.user_token("owner").await;
    app.user_token("someone-else").await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({
                "title": "Mine",
                "description": "d",
                "created_by": 2,
                "id": 999,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(created["id"], 999);
    assert!(created.get("created_by").is_none());

    let task = app
        .state
        .task_storage
        .get_task(created["id"].as_i64().unwrap())
        .await
        .unwrap();
    let owner = app
        .state
        .user_storage
        .get_user_by_username("owner")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.created_by, owner.id);
}

#[tokio::test]
async fn test_tags_are_reused_across_tasks() {
    let app = TestApp::new().await;
    let token = app.user_token("tagger").await;

    let (status, first) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({
                "title": "Tagged",
                "description": "d",
                "status": "OPEN",
                "tags": [{"name": "Urgent"}, {"name": "Home"}],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, fetched) = app
        .request(
            Method::GET,
            &format!("/api/tasks/{}/", first["id"]),
            Some(&token),
            None,
        )
        .await;
    let names: Vec<&str> = fetched["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Urgent", "Home"]);

    let (_, second) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({"title": "Again", "description": "d", "tags": ["Urgent"]})),
        )
        .await;
    assert_eq!(second["tags"][0]["id"], first["tags"][0]["id"]);
    assert_eq!(app.state.tag_storage.count_tags().await.unwrap(), 2);
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = TestApp::new().await;
    let token = app.user_token("validator").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({
                "title": "",
                "status": "DONE",
                "due_date": "tomorrow",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "title": ["This field may not be blank."],
            "description": ["This field is required."],
            "status": ["\"DONE\" is not a valid choice."],
            "due_date": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."],
        })
    );
    assert_eq!(app.state.task_storage.count_tasks().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.user_token("sloppy").await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/tasks/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"title\": "))
        .unwrap();

    let (status, body) = app.raw_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = TestApp::new().await;
    let token = app.user_token("lister").await;

    for (title, status) in [("A", "OPEN"), ("B", "COMPLETED"), ("C", "OPEN")] {
        app.request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({"title": title, "description": "d", "status": status})),
        )
        .await;
    }

    let (status, all) = app
        .request(Method::GET, "/api/tasks/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, open) = app
        .request(Method::GET, "/api/tasks/?status=OPEN", Some(&token), None)
        .await;
    let titles: Vec<&str> = open
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "C"]);

    let (_, unfiltered) = app
        .request(Method::GET, "/api/tasks/?status=", Some(&token), None)
        .await;
    assert_eq!(unfiltered.as_array().unwrap().len(), 3);

    let (status, body) = app
        .request(Method::GET, "/api/tasks/?status=DONE", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["status"].is_array());
}

#[tokio::test]
async fn test_repeated_query_key_is_json_bad_request() {
    let app = TestApp::new().await;
    let token = app.user_token("doubler").await;

    let (status, body) = app
        .request(
            Method::GET,
            "/api/tasks/?status=OPEN&status=WORKING",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_null_status_and_tags_are_rejected() {
    let app = TestApp::new().await;
    let token = app.user_token("nuller").await;
    let nulls = json!({"title": "t", "description": "d", "status": null, "tags": null});
    let expected = json!({
        "status": ["This field may not be null."],
        "tags": ["This field may not be null."],
    });

    let (status, body) = app
        .request(Method::POST, "/api/tasks/", Some(&token), Some(nulls.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);
    assert_eq!(app.state.task_storage.count_tasks().await.unwrap(), 0);

    let (_, created) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({"title": "t", "description": "d", "status": "WORKING", "tags": ["A"]})),
        )
        .await;
    let uri = format!("/api/tasks/{}/", created["id"]);

    let (status, body) = app
        .request(Method::PUT, &uri, Some(&token), Some(nulls))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);

    let (_, unchanged) = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(unchanged["status"], "WORKING");
    assert_eq!(unchanged["tags"][0]["name"], "A");
}

#[tokio::test]
async fn test_put_is_idempotent_and_replaces_tags() {
    let app = TestApp::new().await;
    let token = app.user_token("editor").await;

    let (_, created) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&token),
            Some(json!({
                "title": "Original",
                "description": "d",
                "due_date": "2030-05-17",
                "tags": ["Home"],
            })),
        )
        .await;
    assert_eq!(created["due_date"], "2030-05-17");
    let uri = format!("/api/tasks/{}/", created["id"]);

    // Absent keys keep their stored values
    let (_, kept) = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"title": "Renamed", "description": "d2"})),
        )
        .await;
    assert_eq!(kept["due_date"], "2030-05-17");
    assert_eq!(kept["tags"], created["tags"]);
    assert_eq!(kept["status"], "OPEN");

    let replace = json!({
        "title": "Renamed",
        "description": "d2",
        "status": "CANCELLED",
        "due_date": null,
        "tags": [{"name": "Work"}],
    });
    let (status, first) = app
        .request(Method::PUT, &uri, Some(&token), Some(replace.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = app
        .request(Method::PUT, &uri, Some(&token), Some(replace))
        .await;

    assert_eq!(first, second);
    assert_eq!(second["due_date"], serde_json::Value::Null);
    assert_eq!(second["tags"][0]["name"], "Work");
}

#[tokio::test]
async fn test_unknown_or_non_integer_ids_are_not_found() {
    let app = TestApp::new().await;
    let token = app.user_token("seeker").await;

    for uri in ["/api/tasks/404/", "/api/tasks/abc/"] {
        let (status, _) = app.request(Method::GET, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // Existence is checked before the body is validated
    let (status, _) = app
        .request(Method::PUT, "/api/tasks/404/", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, "/api/tasks/404/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_authenticated_user_can_modify_any_task() {
    let app = TestApp::new().await;
    let owner = app.user_token("owner").await;
    let stranger = app.user_token("stranger").await;

    let (_, created) = app
        .request(
            Method::POST,
            "/api/tasks/",
            Some(&owner),
            Some(json!({"title": "Shared", "description": "d"})),
        )
        .await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/tasks/{}/", created["id"]),
            Some(&stranger),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
