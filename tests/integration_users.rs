use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_registration_lifecycle() {
    let pool = common::get_test_pool().await;
    let server_url = common::spawn_app(pool).await;
    let client = reqwest::Client::new();

    let username = common::unique_username("alice");

    // Register
    let resp = client
        .post(format!("{server_url}/api/users"))
        .json(&json!({"username": username, "password": "Passw0rd"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let location = resp
        .headers()
        .get("location")
        .expect("Location header missing")
        .to_str()
        .unwrap()
        .to_string();

    let body: serde_json::Value = resp.json().await.unwrap();
    let id = body["id"].as_i64().expect("id missing");
    assert_eq!(body["username"], username);
    assert!(body.get("password").is_none(), "password must not be echoed back");
    assert_eq!(location, format!("/api/users/{id}"));

    // Fetch through the Location the server handed out
    let resp = client.get(format!("{server_url}{location}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["username"], username);
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let pool = common::get_test_pool().await;
    let server_url = common::spawn_app(pool).await;
    let client = reqwest::Client::new();

    let username = common::unique_username("bob");
    let payload = json!({"username": username, "password": "Passw0rd"});

    let resp = client.post(format!("{server_url}/api/users")).json(&payload).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client.post(format!("{server_url}/api/users")).json(&payload).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_unknown_user_returns_404() {
    let pool = common::get_test_pool().await;
    let server_url = common::spawn_app(pool).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{server_url}/api/users/999999999")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_replaces_username_and_password() {
    let pool = common::get_test_pool().await;
    let server_url = common::spawn_app(pool).await;
    let client = reqwest::Client::new();

    let username = common::unique_username("carol");
    let resp = client
        .post(format!("{server_url}/api/users"))
        .json(&json!({"username": username, "password": "Passw0rd"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = resp.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();

    let renamed = common::unique_username("carola");
    let resp = client
        .put(format!("{server_url}/api/users/{id}"))
        .json(&json!({"username": renamed, "password": "N3wPassword"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["username"], renamed);

    // The old username is free again
    let resp = client.get(format!("{server_url}/api/users/{id}")).send().await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["username"], renamed);
}

#[tokio::test]
async fn test_update_unknown_user_returns_404() {
    let pool = common::get_test_pool().await;
    let server_url = common::spawn_app(pool).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{server_url}/api/users/999999999"))
        .json(&json!({"username": common::unique_username("dave"), "password": "Passw0rd"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_to_taken_username_conflicts() {
    let pool = common::get_test_pool().await;
    let server_url = common::spawn_app(pool).await;
    let client = reqwest::Client::new();

    let first = common::unique_username("erin");
    let second = common::unique_username("frank");
    for name in [&first, &second] {
        let resp = client
            .post(format!("{server_url}/api/users"))
            .json(&json!({"username": name, "password": "Passw0rd"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client.get(format!("{server_url}/api/users?username={second}")).send().await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let second_id = body[0]["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{server_url}/api/users/{second_id}"))
        .json(&json!({"username": first, "password": "Passw0rd"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let pool = common::get_test_pool().await;
    let server_url = common::spawn_app(pool).await;
    let client = reqwest::Client::new();

    let username = common::unique_username("grace");
    let resp = client
        .post(format!("{server_url}/api/users"))
        .json(&json!({"username": username, "password": "Passw0rd"}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();

    let resp = client.delete(format!("{server_url}/api/users/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The row is gone
    let resp = client.get(format!("{server_url}/api/users/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Absent ids map to 404, same as the single-entity lookups
    let resp = client.delete(format!("{server_url}/api/users/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
