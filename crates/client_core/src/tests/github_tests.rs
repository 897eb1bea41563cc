use super::*;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;

#[derive(Debug, Deserialize)]
struct PageQuery {
    per_page: usize,
    page: u32,
}

async fn followers_handler(
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match username.as_str() {
        "octocat" => {
            assert_eq!(query.per_page, 100);
            let followers: Vec<_> = (0..3)
                .map(|i| {
                    serde_json::json!({
                        "login": format!("p{}-user{i}", query.page),
                        "avatar_url": format!("https://avatars.example/{i}"),
                        "id": i,
                    })
                })
                .collect();
            Ok(Json(serde_json::Value::Array(followers)))
        }
        "garbled" => Ok(Json(serde_json::json!({ "unexpected": true }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn user_handler(Path(username): Path<String>) -> Result<Json<serde_json::Value>, StatusCode> {
    if username != "octocat" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({
        "login": "octocat",
        "avatar_url": "https://avatars.example/octocat",
        "name": "The Octocat",
        "public_repos": 8,
        "public_gists": 8,
        "html_url": "https://github.com/octocat",
        "following": 9,
        "followers": 4000,
        "created_at": "2011-01-25T18:44:36Z"
    })))
}

async fn spawn_mock_github() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/users/:username/followers", get(followers_handler))
        .route("/users/:username", get(user_handler));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn client_for(base_url: String) -> GithubClient {
    GithubClient::new(GithubClientOptions {
        api_base_url: base_url,
        ..GithubClientOptions::default()
    })
    .expect("client")
}

#[tokio::test]
async fn fetches_requested_followers_page() {
    let client = client_for(spawn_mock_github().await.expect("server"));

    let followers = client.followers("octocat", 2).await.expect("followers");
    assert_eq!(followers.len(), 3);
    assert_eq!(
        followers[0],
        Follower::new("p2-user0", "https://avatars.example/0")
    );
}

#[tokio::test]
async fn fetches_user_info() {
    let client = client_for(spawn_mock_github().await.expect("server"));

    let user = client.user_info("octocat").await.expect("user");
    assert_eq!(user.login, "octocat");
    assert_eq!(user.followers, 4000);
    assert_eq!(user.location, None);
}

#[tokio::test]
async fn unknown_user_maps_to_invalid_response() {
    let client = client_for(spawn_mock_github().await.expect("server"));

    let err = client.followers("ghost", 1).await.expect_err("missing user");
    assert_eq!(err, NetworkError::InvalidResponse(404));
}

#[tokio::test]
async fn undecodable_body_maps_to_invalid_data() {
    let client = client_for(spawn_mock_github().await.expect("server"));

    let err = client.followers("garbled", 1).await.expect_err("bad body");
    assert_eq!(err, NetworkError::InvalidData);
}

#[tokio::test]
async fn unreachable_server_maps_to_unable_to_complete() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = client_for(format!("http://{addr}"));
    let err = client.user_info("octocat").await.expect_err("unreachable");
    assert_eq!(err, NetworkError::UnableToComplete);
}

#[tokio::test]
async fn blank_username_is_rejected_before_any_request() {
    let client = client_for("http://127.0.0.1:9".to_string());
    assert_eq!(
        client.followers("  ", 1).await.expect_err("blank"),
        NetworkError::InvalidUsername
    );
}

#[test]
fn builds_user_urls_under_base_path() {
    let client = client_for("https://ghe.example.com/api/v3".to_string());
    let url = client
        .user_url("octocat", Some("followers"))
        .expect("url");
    assert_eq!(
        url.as_str(),
        "https://ghe.example.com/api/v3/users/octocat/followers"
    );

    let escaped = client.user_url("a/b", None).expect("url");
    assert_eq!(escaped.as_str(), "https://ghe.example.com/api/v3/users/a%2Fb");
}

#[test]
fn rejects_token_that_cannot_be_a_header() {
    let result = GithubClient::new(GithubClientOptions {
        token: Some("bad\ntoken".to_string()),
        ..GithubClientOptions::default()
    });
    assert!(result.is_err());
}
