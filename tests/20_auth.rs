mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn signup_then_signin() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();
    let username = common::unique_user("signin");

    common::signup(&server, &username).await?;

    let res = client
        .post(format!("{}/auth/signin", server.auth_url))
        .json(&json!({ "username": username, "password": "correct horse" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("authorization").is_some());
    let body: Value = res.json().await?;
    assert_eq!(body["username"], username.as_str());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_get_no_token() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();
    let username = common::unique_user("badpass");
    common::signup(&server, &username).await?;

    for (user, password) in [(username.as_str(), "wrong"), ("nobody-at-all", "correct horse")] {
        let res = client
            .post(format!("{}/auth/signin", server.auth_url))
            .json(&json!({ "username": user, "password": password }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().get("authorization").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_conflicts() -> Result<()> {
    let server = common::start_server().await?;
    let username = common::unique_user("dup");
    common::signup(&server, &username).await?;

    let res = reqwest::Client::new()
        .post(format!("{}/auth/signup", server.auth_url))
        .json(&json!({ "username": username, "password": "another" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn account_delete_is_owner_only() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();
    let alice = common::unique_user("alice");
    let bob = common::unique_user("bob");
    let alice_token = common::signup(&server, &alice).await?;
    let bob_token = common::signup(&server, &bob).await?;

    let res = client
        .delete(format!("{}/auth/delete", server.auth_url))
        .bearer_auth(&bob_token)
        .json(&json!({ "username": alice }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/auth/delete", server.auth_url))
        .bearer_auth(&alice_token)
        .json(&json!({ "username": alice }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "Successfully deleted account!");

    // Bob's account survived the denied attempt
    let res = client
        .post(format!("{}/auth/signin", server.auth_url))
        .json(&json!({ "username": bob, "password": "correct horse" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
