mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn both_services_report_healthy() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();

    for base in [&server.auth_url, &server.notes_url] {
        let res = client.get(format!("{}/health", base)).send().await?;
        assert_eq!(res.status(), StatusCode::OK);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["status"], "ok");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let server = common::start_server().await?;
    let res = reqwest::Client::new()
        .get(format!("{}/nope", server.notes_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn dropped_server_stops_listening() -> Result<()> {
    let server = common::start_server().await?;
    let health = format!("{}/health", server.auth_url);
    drop(server);

    let res = reqwest::Client::new().get(&health).send().await;
    assert!(res.is_err(), "server still answering after drop");
    Ok(())
}
