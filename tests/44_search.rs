mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{send, TestServer};

fn names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

async fn seeded() -> Result<(TestServer, String)> {
    let server = TestServer::spawn().await?;
    let (_, alice) = server.user_in(Uuid::new_v4(), "Alice").await;
    let (_, bob) = server.user_in(Uuid::new_v4(), "Bob").await;

    server.create_project(&alice, json!({ "name": "Apollo Launch" })).await?;
    server.create_project(&alice, json!({ "name": "apollo docs", "status": "archived" })).await?;
    server.create_project(&alice, json!({ "name": "Gemini 100%" })).await?;
    server.create_project(&bob, json!({ "name": "Apollo Rival" })).await?;
    Ok((server, alice))
}

#[tokio::test]
async fn name_search_is_case_insensitive_substring() -> Result<()> {
    let (server, alice) = seeded().await?;

    let (status, body) = send(server.post("/project/search", &alice, &json!({ "name": "APOLLO" }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Apollo Launch", "apollo docs"]);

    let (_, body) = send(server.post("/project/search", &alice, &json!({ "name": "unc" }))).await?;
    assert_eq!(names(&body), vec!["Apollo Launch"]);
    Ok(())
}

#[tokio::test]
async fn status_is_exact_and_combines_with_name() -> Result<()> {
    let (server, alice) = seeded().await?;

    let body = json!({ "name": "apollo", "status": "archived" });
    let (_, body) = send(server.post("/project/search", &alice, &body)).await?;
    assert_eq!(names(&body), vec!["apollo docs"]);

    let (_, body) = send(server.post("/project/search", &alice, &json!({ "status": "ARCHIVED" }))).await?;
    assert!(names(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_search_returns_only_callers_organisation() -> Result<()> {
    let (server, alice) = seeded().await?;

    let (status, body) = send(server.post("/project/search", &alice, &json!({}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Apollo Launch", "Gemini 100%", "apollo docs"]);

    let (_, body) = send(server.post("/project/search", &alice, &json!({ "name": "", "status": "" }))).await?;
    assert_eq!(names(&body).len(), 3);
    Ok(())
}

#[tokio::test]
async fn wildcards_in_name_are_literal() -> Result<()> {
    let (server, alice) = seeded().await?;

    let (_, body) = send(server.post("/project/search", &alice, &json!({ "name": "100%" }))).await?;
    assert_eq!(names(&body), vec!["Gemini 100%"]);

    let (_, body) = send(server.post("/project/search", &alice, &json!({ "name": "%" }))).await?;
    assert_eq!(names(&body), vec!["Gemini 100%"]);

    let (_, body) = send(server.post("/project/search", &alice, &json!({ "name": "_" }))).await?;
    assert!(names(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn search_without_body_lists_everything() -> Result<()> {
    let (server, alice) = seeded().await?;

    let bare = server.client.post(server.url("/project/search")).bearer_auth(&alice);
    let (status, body) = send(bare).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(names(&body), vec!["Apollo Launch", "Gemini 100%", "apollo docs"]);

    let broken = server
        .client
        .post(server.url("/project/search"))
        .bearer_auth(&alice)
        .header("content-type", "application/json")
        .body("{\"name\":");
    let (status, body) = send(broken).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_BODY");
    Ok(())
}
