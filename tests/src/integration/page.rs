#![cfg(test)]
use interaction::config::Config;
use miette::{IntoDiagnostic, Result};

use crate::server::TestServer;

async fn post_body(url: &str, body: &'static str) -> Result<(u16, String)> {
    let response = reqwest::Client::new()
        .post(url)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .into_diagnostic()?;

    let status = response.status().as_u16();
    Ok((status, response.text().await.into_diagnostic()?))
}

#[tokio::test]
async fn test_get_renders_form() -> Result<()> {
    let server = TestServer::start().await?;

    let response = reqwest::get(server.url("/")).await.into_diagnostic()?;
    assert_eq!(response.status(), 200);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));

    let body = response.text().await.into_diagnostic()?;
    assert!(body.contains(r#"<form method="post" action="/">"#));
    assert!(body.contains(r#"name="name""#));
    assert!(body.contains("required"));
    assert!(!body.contains("Hello,"));

    server.stop().await
}

#[tokio::test]
async fn test_post_greets() -> Result<()> {
    let server = TestServer::start().await?;

    let body = reqwest::Client::new()
        .post(server.url("/"))
        .form(&[("name", "World")])
        .send()
        .await
        .into_diagnostic()?
        .text()
        .await
        .into_diagnostic()?;

    assert!(body.contains("Hello, World!"));
    assert!(body.contains(r#"<form method="post" action="/">"#));

    server.stop().await
}

#[tokio::test]
async fn test_post_escapes_script() -> Result<()> {
    let server = TestServer::start().await?;

    let body = reqwest::Client::new()
        .post(server.url("/"))
        .form(&[("name", "<script>alert(1)</script>")])
        .send()
        .await
        .into_diagnostic()?
        .text()
        .await
        .into_diagnostic()?;

    assert!(body.contains("Hello, &lt;script&gt;alert(1)&lt;/script&gt;!"));
    assert!(!body.contains("<script>"));

    server.stop().await
}

#[tokio::test]
async fn test_post_without_name() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = post_body(&server.url("/"), "").await?;
    assert_eq!(status, 200);
    assert!(body.contains("Hello, !"));

    let (status, body) = post_body(&server.url("/"), "nickname=Ada").await?;
    assert_eq!(status, 200);
    assert!(body.contains("Hello, !"));

    server.stop().await
}

#[tokio::test]
async fn test_post_malformed_body() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = post_body(&server.url("/"), "%zz&&=&name=%E2%28").await?;
    assert_eq!(status, 200);
    assert!(body.contains("Hello, \u{FFFD}(!"));

    let response = reqwest::Client::new()
        .post(server.url("/"))
        .header("content-type", "application/json")
        .body(r#"{"name":"json"}"#)
        .send()
        .await
        .into_diagnostic()?;
    assert_eq!(response.status(), 200);
    let body = response.text().await.into_diagnostic()?;
    assert!(body.contains("Hello, !"));

    server.stop().await
}

#[tokio::test]
async fn test_action_reflects_escaped_path() -> Result<()> {
    let server = TestServer::start().await?;

    let body = reqwest::get(server.url("/a&b/interaction.php?x=1&y=2"))
        .await
        .into_diagnostic()?
        .text()
        .await
        .into_diagnostic()?;

    assert!(body.contains(r#"action="/a&amp;b/interaction.php""#));
    assert!(!body.contains("x=1"));

    server.stop().await
}

#[tokio::test]
async fn test_repeated_post_is_identical() -> Result<()> {
    let server = TestServer::start().await?;

    let (_, first) = post_body(&server.url("/"), "name=Ada").await?;
    let (_, second) = post_body(&server.url("/"), "name=Ada").await?;
    assert_eq!(first, second);

    let (_, other) = post_body(&server.url("/"), "name=Grace").await?;
    assert!(!other.contains("Ada"));

    server.stop().await
}

#[tokio::test]
async fn test_unsupported_method() -> Result<()> {
    let server = TestServer::start().await?;

    let response = reqwest::Client::new()
        .put(server.url("/"))
        .body("name=World")
        .send()
        .await
        .into_diagnostic()?;
    assert_eq!(response.status(), 405);

    server.stop().await
}

#[tokio::test]
async fn test_configured_page_path_and_copy() -> Result<()> {
    let config = Config::from_toml(
        r#"
        [web]
        page_path = "/interaction.php"

        [page]
        title = "PHP User Interaction"
        heading = "PHP User Interaction"
        "#,
    )?;
    let server = TestServer::with_config(config).await?;

    let (status, body) = post_body(&server.url("/interaction.php"), "name=World").await?;
    assert_eq!(status, 200);
    assert!(body.contains("<title>PHP User Interaction</title>"));
    assert!(body.contains(r#"action="/interaction.php""#));
    assert!(body.contains("Hello, World!"));

    let response = reqwest::get(server.url("/")).await.into_diagnostic()?;
    assert_eq!(response.status(), 404);

    server.stop().await
}
