//! JSON-over-HTTP plumbing shared by the provider clients.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::HttpConfig;

#[derive(thiserror::Error, Debug)]
pub enum HttpError {
    #[error("request canceled")]
    Canceled,

    /// The server answered with a non-2xx status.
    #[error("{status}: {}", truncate_body(.body))]
    Status { status: StatusCode, body: String },

    #[error("perform http request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unmarshal response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Builds the client shared by all providers of one process.
pub fn build_client(config: &HttpConfig) -> Result<Client, HttpError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Performs a GET request and decodes a 2xx JSON body into `T`.
///
/// Returns [`HttpError::Canceled`] as soon as `cancel` fires, dropping the
/// in-flight request.
pub async fn get_json<T: DeserializeOwned>(
    http: &Client,
    cancel: &CancellationToken,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, HttpError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(HttpError::Canceled),
        result = fetch(http, url, query) => result,
    }
}

async fn fetch<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, HttpError> {
    let res = http.get(url).query(query).send().await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(HttpError::Status { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::StubServer;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::get};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Greeting {
        hello: String,
    }

    fn client() -> Client {
        build_client(&HttpConfig::default()).expect("client builds")
    }

    #[tokio::test]
    async fn decodes_success_body() {
        let server = StubServer::start(Router::new().route(
            "/greet",
            get(|| async { Json(serde_json::json!({ "hello": "world" })) }),
        ))
        .await;

        let got: Greeting = get_json(&client(), &CancellationToken::new(), &server.url("/greet"), &[])
            .await
            .expect("request should succeed");

        assert_eq!(got.hello, "world");
    }

    #[tokio::test]
    async fn non_success_status_keeps_code_and_body() {
        let server = StubServer::start(Router::new().route(
            "/missing",
            get(|| async { (AxumStatus::NOT_FOUND, "nothing here") }),
        ))
        .await;

        let err = get_json::<Greeting>(&client(), &CancellationToken::new(), &server.url("/missing"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Status { status: StatusCode::NOT_FOUND, .. }));
        assert!(err.to_string().contains("nothing here"));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let server = StubServer::start(
            Router::new().route("/garbage", get(|| async { "not json" })),
        )
        .await;

        let err = get_json::<Greeting>(&client(), &CancellationToken::new(), &server.url("/garbage"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Decode(_)));
    }

    #[tokio::test]
    async fn cancellation_returns_promptly() {
        let server = StubServer::start(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                "late"
            }),
        ))
        .await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            get_json::<Greeting>(&client(), &cancel, &server.url("/slow"), &[]),
        )
        .await
        .expect("cancellation should not block");

        assert!(matches!(result, Err(HttpError::Canceled)));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let shown = truncate_body(&body);
        assert_eq!(shown.len(), 203);
        assert!(shown.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
