//! REST Client Integration Tests
//!
//! Drives `IexClient` against an in-process TCP server returning canned
//! HTTP responses, covering each body classification end to end.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use iex_rest::{ApiBody, IexClient};

/// Serve one canned HTTP response, returning the endpoint to request.
async fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Drain the request head before answering
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;

        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn json_responses_are_parsed() {
    let endpoint = serve_once(
        "HTTP/1.1 200 OK\r\n\
         content-type: application/json; charset=utf-8\r\n\
         content-length: 22\r\n\
         \r\n\
         {\"latestPrice\":187.42}",
    )
    .await;

    let client = IexClient::with_endpoint(endpoint);
    let body = client.stock_price("AAPL").await.unwrap();

    assert_eq!(body.as_json().unwrap()["latestPrice"], 187.42);
}

#[tokio::test]
async fn responses_without_content_type_are_empty() {
    let endpoint = serve_once(
        "HTTP/1.1 200 OK\r\n\
         content-length: 0\r\n\
         \r\n",
    )
    .await;

    let client = IexClient::with_endpoint(endpoint);
    let body = client.request("/stock/AAPL/quote").await.unwrap();

    assert_eq!(body, ApiBody::Empty);
}

#[tokio::test]
async fn non_json_responses_pass_through_verbatim() {
    let endpoint = serve_once(
        "HTTP/1.1 200 OK\r\n\
         content-type: text/csv\r\n\
         content-length: 7\r\n\
         \r\n\
         a,b\n1,2",
    )
    .await;

    let client = IexClient::with_endpoint(endpoint);
    let body = client.request("/stock/market/list/gainers").await.unwrap();

    assert_eq!(body.as_text().unwrap(), "a,b\n1,2");
}

#[tokio::test]
async fn json_claim_with_bad_body_errors() {
    let endpoint = serve_once(
        "HTTP/1.1 200 OK\r\n\
         content-type: application/json\r\n\
         content-length: 4\r\n\
         \r\n\
         {bad",
    )
    .await;

    let client = IexClient::with_endpoint(endpoint);
    assert!(client.request("/ref-data/symbols").await.is_err());
}
