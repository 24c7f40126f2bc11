// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;

async fn partial(headers: HeaderMap) -> Response {
    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let user_agent_is_browser = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| ua.contains("Firefox"));

    if range == "bytes=0-511" && user_agent_is_browser {
        (StatusCode::PARTIAL_CONTENT, "x".repeat(512)).into_response()
    } else {
        (StatusCode::BAD_REQUEST, format!("unexpected range: {}", range)).into_response()
    }
}

/// 启动本地测试服务器，返回基础地址
pub async fn start_test_server() -> String {
    let app = Router::new()
        .route("/ok", get(|| async { "x".repeat(64 * 1024) }))
        .route("/partial", get(partial))
        .route("/small", get(|| async { "x".repeat(512) }))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/forbidden",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    [("x-blocked-by", "test-waf")],
                    "denied",
                )
            }),
        )
        .route("/redirect", get(|| async { Redirect::temporary("/ok") }))
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// 返回一个当前没有监听者的本地地址
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}
