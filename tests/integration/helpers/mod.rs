// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{http::StatusCode, routing::get, Router};
use pingrs::application::dispatcher::{DispatchConfig, Dispatcher};
use pingrs::domain::models::RunStatistics;
use pingrs::infrastructure::url_source::StaticUrlSource;
use pingrs::probes::ProbeStrategy;
use pingrs::utils::errors::RunError;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// 启动本地测试服务器，返回基础地址
pub async fn start_test_server() -> String {
    let app = Router::new()
        .route("/ok", get(|| async { "alive" }))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
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

pub fn dispatch_config(log_path: &Path, workers: usize, deadline: Duration) -> DispatchConfig {
    DispatchConfig {
        workers,
        deadline,
        log_path: log_path.to_path_buf(),
        flush_interval: Duration::from_secs(3600),
        log_queue_capacity: 100,
    }
}

/// 使用给定探测策略执行一次运行
pub async fn run_with(
    probe: Arc<dyn ProbeStrategy>,
    urls: Vec<String>,
    config: DispatchConfig,
) -> Result<RunStatistics, RunError> {
    Dispatcher::new(Arc::new(StaticUrlSource::new(urls)), probe, config)
        .run()
        .await
}
