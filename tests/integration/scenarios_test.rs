// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{dispatch_config, refused_url, run_with, start_test_server};
use pingrs::config::settings::{ProbeMethod, ProbeSettings};
use pingrs::probes::build_probe;
use std::time::Duration;

fn probe_settings(method: ProbeMethod) -> ProbeSettings {
    ProbeSettings {
        method,
        timeout_secs: 10,
        workers: 3,
        icmp_count: 3,
    }
}

async fn one_missing_of_five(method: ProbeMethod) {
    let server = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("scenario-a.log");

    let mut urls: Vec<String> = (0..4).map(|_| format!("{}/ok", server)).collect();
    urls.push(format!("{}/missing", server));

    let probe = build_probe(&probe_settings(method)).unwrap();
    let stats = run_with(
        probe,
        urls,
        dispatch_config(&log_path, 3, Duration::from_secs(10)),
    )
    .await
    .unwrap();

    assert_eq!(stats.total_urls, 5);
    assert_eq!(stats.success_count, 4);
    assert_eq!(stats.failure_count(), 1);
    assert_eq!(format!("{:.2}", stats.success_percentage), "80.00");

    let content = std::fs::read_to_string(&log_path).unwrap();
    let failures: Vec<&str> = content
        .lines()
        .filter(|l| l.contains("Error probing"))
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("404"));
    assert!(failures[0].contains("/missing"));
    assert!(content.contains("80.00% of the URLs were successfully probed."));
}

#[tokio::test]
async fn test_scenario_a_range_get_one_not_found() {
    one_missing_of_five(ProbeMethod::RangeGet).await;
}

#[tokio::test]
async fn test_scenario_a_head_one_not_found() {
    one_missing_of_five(ProbeMethod::Head).await;
}

#[tokio::test]
async fn test_scenario_b_connection_refused() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("scenario-b.log");
    let url = refused_url().await;

    let probe = build_probe(&probe_settings(ProbeMethod::RangeGet)).unwrap();
    let stats = run_with(
        probe,
        vec![url.clone()],
        dispatch_config(&log_path, 1, Duration::from_secs(10)),
    )
    .await
    .unwrap();

    assert_eq!(stats.total_urls, 1);
    assert_eq!(stats.success_count, 0);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let line = content
        .lines()
        .find(|l| l.contains("Error probing"))
        .unwrap();
    assert!(line.contains("Worker 0"));
    assert!(line.contains(&url));
    assert!(line.contains("[network_error]"));
}

#[tokio::test]
async fn test_scenario_c_slow_endpoint_times_out_and_worker_moves_on() {
    let server = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("scenario-c.log");

    let urls = vec![format!("{}/slow", server), format!("{}/ok", server)];
    let probe = build_probe(&probe_settings(ProbeMethod::RangeGet)).unwrap();

    let started = std::time::Instant::now();
    let stats = run_with(
        probe,
        urls,
        dispatch_config(&log_path, 1, Duration::from_millis(300)),
    )
    .await
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(stats.total_urls, 2);
    assert_eq!(stats.success_count, 1);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let line = content.lines().find(|l| l.contains("timed out")).unwrap();
    assert!(line.contains("/slow"));
    assert!(line.contains("[timeout]"));
}

#[tokio::test]
async fn test_plain_get_against_live_server() {
    let server = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("plain.log");

    let probe = build_probe(&probe_settings(ProbeMethod::PlainGet)).unwrap();
    let stats = run_with(
        probe,
        vec![format!("{}/ok", server), format!("{}/missing", server)],
        dispatch_config(&log_path, 2, Duration::from_secs(10)),
    )
    .await
    .unwrap();

    assert_eq!(stats.success_count, 1);
    assert_eq!(format!("{:.2}", stats.success_percentage), "50.00");
}
