// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pingrs::workers::log_sink::{log_channel, LogSink};
use std::time::Duration;

#[tokio::test]
async fn test_scenario_d_thousand_records_from_many_producers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario-d.log");

    let sink = LogSink::open(&path, Duration::from_secs(3600)).await.unwrap();
    let (log, rx) = log_channel(16);
    let (handle, drained) = sink.start(rx);

    let mut producers = Vec::new();
    for p in 0..4 {
        let log = log.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..250 {
                log.log(format!("producer {} record {}", p, i)).await;
            }
        }));
    }
    drop(log);
    for producer in futures::future::join_all(producers).await {
        producer.unwrap();
    }

    let report = drained.await.unwrap();
    handle.await.unwrap();
    assert_eq!(report.records_written, 1000);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1000);
    for p in 0..4 {
        assert!(content.contains(&format!("producer {} record 249", p)));
    }
}
