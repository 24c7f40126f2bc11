// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::SinkError;
use crate::workers::log_sink::{log_channel, LogSink, LogWriter};
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::sync::oneshot::error::TryRecvError;

const HOUR: Duration = Duration::from_secs(3600);

#[derive(Default)]
struct FlakyState {
    written: Vec<u8>,
    failing_writes: usize,
    failing_flushes: usize,
    flushes: usize,
}

/// 内存写入端，前若干次写入或刷新返回错误
#[derive(Clone, Default)]
struct FlakyWriter {
    state: Arc<Mutex<FlakyState>>,
}

impl FlakyWriter {
    fn failing(writes: usize, flushes: usize) -> Self {
        let writer = Self::default();
        {
            let mut state = writer.state.lock().unwrap();
            state.failing_writes = writes;
            state.failing_flushes = flushes;
        }
        writer
    }

    fn contents(&self) -> String {
        String::from_utf8(self.state.lock().unwrap().written.clone()).unwrap()
    }

    fn flushes(&self) -> usize {
        self.state.lock().unwrap().flushes
    }
}

impl AsyncWrite for FlakyWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut state = self.state.lock().unwrap();
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "disk full")));
        }
        state.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let mut state = self.state.lock().unwrap();
        state.flushes += 1;
        if state.failing_flushes > 0 {
            state.failing_flushes -= 1;
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "device busy")));
        }
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl LogWriter for FlakyWriter {}

#[tokio::test]
async fn test_burst_of_records_survives_batching() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("burst.log");

    let sink = LogSink::open(&path, HOUR).await.unwrap();
    let (log, rx) = log_channel(100);
    let (handle, drained) = sink.start(rx);

    for i in 0..1000 {
        log.log(format!("record {}", i)).await;
    }
    drop(log);

    let report = drained.await.unwrap();
    handle.await.unwrap();

    assert_eq!(report.records_written, 1000);
    assert_eq!(report.flush_failures, 0);

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1000);
    assert_eq!(lines[0], "record 0");
    assert_eq!(lines[999], "record 999");
}

#[tokio::test]
async fn test_drained_only_after_queue_closed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drain.log");

    let sink = LogSink::open(&path, HOUR).await.unwrap();
    let (log, rx) = log_channel(10);
    let (handle, mut drained) = sink.start(rx);

    log.log("still running").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(matches!(drained.try_recv(), Err(TryRecvError::Empty)));

    drop(log);
    handle.await.unwrap();
    let report = drained.try_recv().unwrap();
    assert_eq!(report.records_written, 1);

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(content, "still running\n");
}

#[tokio::test]
async fn test_periodic_flush_persists_before_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tick.log");

    let sink = LogSink::open(&path, Duration::from_millis(20)).await.unwrap();
    let (log, rx) = log_channel(10);
    let (handle, drained) = sink.start(rx);

    log.log("flushed by timer").await;

    let mut persisted = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        if content == "flushed by timer\n" {
            persisted = true;
            break;
        }
    }
    assert!(persisted, "timer flush never reached the file");

    drop(log);
    drained.await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_appends_to_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("append.log");
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    tokio::fs::write(&path, "previous run\n").await.unwrap();

    let sink = LogSink::open(&path, HOUR).await.unwrap();
    let (log, rx) = log_channel(10);
    let (handle, drained) = sink.start(rx);
    log.log("this run").await;
    drop(log);
    drained.await.unwrap();
    handle.await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(content, "previous run\nthis run\n");
}

#[tokio::test]
async fn test_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("run.log");

    let sink = LogSink::open(&path, HOUR).await.unwrap();
    assert_eq!(sink.path(), path.as_path());
    assert!(path.exists());
}

#[tokio::test]
async fn test_open_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    let result = LogSink::open(dir.path(), HOUR).await;
    assert!(matches!(result, Err(SinkError::Open { .. })));
}

#[tokio::test]
async fn test_sender_survives_sink_exit() {
    let (log, rx) = log_channel(1);
    drop(rx);

    log.log("nobody listening").await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_periodic_flush_is_not_fatal() {
    let writer = FlakyWriter::failing(0, 1);
    let sink = LogSink::with_writer("memory.log", writer.clone(), Duration::from_millis(100));
    let (log, rx) = log_channel(10);
    let (handle, drained) = sink.start(rx);

    log.log("before failure").await;
    // Two ticks elapse; the first flush fails, the second succeeds.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(writer.flushes() >= 2);

    log.log("after failure").await;
    drop(log);

    let report = drained.await.unwrap();
    handle.await.unwrap();

    assert_eq!(report.flush_failures, 1);
    assert_eq!(report.write_failures, 0);
    assert_eq!(report.records_written, 2);
    assert_eq!(writer.contents(), "before failure\nafter failure\n");
}

#[tokio::test]
async fn test_failed_write_is_not_fatal() {
    let writer = FlakyWriter::failing(1, 0);
    let sink = LogSink::with_writer("memory.log", writer.clone(), HOUR);
    let (log, rx) = log_channel(10);
    let (handle, drained) = sink.start(rx);

    // Larger than the write buffer, so it goes straight to the failing writer.
    log.log("x".repeat(64 * 1024)).await;
    log.log("kept").await;
    drop(log);

    let report = drained.await.unwrap();
    handle.await.unwrap();

    assert_eq!(report.write_failures, 1);
    assert_eq!(report.flush_failures, 0);
    assert_eq!(report.records_written, 1);
    assert_eq!(writer.contents(), "kept\n");
}

#[tokio::test]
async fn test_failed_final_flush_still_signals_drained() {
    let writer = FlakyWriter::failing(0, 1);
    let sink = LogSink::with_writer("memory.log", writer.clone(), HOUR);
    let (log, rx) = log_channel(10);
    let (handle, mut drained) = sink.start(rx);

    log.log("last words").await;
    drop(log);
    handle.await.unwrap();

    let report = drained.try_recv().unwrap();
    assert_eq!(report.flush_failures, 1);
    assert_eq!(report.records_written, 1);
    assert!(matches!(drained.try_recv(), Err(TryRecvError::Closed)));
}
