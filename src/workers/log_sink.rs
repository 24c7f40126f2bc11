// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::LogRecord;
use crate::utils::errors::SinkError;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// 创建日志队列
///
/// # 参数
///
/// * `capacity` - 队列容量，满时发送方等待
pub fn log_channel(capacity: usize) -> (LogSender, mpsc::Receiver<LogRecord>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (LogSender { tx }, rx)
}

/// 日志队列发送端
///
/// 所有发送端都被丢弃后，日志队列即视为关闭。
#[derive(Clone, Debug)]
pub struct LogSender {
    tx: mpsc::Sender<LogRecord>,
}

impl LogSender {
    /// 发送一条日志
    ///
    /// 接收器已退出时改为写入诊断日志，不会静默丢弃
    pub async fn log(&self, message: impl Into<String>) {
        if let Err(e) = self.tx.send(LogRecord::new(message)).await {
            warn!("Log sink unavailable, record not persisted: {}", e.0.message);
        }
    }
}

/// 排空完成信号携带的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// 写入缓冲区的记录数
    pub records_written: u64,
    /// 写入失败次数
    pub write_failures: u64,
    /// 刷新失败次数
    pub flush_failures: u64,
}

/// 日志接收器的底层写入端
///
/// `sync` 在每次刷新缓冲区之后调用，用于把数据落到持久存储
#[async_trait]
pub trait LogWriter: AsyncWrite + Unpin + Send + 'static {
    async fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl LogWriter for File {
    async fn sync(&mut self) -> io::Result<()> {
        self.sync_data().await
    }
}

/// 持久日志接收器
///
/// 独占日志文件句柄与写缓冲区，单任务运行：收到记录时追加到缓冲区，
/// 定时器触发时刷新到磁盘，队列关闭后做最后一次刷新并发出排空信号。
pub struct LogSink<W: LogWriter = File> {
    path: PathBuf,
    writer: BufWriter<W>,
    flush_interval: Duration,
    report: SinkReport,
}

impl LogSink<File> {
    /// 以追加模式打开日志文件，不存在时创建
    ///
    /// # 参数
    ///
    /// * `path` - 日志文件路径，缺失的父目录会被创建
    /// * `flush_interval` - 定时刷新间隔
    ///
    /// # 返回值
    ///
    /// * `Ok(LogSink)` - 已打开的接收器
    /// * `Err(SinkError::Open)` - 文件无法打开
    pub async fn open(path: impl AsRef<Path>, flush_interval: Duration) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| SinkError::Open {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(open_error)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(open_error)?;

        Ok(Self::with_writer(path, file, flush_interval))
    }
}

impl<W: LogWriter> LogSink<W> {
    /// 基于任意写入端创建接收器
    ///
    /// `path` 只用于诊断输出
    pub fn with_writer(path: impl Into<PathBuf>, writer: W, flush_interval: Duration) -> Self {
        Self {
            path: path.into(),
            writer: BufWriter::new(writer),
            flush_interval,
            report: SinkReport::default(),
        }
    }

    /// 日志文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 在后台启动接收器
    ///
    /// # 返回值
    ///
    /// 后台任务句柄和排空完成信号的接收端
    pub fn start(
        self,
        records: mpsc::Receiver<LogRecord>,
    ) -> (JoinHandle<()>, oneshot::Receiver<SinkReport>) {
        let (drained_tx, drained_rx) = oneshot::channel();
        let handle = tokio::spawn(self.run(records, drained_tx));
        (handle, drained_rx)
    }

    /// 运行接收器直到日志队列关闭
    ///
    /// 队列关闭后执行最后一次刷新，然后恰好发出一次排空信号
    pub async fn run(
        mut self,
        mut records: mpsc::Receiver<LogRecord>,
        drained: oneshot::Sender<SinkReport>,
    ) {
        debug!("Log sink started for {}", self.path.display());

        let period = self.flush_interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                record = records.recv() => match record {
                    Some(record) => {
                        if let Err(e) = self.append(&record).await {
                            self.report.write_failures += 1;
                            error!("{}", e);
                        }
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    if let Err(e) = self.flush().await {
                        self.report.flush_failures += 1;
                        error!("{}", e);
                    }
                }
            }
        }

        if let Err(e) = self.flush().await {
            self.report.flush_failures += 1;
            error!("Final flush before shutdown failed: {}", e);
        }

        info!(
            "Log sink drained: {} records written to {}",
            self.report.records_written,
            self.path.display()
        );

        if drained.send(self.report).is_err() {
            debug!("Nobody is waiting for the log sink drained signal");
        }
    }

    async fn append(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        self.writer
            .write_all(record.message.as_bytes())
            .await
            .map_err(SinkError::Write)?;
        self.writer.write_all(b"\n").await.map_err(SinkError::Write)?;
        self.report.records_written += 1;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().await.map_err(SinkError::Flush)?;
        self.writer
            .get_mut()
            .sync()
            .await
            .map_err(SinkError::Flush)
    }
}

#[cfg(test)]
#[path = "log_sink_test.rs"]
mod tests;
