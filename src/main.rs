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

use anyhow::Context;
use pingrs::application::dispatcher::{DispatchConfig, Dispatcher};
use pingrs::config::settings::Settings;
use pingrs::infrastructure::metrics::init_metrics;
use pingrs::infrastructure::url_source::FileUrlSource;
use pingrs::probes::build_probe;
use pingrs::utils::telemetry;
use std::sync::Arc;
use tracing::{debug, info};

/// 主函数
///
/// 加载配置，构建探测策略，执行一次完整运行
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting pingrs...");
    let metrics_handle = init_metrics().context("failed to install metrics recorder")?;

    // 2. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    info!(
        "Configuration loaded: {} probe, {} workers, {}s deadline",
        settings.probe.method, settings.probe.workers, settings.probe.timeout_secs
    );

    // 3. Build probe strategy and URL source
    let probe = build_probe(&settings.probe).context("failed to build probe")?;
    let source = Arc::new(FileUrlSource::new(&settings.source.path));

    // 4. Run
    let dispatcher = Dispatcher::new(source, probe, DispatchConfig::from_settings(&settings));
    let stats = dispatcher.run().await.context("probe run failed")?;

    info!(
        "{:.2}% of {} URLs reachable in {:.3}s",
        stats.success_percentage,
        stats.total_urls,
        stats.total_elapsed.as_secs_f64()
    );
    debug!("Run metrics:\n{}", metrics_handle.render());

    Ok(())
}
