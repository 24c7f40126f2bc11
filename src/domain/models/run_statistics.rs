// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 运行统计
///
/// 在收集完所有结果后由调度器计算一次，之后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    /// URL 总数
    pub total_urls: usize,
    /// 成功数
    pub success_count: usize,
    /// 成功率（百分比）
    pub success_percentage: f64,
    /// 总耗时
    pub total_elapsed: Duration,
}

impl RunStatistics {
    /// 根据计数计算统计数据
    ///
    /// URL 总数为 0 时成功率记为 0，避免除零产生 NaN。
    pub fn compute(total_urls: usize, success_count: usize, total_elapsed: Duration) -> Self {
        let success_percentage = if total_urls == 0 {
            0.0
        } else {
            success_count as f64 / total_urls as f64 * 100.0
        };

        Self {
            total_urls,
            success_count,
            success_percentage,
            total_elapsed,
        }
    }

    /// 失败数
    pub fn failure_count(&self) -> usize {
        self.total_urls - self.success_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_urls == 0
    }
}
