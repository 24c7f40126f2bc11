// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::probes::traits::ProbeError;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::Response;
use std::collections::BTreeMap;

/// 浏览器 User-Agent
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0";

/// 浏览器 Accept 头
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// 构建探测用的 HTTP 客户端
///
/// 不设置客户端级超时，截止时间由 `run_with_deadline` 统一控制
pub fn build_client(redirect: Policy) -> Result<reqwest::Client, ProbeError> {
    let client = reqwest::Client::builder().redirect(redirect).build()?;
    Ok(client)
}

/// 读取并丢弃响应体，直到读满 `limit` 字节或响应结束
///
/// 响应体按数据块读取，越过上限的那个块会被整体读入；之后不再读取，
/// 响应随之被丢弃，剩余数据不会被下载。
///
/// # 返回值
///
/// 实际读取的字节数，可能大于 `limit`
pub async fn discard_body(mut response: Response, limit: usize) -> Result<usize, ProbeError> {
    let mut read = 0;
    while read < limit {
        match response.chunk().await? {
            Some(chunk) => read += chunk.len(),
            None => break,
        }
    }
    Ok(read)
}

/// 将 403 响应头序列化为诊断日志
pub fn forbidden_diagnostic(url: &str, headers: &HeaderMap) -> String {
    let mut map: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        map.entry(name.as_str())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    match serde_json::to_string(&map) {
        Ok(json) => format!("403 Forbidden for URL {}: Headers: {}", url, json),
        Err(e) => format!("Error marshalling headers for URL {}: {}", url, e),
    }
}
