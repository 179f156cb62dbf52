//! Canvas API 客户端
//!
//! 封装带鉴权的 REST 调用与分页跟随。除连接复用外不持有任何状态

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, ReportError};
use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

/// Canvas API 客户端
///
/// 每次调用都会附带 Bearer 令牌。发现与参与度统计共享同一个实例；
/// 报表任务通过 `from_parts` 各自持有独立连接
pub struct CanvasClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl CanvasClient {
    /// 创建新的 Canvas 客户端
    pub fn new(config: &Config) -> Self {
        Self::from_parts(&config.canvas_base_url, &config.canvas_api_token)
    }

    /// 由基础 URL 与令牌创建（报表任务用它建立独立连接）
    pub fn from_parts(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            token: token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// 发起一次 API 调用
    ///
    /// # 参数
    /// - `method`: HTTP 方法
    /// - `endpoint`: 以 `/` 开头的相对路径（可内联查询串）
    /// - `payload`: GET 时作为查询参数，否则作为 JSON 请求体
    /// - `paginated`: 为 true 时跟随响应头中的 `Link: rel="next"` 链接，
    ///   按顺序累积所有页；任何一页失败都会丢弃已累积的页，整个调用
    ///   返回单个错误
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&Value>,
        paginated: bool,
    ) -> AppResult<Value> {
        if self.base_url.is_empty() {
            return Err(AppError::Config(ConfigError::BaseUrlNotSet));
        }

        let mut url = format!("{}{}", self.base_url, endpoint);
        let mut results: Vec<Value> = Vec::new();

        loop {
            let mut builder = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&self.token);
            if let Some(payload) = payload {
                builder = if method == Method::GET {
                    builder.query(payload)
                } else {
                    builder.json(payload)
                };
            }

            let response = builder.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::api_bad_response(&url, status.as_u16(), body));
            }

            let next_url = if paginated {
                response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|h| h.to_str().ok())
                    .and_then(parse_next_link)
            } else {
                None
            };

            let data: Value = response.json().await?;
            if !paginated {
                return Ok(data);
            }

            match data {
                Value::Array(items) => results.extend(items),
                other => results.push(other),
            }

            match next_url {
                Some(next) => {
                    debug!("跟随下一页: {}", next);
                    url = next;
                }
                None => break,
            }
        }

        Ok(Value::Array(results))
    }

    /// GET 单页
    pub async fn get(&self, endpoint: &str) -> AppResult<Value> {
        self.request(Method::GET, endpoint, None, false).await
    }

    /// GET 并跟随分页
    pub async fn get_paginated(&self, endpoint: &str) -> AppResult<Vec<Value>> {
        let data = self.request(Method::GET, endpoint, None, true).await?;
        match data {
            Value::Array(items) => Ok(items),
            other => Ok(vec![other]),
        }
    }

    /// POST JSON
    pub async fn post(&self, endpoint: &str, payload: &Value) -> AppResult<Value> {
        self.request(Method::POST, endpoint, Some(payload), false)
            .await
    }

    /// GET 服务端下发的绝对 URL（报表进度接口返回的就是绝对地址）
    pub async fn get_absolute(&self, url: &str) -> AppResult<Value> {
        let response = self.http.get(url).bearer_auth(&self.token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::api_bad_response(url, status.as_u16(), body));
        }
        Ok(response.json().await?)
    }

    /// 下载签名文件 URL（签名已含在 URL 中，不附带鉴权头）
    pub async fn download(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Report(ReportError::DownloadFailed {
                status: status.as_u16(),
            }));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// 从 Link 响应头中提取 rel="next" 的 URL
fn parse_next_link(header: &str) -> Option<String> {
    let re = Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).ok()?;
    re.captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
