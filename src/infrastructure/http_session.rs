//! HTTP 会话 - 基础设施层
//!
//! 持有唯一的 `reqwest::Client`（连接池、cookie、默认请求头），只暴露能力：
//! - 预热：GET 根地址拿 cookie，失败只记录日志
//! - 发送 multipart 表单
//!
//! 创建之后只读，不认识 Page / 重试

use crate::config::Config;
use crate::error::TransportError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use reqwest::{multipart, Client};
use tracing::{debug, info, warn};

/// 原始响应：状态码 + 正文（JSON 或 HTML）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP 会话
pub struct HttpSession {
    client: Client,
    base_url: String,
    bootstrap_timeout: std::time::Duration,
}

impl HttpSession {
    /// 按配置创建会话
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers(&config.base_url))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::new(&config.base_url, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            bootstrap_timeout: config.bootstrap_timeout,
        })
    }

    /// 预热会话以获取 cookie，返回是否成功；失败不影响后续处理
    pub async fn bootstrap(&self) -> bool {
        debug!("正在预热会话: {}", self.base_url);
        match self
            .client
            .get(&self.base_url)
            .timeout(self.bootstrap_timeout)
            .send()
            .await
        {
            Ok(resp) => {
                info!("✓ 会话预热完成 (HTTP {})", resp.status().as_u16());
                true
            }
            Err(e) => {
                warn!("⚠️ 会话预热失败，将不带 cookie 继续: {}", e);
                false
            }
        }
    }

    /// 发送 multipart 表单，非 2xx 也按正常响应返回
    pub async fn post_multipart(
        &self,
        url: &str,
        form: multipart::Form,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::new(url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::new(url, e))?;

        Ok(RawResponse { status, body })
    }
}

fn default_headers(base_url: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9,hi;q=0.8"));
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    if let Ok(value) = HeaderValue::from_str(base_url) {
        headers.insert(REFERER, value);
    }
    if let Ok(value) = HeaderValue::from_str(base_url.trim_end_matches('/')) {
        headers.insert(ORIGIN, value);
    }
    headers
}
