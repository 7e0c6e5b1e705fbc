/// OCR 服务客户端
///
/// 每次调用完成一次"上传图片 → 取回响应"，不做重试，也不解析响应
use crate::config::Config;
use crate::error::{AppResult, FileError, TransportError};
use crate::infrastructure::{HttpSession, RawResponse};
use crate::models::PageImage;
use reqwest::multipart;
use tracing::debug;

/// OCR 客户端
pub struct OcrClient<'a> {
    session: &'a HttpSession,
    endpoint: String,
    lang: String,
    service: String,
    file_field: String,
}

impl<'a> OcrClient<'a> {
    /// 创建新的 OCR 客户端，会话由调用方持有
    pub fn new(session: &'a HttpSession, config: &Config) -> Self {
        Self {
            session,
            endpoint: config.recognise_url(),
            lang: config.lang.clone(),
            service: config.service.clone(),
            file_field: config.file_field.clone(),
        }
    }

    /// 上传一页图片
    ///
    /// # 返回
    /// - `Ok(RawResponse)`：收到了响应，状态码可能不是 2xx
    /// - `Err(AppError::Transport)`：连接失败或超时
    /// - `Err(AppError::File)`：读取图片失败
    pub async fn recognise(&self, page: &PageImage) -> AppResult<RawResponse> {
        let bytes = tokio::fs::read(&page.path)
            .await
            .map_err(|e| FileError::read_failed(&page.path, e))?;

        debug!(
            "上传 {} ({} 字节, {}) -> {}",
            page.filename,
            bytes.len(),
            page.media_type,
            self.endpoint
        );

        let part = multipart::Part::bytes(bytes)
            .file_name(page.filename.clone())
            .mime_str(&page.media_type)
            .map_err(|e| TransportError::new(&self.endpoint, e))?;

        let form = multipart::Form::new()
            .text("lang", self.lang.clone())
            .text("service", self.service.clone())
            .part(self.file_field.clone(), part);

        let response = self.session.post_multipart(&self.endpoint, form).await?;
        debug!("{} 响应: HTTP {}, {} 字节", page.filename, response.status, response.body.len());

        Ok(response)
    }
}
