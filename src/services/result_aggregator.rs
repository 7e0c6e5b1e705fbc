//! 结果汇总服务 - 业务能力层
//!
//! 收集识别成功的页面，按页码排序后写成一个合并文件

use crate::error::{AppResult, FileError};
use crate::models::PageResult;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 结果汇总服务
#[derive(Debug, Default)]
pub struct ResultAggregator {
    pages: Vec<PageResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一页识别结果
    pub fn push(&mut self, result: PageResult) {
        debug!("记录第 {} 页, {} 字符", result.page_number, result.text.chars().count());
        self.pages.push(result);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// 按页码排序后的合并文本，页码相同的按记录顺序排列
    pub fn render(&self) -> String {
        let mut pages: Vec<&PageResult> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.page_number);

        pages
            .into_iter()
            .map(|p| format!("=== Page {} ===\n{}\n\n", p.page_number, p.text))
            .collect()
    }

    /// 写出合并文件
    ///
    /// # 返回
    /// - `Ok(Some(path))`：已写出
    /// - `Ok(None)`：没有任何成功页面，不产生文件
    pub async fn write_to(&self, path: &Path) -> AppResult<Option<PathBuf>> {
        if self.is_empty() {
            return Ok(None);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::create_dir_failed(parent, e))?;
        }

        fs::write(path, self.render())
            .await
            .map_err(|e| FileError::write_failed(path, e))?;

        Ok(Some(path.to_path_buf()))
    }
}
