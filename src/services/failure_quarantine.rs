//! 失败隔离服务 - 业务能力层
//!
//! 只负责"把识别失败的原图复制到隔离目录"能力，不关心流程

use crate::error::{AppResult, FileError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 失败隔离服务
///
/// 职责：
/// - 按原文件名把图片原样复制到隔离目录
/// - 只处理单个页面
/// - 同名文件直接覆盖
pub struct FailureQuarantine {
    dir: PathBuf,
}

impl FailureQuarantine {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 隔离一张图片，返回副本路径
    pub async fn quarantine(&self, source: &Path) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| FileError::create_dir_failed(&self.dir, e))?;

        let filename = source.file_name().unwrap_or(source.as_os_str());
        let target = self.dir.join(filename);

        debug!("隔离 {} -> {}", source.display(), target.display());

        fs::copy(source, &target)
            .await
            .map_err(|e| FileError::CopyFailed {
                from: source.display().to_string(),
                to: target.display().to_string(),
                source: e,
            })?;

        Ok(target)
    }
}
