//! 页面相关的数据结构

use std::fmt;
use std::path::PathBuf;

/// 一张待识别的页面图片，枚举后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub path: PathBuf,
    /// 从文件名 `page_<数字>` 解析，无法解析时为 0
    pub page_number: u64,
    pub filename: String,
    pub media_type: String,
}

/// 单次尝试的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    /// 收到响应但没有可用文本（或者是失败提示语）
    EmptyText,
    /// 非 2xx 响应，或请求根本没有送达（此时 http_status 为 None）
    HttpError,
}

impl Classification {
    pub fn is_success(self) -> bool {
        matches!(self, Classification::Success)
    }
}

/// 单次尝试的结果，用完即弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    /// 从 1 开始
    pub attempt_index: u32,
    pub http_status: Option<u16>,
    pub extracted_text: String,
    pub classification: Classification,
}

/// 识别成功的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub page_number: u64,
    pub text: String,
}

/// 重试耗尽后仍失败的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPage {
    pub page_number: u64,
    pub filename: String,
}

impl fmt::Display for FailedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page_{} ({})", self.page_number, self.filename)
    }
}

/// 单页最终结果：要么成功，要么失败，二者取其一
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Succeeded { result: PageResult, attempts: u32 },
    Exhausted { failed: FailedPage, attempts: u32 },
}

impl PageOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            PageOutcome::Succeeded { attempts, .. } | PageOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }
}
