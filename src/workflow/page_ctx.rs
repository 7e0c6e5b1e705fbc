//! 页面处理上下文
//!
//! 封装"我正在处理第几张图、它是第几页"这一信息

use std::fmt::Display;

/// 页面处理上下文
#[derive(Debug, Clone)]
pub struct PageCtx {
    /// 在本次运行中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本次运行的页面总数
    pub total: usize,

    /// 解析出的页码
    pub page_number: u64,

    pub filename: String,
}

impl PageCtx {
    pub fn new(index: usize, total: usize, page_number: u64, filename: impl Into<String>) -> Self {
        Self {
            index,
            total,
            page_number,
            filename: filename.into(),
        }
    }
}

impl Display for PageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{} 第{}页 {}]", self.index, self.total, self.page_number, self.filename)
    }
}
