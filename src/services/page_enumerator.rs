//! 页面枚举服务 - 业务能力层
//!
//! 扫描输入目录，按页码排序返回待识别的图片

use crate::models::PageImage;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use tokio::fs;
use tracing::{debug, warn};

/// 扩展名白名单（`ImageExtensions` 模式使用）
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "tif", "bmp"];

/// 文件筛选方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFilter {
    /// 文件名形如 `page_*.*`，不限扩展名
    Glob,
    /// 只要扩展名在白名单内的图片
    ImageExtensions,
}

impl FromStr for PageFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glob" => Ok(PageFilter::Glob),
            "extensions" | "images" => Ok(PageFilter::ImageExtensions),
            other => Err(format!("未知的页面筛选方式: {}", other)),
        }
    }
}

impl PageFilter {
    /// 文件名是否应当作为页面处理
    pub fn accepts(self, filename: &str) -> bool {
        match self {
            PageFilter::Glob => filename
                .strip_prefix("page_")
                .map(|rest| rest.contains('.'))
                .unwrap_or(false),
            PageFilter::ImageExtensions => Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false),
        }
    }
}

fn page_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"page_(\d+)").expect("页码正则无效"))
}

/// 从文件名中解析页码，找不到 `page_<数字>` 时返回 0
pub fn parse_page_number(filename: &str) -> u64 {
    let Some(digits) = page_number_regex().captures(filename).and_then(|c| c.get(1)) else {
        return 0;
    };
    match digits.as_str().parse() {
        Ok(n) => n,
        Err(_) => {
            warn!("⚠️ {} 的页码 {} 超出范围，按 0 处理", filename, digits.as_str());
            0
        }
    }
}

/// 根据扩展名推断媒体类型
pub fn infer_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// 页面枚举服务
pub struct PageEnumerator {
    filter: PageFilter,
}

impl PageEnumerator {
    pub fn new(filter: PageFilter) -> Self {
        Self { filter }
    }

    /// 枚举目录中的页面
    ///
    /// 先按文件名排序得到确定的列表顺序，再按页码稳定排序，
    /// 页码相同（包括都解析为 0）的文件保持文件名顺序。
    /// 目录不存在时返回空列表。
    pub async fn enumerate(&self, dir: &Path) -> Result<Vec<PageImage>> {
        if !fs::try_exists(dir).await.unwrap_or(false) {
            warn!("⚠️ 图片目录不存在: {}", dir.display());
            return Ok(Vec::new());
        }

        let mut paths: Vec<(String, PathBuf)> = Vec::new();
        let mut entries = fs::read_dir(dir)
            .await
            .with_context(|| format!("无法读取图片目录: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            // 跟随符号链接
            if !fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if self.filter.accepts(&filename) {
                paths.push((filename, path));
            } else {
                debug!("跳过文件: {}", filename);
            }
        }

        paths.sort_by(|a, b| a.0.cmp(&b.0));

        let mut pages: Vec<PageImage> = paths
            .into_iter()
            .map(|(filename, path)| PageImage {
                page_number: parse_page_number(&filename),
                media_type: infer_media_type(&path),
                filename,
                path,
            })
            .collect();

        // sort_by_key 是稳定排序
        pages.sort_by_key(|p| p.page_number);

        let unnumbered = pages.iter().filter(|p| p.page_number == 0).count();
        if unnumbered > 1 {
            warn!("⚠️ 有 {} 个文件的页码为 0，它们将按文件名顺序处理", unnumbered);
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    fn names(pages: &[PageImage]) -> Vec<&str> {
        pages.iter().map(|p| p.filename.as_str()).collect()
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(parse_page_number("page_12.png"), 12);
        assert_eq!(parse_page_number("book_page_007.jpg"), 7);
        assert_eq!(parse_page_number("cover.png"), 0);
        assert_eq!(parse_page_number("page_.png"), 0);
        assert_eq!(parse_page_number("page_99999999999999999999999.png"), 0);
        assert_eq!(parse_page_number("page_18446744073709551615.png"), u64::MAX);
    }

    #[test]
    fn test_infer_media_type() {
        assert_eq!(infer_media_type(Path::new("page_1.png")), "image/png");
        assert_eq!(infer_media_type(Path::new("page_1.JPG")), "image/jpeg");
        assert_eq!(infer_media_type(Path::new("page_1")), "application/octet-stream");
    }

    #[test]
    fn test_filter_accepts() {
        assert!(PageFilter::Glob.accepts("page_1.png"));
        assert!(PageFilter::Glob.accepts("page_1.txt"));
        assert!(!PageFilter::Glob.accepts("page_1"));
        assert!(!PageFilter::Glob.accepts("cover.png"));

        assert!(PageFilter::ImageExtensions.accepts("cover.PNG"));
        assert!(PageFilter::ImageExtensions.accepts("page_3.tif"));
        assert!(!PageFilter::ImageExtensions.accepts("notes.txt"));
        assert!(!PageFilter::ImageExtensions.accepts("page_3.webp"));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("glob".parse::<PageFilter>().unwrap(), PageFilter::Glob);
        assert_eq!("Extensions".parse::<PageFilter>().unwrap(), PageFilter::ImageExtensions);
        assert!("all".parse::<PageFilter>().is_err());
    }

    #[tokio::test]
    async fn test_enumerate_sorts_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page_10.png", "page_2.png", "page_1.jpg", "notes.txt"] {
            touch(dir.path(), name);
        }

        let pages = PageEnumerator::new(PageFilter::Glob).enumerate(dir.path()).await.unwrap();

        assert_eq!(names(&pages), vec!["page_1.jpg", "page_2.png", "page_10.png"]);
        assert!(pages.windows(2).all(|w| w[0].page_number <= w[1].page_number));
        assert_eq!(pages[0].media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_enumerate_ties_keep_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["scan_b.png", "page_3.png", "scan_a.png", "page_03.tif"] {
            touch(dir.path(), name);
        }

        let pages = PageEnumerator::new(PageFilter::ImageExtensions)
            .enumerate(dir.path())
            .await
            .unwrap();

        assert_eq!(
            names(&pages),
            vec!["scan_a.png", "scan_b.png", "page_03.tif", "page_3.png"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_enumerate_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        touch(elsewhere.path(), "scan.png");
        touch(dir.path(), "page_1.png");
        std::os::unix::fs::symlink(elsewhere.path().join("scan.png"), dir.path().join("page_2.png")).unwrap();
        std::fs::create_dir(dir.path().join("page_3.d")).unwrap();

        let pages = PageEnumerator::new(PageFilter::Glob).enumerate(dir.path()).await.unwrap();

        assert_eq!(names(&pages), vec!["page_1.png", "page_2.png"]);
    }

    #[tokio::test]
    async fn test_enumerate_empty_and_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let enumerator = PageEnumerator::new(PageFilter::Glob);

        assert!(enumerator.enumerate(dir.path()).await.unwrap().is_empty());
        assert!(enumerator
            .enumerate(&dir.path().join("missing"))
            .await
            .unwrap()
            .is_empty());
    }
}
