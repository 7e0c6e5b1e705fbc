use crate::error::{AppResult, ConfigError};
use crate::services::page_enumerator::PageFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// OCR 服务根地址（以 `/` 结尾）
    pub base_url: String,
    /// 表单字段 `lang`
    pub lang: String,
    /// 表单字段 `service`（OCR 引擎）
    pub service: String,
    /// 图片所在的表单字段名
    pub file_field: String,
    /// 单次请求超时
    pub request_timeout: Duration,
    /// 预热 GET 的超时
    pub bootstrap_timeout: Duration,
    /// 每页最多尝试次数
    pub max_retries: u32,
    /// 两次尝试之间的等待
    pub retry_delay: Duration,
    /// 两页之间的等待
    pub page_delay: Duration,
    pub image_dir: PathBuf,
    pub output_dir: PathBuf,
    pub failed_dir: PathBuf,
    /// 合并结果文件名（位于 output_dir 下）
    pub output_file: String,
    /// 页面筛选方式
    pub page_filter: PageFilter,
    pub user_agent: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://ocr.sanskritdictionary.com/".to_string(),
            lang: "san".to_string(),
            service: "google".to_string(),
            file_field: "image".to_string(),
            request_timeout: Duration::from_secs(60),
            bootstrap_timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            page_delay: Duration::from_secs(5),
            image_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("results"),
            failed_dir: PathBuf::from("failed"),
            output_file: "all_pages.txt".to_string(),
            page_filter: PageFilter::Glob,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36"
                .to_string(),
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有键均可省略
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    lang: Option<String>,
    service: Option<String>,
    file_field: Option<String>,
    request_timeout_secs: Option<u64>,
    bootstrap_timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    retry_delay_secs: Option<u64>,
    page_delay_secs: Option<u64>,
    image_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    failed_dir: Option<PathBuf>,
    output_file: Option<String>,
    page_filter: Option<String>,
    user_agent: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 从环境变量加载，未设置或无法解析时使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 在当前配置之上叠加环境变量
    pub fn with_env_overrides(self) -> Self {
        let secs = |name: &str, default: Duration| {
            std::env::var(name).ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(default)
        };
        let path = |name: &str, default: PathBuf| std::env::var(name).map(PathBuf::from).unwrap_or(default);

        let config = Self {
            base_url: std::env::var("OCR_BASE_URL").unwrap_or(self.base_url),
            lang: std::env::var("OCR_LANG").unwrap_or(self.lang),
            service: std::env::var("OCR_SERVICE").unwrap_or(self.service),
            file_field: std::env::var("OCR_FILE_FIELD").unwrap_or(self.file_field),
            request_timeout: secs("OCR_REQUEST_TIMEOUT_SECS", self.request_timeout),
            bootstrap_timeout: secs("OCR_BOOTSTRAP_TIMEOUT_SECS", self.bootstrap_timeout),
            max_retries: std::env::var("OCR_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_retries),
            retry_delay: secs("OCR_RETRY_DELAY_SECS", self.retry_delay),
            page_delay: secs("OCR_PAGE_DELAY_SECS", self.page_delay),
            image_dir: path("OCR_IMAGE_DIR", self.image_dir),
            output_dir: path("OCR_OUTPUT_DIR", self.output_dir),
            failed_dir: path("OCR_FAILED_DIR", self.failed_dir),
            output_file: std::env::var("OCR_OUTPUT_FILE").unwrap_or(self.output_file),
            page_filter: std::env::var("OCR_PAGE_FILTER").ok().and_then(|v| v.parse().ok()).unwrap_or(self.page_filter),
            user_agent: std::env::var("OCR_USER_AGENT").unwrap_or(self.user_agent),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        };
        config.normalized()
    }

    /// 从 TOML 文件加载，文件中缺失的键使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::FileParseFailed { source, .. } => ConfigError::FileParseFailed {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(|source| ConfigError::FileParseFailed {
            path: String::new(),
            source,
        })?;

        let default = Self::default();
        let page_filter = match file.page_filter {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "page_filter".to_string(),
                value: raw,
            })?,
            None => default.page_filter,
        };

        let config = Self {
            base_url: file.base_url.unwrap_or(default.base_url),
            lang: file.lang.unwrap_or(default.lang),
            service: file.service.unwrap_or(default.service),
            file_field: file.file_field.unwrap_or(default.file_field),
            request_timeout: file.request_timeout_secs.map(Duration::from_secs).unwrap_or(default.request_timeout),
            bootstrap_timeout: file.bootstrap_timeout_secs.map(Duration::from_secs).unwrap_or(default.bootstrap_timeout),
            max_retries: file.max_retries.unwrap_or(default.max_retries),
            retry_delay: file.retry_delay_secs.map(Duration::from_secs).unwrap_or(default.retry_delay),
            page_delay: file.page_delay_secs.map(Duration::from_secs).unwrap_or(default.page_delay),
            image_dir: file.image_dir.unwrap_or(default.image_dir),
            output_dir: file.output_dir.unwrap_or(default.output_dir),
            failed_dir: file.failed_dir.unwrap_or(default.failed_dir),
            output_file: file.output_file.unwrap_or(default.output_file),
            page_filter,
            user_agent: file.user_agent.unwrap_or(default.user_agent),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        };
        Ok(config.normalized())
    }

    /// 程序入口使用的加载顺序：`OCR_CONFIG` 指定的 TOML 文件（可选），再叠加环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("OCR_CONFIG") {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// OCR 接口地址：`<base>/recognise`
    pub fn recognise_url(&self) -> String {
        format!("{}/recognise", self.base_url.trim_end_matches('/'))
    }

    /// 合并结果文件的完整路径
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    // 至少尝试一次
    fn normalized(mut self) -> Self {
        self.max_retries = self.max_retries.max(1);
        self
    }
}
