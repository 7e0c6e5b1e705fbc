use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 无法到达 OCR 服务
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 网络层失败（连接、超时等），调用方按一次失败的尝试处理
#[derive(Debug, Error)]
#[error("请求 {endpoint} 失败 (超时: {timed_out}): {source}")]
pub struct TransportError {
    pub endpoint: String,
    pub timed_out: bool,
    #[source]
    pub source: reqwest::Error,
}

impl TransportError {
    pub fn new(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self {
            endpoint: endpoint.into(),
            timed_out: source.is_timeout(),
            source,
        }
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 复制文件失败
    #[error("复制文件失败 ({from} -> {to}): {source}")]
    CopyFailed {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件无法读取
    #[error("无法读取配置文件 {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件 TOML 解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    FileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置项取值无效
    #[error("配置项 {key} 的值 '{value}' 无效")]
    InvalidValue { key: String, value: String },
}

// ========== 便捷构造函数 ==========

impl FileError {
    pub fn read_failed(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn write_failed(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn create_dir_failed(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        FileError::CreateDirFailed {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
