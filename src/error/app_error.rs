use std::io;
use std::path::Path;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("配置错误: {message}")]
    Config { message: String },

    #[error("网络错误: {message}")]
    Network { message: String },

    #[error("服务器返回状态码 {status} (URL: {url})")]
    HttpStatus { url: String, status: u16 },

    #[error("请求超时，已尝试 {attempts} 次 (URL: {url})")]
    Timeout { url: String, attempts: u32 },

    #[error("文件与校验和不匹配: {file} (期望 {expected}, 实际 {actual})")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("解压失败: {archive} ({failed}/{total} 个条目出错)")]
    Extraction {
        archive: String,
        failed: usize,
        total: usize,
    },

    #[error("未找到可用的 Java 运行时: {message}")]
    RuntimeNotFound { message: String },

    #[error("{0}")]
    ProcessStderr(String),

    #[error("验证错误: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("不支持的{what}: {value}")]
    UnsupportedPlatform { what: String, value: String },
}

/// 用于提供错误上下文和用户友好建议
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub suggestions: Vec<String>,
}

/// 带有上下文的错误
#[derive(Error, Debug)]
pub struct ContextualError {
    #[source]
    pub error: AppError,
    pub context: ErrorContext,
}

impl std::fmt::Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "操作失败: {}\n错误: {}", self.context.operation, self.error)
    }
}

impl AppError {
    /// 为错误添加上下文信息，并根据错误类型附带建议
    pub fn with_context(self, operation: &str) -> ContextualError {
        let suggestions = self.suggestions();
        ContextualError {
            error: self,
            context: ErrorContext {
                operation: operation.to_string(),
                suggestions,
            },
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            AppError::Timeout { .. } | AppError::Network { .. } => vec![
                "检查网络连接或代理设置".to_string(),
                "在 config.toml 中调大 download.timeout_ms".to_string(),
            ],
            AppError::ChecksumMismatch { .. } => {
                vec!["删除 downloads 目录下的文件后重新安装".to_string()]
            }
            AppError::RuntimeNotFound { .. } => vec![
                "运行 'njar install <version>' 安装运行时".to_string(),
                "运行 'njar use <version>' 选择已安装的版本".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

impl ContextualError {
    /// 获取用户友好的错误消息
    pub fn user_message(&self) -> String {
        let mut msg = format!("❌ {}\n", self.context.operation);
        msg.push_str(&format!("原因: {}\n", self.error));

        if !self.context.suggestions.is_empty() {
            msg.push_str("💡 建议:\n");
            for suggestion in &self.context.suggestions {
                msg.push_str(&format!("  • {}\n", suggestion));
            }
        }

        msg
    }
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

/// 便捷的错误创建函数
impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn runtime_not_found(message: impl Into<String>) -> Self {
        Self::RuntimeNotFound {
            message: message.into(),
        }
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(what: &str, value: &str) -> Self {
        Self::UnsupportedPlatform {
            what: what.to_string(),
            value: value.to_string(),
        }
    }

    pub fn extraction(archive: &Path, failed: usize, total: usize) -> Self {
        Self::Extraction {
            archive: archive.display().to_string(),
            failed,
            total,
        }
    }
}

impl From<AppError> for ContextualError {
    fn from(error: AppError) -> Self {
        error.with_context("未知操作")
    }
}

impl From<ContextualError> for String {
    fn from(error: ContextualError) -> Self {
        error.user_message()
    }
}
