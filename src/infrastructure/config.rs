use crate::core::constants::{install, network};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 配置文件结构（`<root>/config.toml`，可选）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// release 元数据服务地址
    #[serde(default = "default_registry")]
    pub registry: String,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub install: InstallConfig,
}

/// 下载配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// 单次尝试的超时时间（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// 超时后的最大尝试次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// 安装默认参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallConfig {
    #[serde(default = "default_openjdk_impl")]
    pub openjdk_impl: String,
    #[serde(default = "default_release")]
    pub release: String,
    #[serde(rename = "type", default = "default_jvm_type")]
    pub jvm_type: String,
}

fn default_registry() -> String {
    network::DEFAULT_REGISTRY.to_string()
}

fn default_timeout_ms() -> u64 {
    network::DEFAULT_ATTEMPT_TIMEOUT_MS
}

fn default_max_attempts() -> u32 {
    network::DEFAULT_MAX_ATTEMPTS
}

fn default_openjdk_impl() -> String {
    install::DEFAULT_OPENJDK_IMPL.to_string()
}

fn default_release() -> String {
    install::DEFAULT_RELEASE.to_string()
}

fn default_jvm_type() -> String {
    install::DEFAULT_JVM_TYPE.to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            openjdk_impl: default_openjdk_impl(),
            release: default_release(),
            jvm_type: default_jvm_type(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            download: DownloadConfig::default(),
            install: InstallConfig::default(),
        }
    }
}

impl DownloadConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// 从文件加载配置，文件不存在时使用默认值
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("无法读取配置文件 {}: {}", path.display(), e)))?;

        Self::parse(&content)
            .map_err(|e| AppError::config(format!("解析配置文件 {} 失败: {}", path.display(), e)))
    }

    fn parse(content: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.download.max_attempts == 0 {
            return Err("download.max_attempts 必须大于 0".to_string());
        }
        if config.download.timeout_ms == 0 {
            return Err("download.timeout_ms 必须大于 0".to_string());
        }
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("序列化配置失败: {}", e)))?;
        fs::write(path, toml_content)?;
        Ok(())
    }
}
