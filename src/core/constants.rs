//! 应用程序常量定义
//!
//! 本模块包含全局使用的常量，避免魔数并提供统一的配置值。

/// 网络相关常量
pub mod network {
    /// 默认 release 元数据服务
    pub const DEFAULT_REGISTRY: &str = "https://api.adoptopenjdk.net";
    /// 单次请求的超时时间（毫秒）
    pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 3000;
    /// 超时后的最大尝试次数（含第一次）
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
    /// 进度事件的最小间隔（毫秒）
    pub const PROGRESS_INTERVAL_MS: u64 = 100;
    /// 请求头中的 User-Agent
    pub const USER_AGENT: &str = concat!("njar/", env!("CARGO_PKG_VERSION"));
}

/// 安装相关常量
pub mod install {
    pub const DEFAULT_OPENJDK_IMPL: &str = "hotspot";
    pub const DEFAULT_RELEASE: &str = "latest";
    pub const DEFAULT_JVM_TYPE: &str = "jre";
}

/// 文件系统布局
pub mod layout {
    /// 默认根目录名（位于用户主目录下）
    pub const HOME_DIR_NAME: &str = ".njar";
    /// 覆盖根目录的环境变量
    pub const HOME_ENV_VAR: &str = "NJAR_HOME";
    pub const DOWNLOADS_DIR: &str = "downloads";
    pub const VERSIONS_DIR: &str = "versions";
    pub const MANIFEST_FILE: &str = "manifest.json";
    pub const CONFIG_FILE: &str = "config.toml";
}

/// 版本标识相关常量
pub mod version {
    /// 系统已有 Java 的保留标识
    pub const SYSTEM_VERSION: &str = "system";
    /// 合法版本参数
    pub const VERSION_PATTERN: &str = r"^(\d+|system)$";
}

/// 日志相关常量
pub mod log {
    /// 默认日志级别
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
    /// 备用日志过滤环境变量
    pub const LOG_ENV_VAR: &str = "NJAR_LOG";
}
