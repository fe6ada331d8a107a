use crate::error::{AppError, AppResult};
use std::fmt;

/// release 服务使用的 OS / Arch 标识
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    /// 检测当前运行平台。
    pub fn current() -> AppResult<Self> {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// 把 Rust 的 `target_os` / `target_arch` 名称映射为 release 服务的命名
    pub fn from_host(os: &str, arch: &str) -> AppResult<Self> {
        let os = match os {
            "aix" => "aix",
            "macos" => "mac",
            "linux" => "linux",
            "solaris" | "illumos" => "solaris",
            "windows" => "windows",
            other => return Err(AppError::unsupported("操作系统", other)),
        };

        let arch = match arch {
            // 旧版 release 服务没有 mac 的 aarch64 构建
            _ if os == "mac" => "x64",
            "x86_64" => "x64",
            "x86" => "x32",
            "powerpc64" => "ppc64",
            "s390x" => "s390x",
            "aarch64" => "aarch64",
            other => return Err(AppError::unsupported("架构", other)),
        };

        Ok(Platform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
