use super::locator::{java_binary_relative, java_home_relative};
use crate::error::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// 已解压的某个版本的运行时
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInstallation {
    pub version: String,
    /// 压缩包中唯一的顶层目录
    pub root: PathBuf,
}

impl RuntimeInstallation {
    /// 在版本目录中定位唯一的顶层目录，忽略 macOS 的 `._*` 元数据文件
    pub fn locate(version: &str, version_dir: &Path) -> AppResult<Self> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(version_dir)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with("._") {
                continue;
            }
            entries.push(entry.path());
        }

        match entries.as_slice() {
            [root] if root.is_dir() => Ok(Self {
                version: version.to_string(),
                root: root.clone(),
            }),
            [] => Err(AppError::runtime_not_found(format!(
                "{} 中没有解压出任何内容",
                version_dir.display()
            ))),
            _ => Err(AppError::runtime_not_found(format!(
                "{} 的目录结构无法识别，请重新安装 openjdk{}",
                version_dir.display(),
                version
            ))),
        }
    }

    /// JAVA_HOME（macOS 下为 `<root>/Contents/Home`）
    pub fn java_home(&self) -> PathBuf {
        let relative = java_home_relative();
        if relative.as_os_str().is_empty() {
            // 空路径 join 会追加多余的分隔符
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    pub fn executable(&self) -> PathBuf {
        self.java_home().join(java_binary_relative())
    }
}
