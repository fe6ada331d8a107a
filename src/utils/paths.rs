use crate::core::constants::layout;
use crate::error::{AppError, AppResult};
use std::env;
use std::path::{Path, PathBuf};

/// njar 的磁盘布局
///
/// ```text
/// <root>/
///   config.toml
///   manifest.json
///   downloads/
///   versions/<version>/<archive root>/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NjarPaths {
    root: PathBuf,
}

impl NjarPaths {
    /// 以指定根目录创建布局
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 默认布局：`$NJAR_HOME`，否则 `~/.njar`
    pub fn from_env() -> AppResult<Self> {
        if let Some(home) = env::var_os(layout::HOME_ENV_VAR) {
            if !home.is_empty() {
                return Ok(Self::new(PathBuf::from(home)));
            }
        }

        let home_dir =
            dirs::home_dir().ok_or_else(|| AppError::config("无法获取用户主目录"))?;
        Ok(Self::new(home_dir.join(layout::HOME_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.root.join(layout::DOWNLOADS_DIR)
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join(layout::VERSIONS_DIR)
    }

    /// 某个版本的解压目录
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.versions_dir().join(version)
    }

    /// 安装过程中的暂存目录，校验布局后再改名为 [`Self::version_dir`]
    pub fn staging_dir(&self, version: &str) -> PathBuf {
        self.versions_dir().join(format!(".{}.partial", version))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(layout::MANIFEST_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(layout::CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = NjarPaths::new("/tmp/njar-root");
        assert_eq!(paths.root(), Path::new("/tmp/njar-root"));
        assert_eq!(paths.downloads_dir(), Path::new("/tmp/njar-root/downloads"));
        assert_eq!(paths.version_dir("16"), Path::new("/tmp/njar-root/versions/16"));
        assert_eq!(paths.staging_dir("16"), Path::new("/tmp/njar-root/versions/.16.partial"));
        assert_eq!(paths.manifest_path(), Path::new("/tmp/njar-root/manifest.json"));
        assert_eq!(paths.config_path(), Path::new("/tmp/njar-root/config.toml"));
    }
}
