use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// java 可执行文件相对 JAVA_HOME 的路径
pub fn java_binary_relative() -> PathBuf {
    if cfg!(target_os = "windows") {
        Path::new("bin").join("java.exe")
    } else {
        Path::new("bin").join("java")
    }
}

/// 运行时目录内 JAVA_HOME 的相对位置（macOS 包含 `Contents/Home`）
pub fn java_home_relative() -> PathBuf {
    if cfg!(target_os = "macos") {
        Path::new("Contents").join("Home")
    } else {
        PathBuf::new()
    }
}

/// 验证 JAVA_HOME 路径是否有效
pub fn validate_java_home(java_home: &Path) -> bool {
    java_home.is_dir() && java_home.join(java_binary_relative()).is_file()
}

/// 发现宿主机上已有 Java 的方式，便于测试时替换
pub trait JavaLocator: Send + Sync {
    /// 返回系统 Java 的 JAVA_HOME
    fn system_java_home(&self) -> Option<PathBuf>;

    fn system_java_exists(&self) -> bool {
        self.system_java_home().is_some()
    }
}

/// 依次检查 `JAVA_HOME`、`PATH` 中的 java，以及 macOS 的 `/usr/libexec/java_home`
#[derive(Debug, Default, Clone, Copy)]
pub struct HostJavaLocator;

impl HostJavaLocator {
    fn from_java_home_env() -> Option<PathBuf> {
        let home = PathBuf::from(env::var_os("JAVA_HOME")?);
        validate_java_home(&home).then_some(home)
    }

    fn from_path() -> Option<PathBuf> {
        let java = which::which("java").ok()?;
        // /usr/bin/java 通常是指向真实安装的符号链接
        let java = java.canonicalize().unwrap_or(java);
        let home = java.parent()?.parent()?.to_path_buf();
        validate_java_home(&home).then_some(home)
    }

    #[cfg(target_os = "macos")]
    fn from_libexec() -> Option<PathBuf> {
        let output = std::process::Command::new("/usr/libexec/java_home").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let home = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        validate_java_home(&home).then_some(home)
    }

    #[cfg(not(target_os = "macos"))]
    fn from_libexec() -> Option<PathBuf> {
        None
    }
}

impl JavaLocator for HostJavaLocator {
    fn system_java_home(&self) -> Option<PathBuf> {
        let home = Self::from_java_home_env()
            .or_else(Self::from_path)
            .or_else(Self::from_libexec);
        debug!(?home, "系统 Java 探测结果");
        home
    }
}

/// 固定结果的探测器
#[derive(Debug, Default, Clone)]
pub struct FixedJavaLocator(pub Option<PathBuf>);

impl JavaLocator for FixedJavaLocator {
    fn system_java_home(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_java_home_invalid_path() {
        assert!(!validate_java_home(Path::new("/nonexistent/path")));
    }

    #[test]
    fn test_validate_java_home() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!validate_java_home(dir.path()));

        let binary = dir.path().join(java_binary_relative());
        std::fs::create_dir_all(binary.parent().unwrap()).unwrap();
        std::fs::write(&binary, b"").unwrap();
        assert!(validate_java_home(dir.path()));
    }

    #[test]
    fn test_binary_relative_path() {
        let relative = java_binary_relative();
        if cfg!(target_os = "windows") {
            assert!(relative.ends_with("java.exe"));
        } else {
            assert_eq!(relative, Path::new("bin/java"));
        }
    }

    #[test]
    fn test_fixed_locator() {
        assert!(!FixedJavaLocator(None).system_java_exists());
        let locator = FixedJavaLocator(Some(PathBuf::from("/usr/lib/jvm/x")));
        assert_eq!(locator.system_java_home(), Some(PathBuf::from("/usr/lib/jvm/x")));
    }
}
