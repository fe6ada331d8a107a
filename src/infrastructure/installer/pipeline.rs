use super::extractor::ArchiveJob;
use super::verifier;
use crate::environments::java::installation::RuntimeInstallation;
use crate::environments::java::locator::JavaLocator;
use crate::environments::java::version_store::VersionStore;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use crate::infrastructure::remote::fetcher::{Fetcher, ProgressCallback};
use crate::infrastructure::remote::platform::Platform;
use crate::infrastructure::remote::release_api::{parse_checksum_text, ReleaseInfo, ReleaseQuery};
use crate::utils::paths::NjarPaths;
use std::path::Path;
use tracing::{error, info, warn};

/// 安装参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    pub openjdk_impl: String,
    pub release: String,
    pub jvm_type: String,
    /// 为 true 且存在系统 Java 时跳过下载
    pub allow_system_java: bool,
    /// 覆盖自动检测的操作系统
    pub os: Option<String>,
    /// 覆盖自动检测的架构
    pub arch: Option<String>,
    pub registry: String,
}

impl InstallOptions {
    /// 从配置创建安装参数
    pub fn from_config(config: &Config) -> Self {
        Self {
            openjdk_impl: config.install.openjdk_impl.clone(),
            release: config.install.release.clone(),
            jvm_type: config.install.jvm_type.clone(),
            allow_system_java: true,
            os: None,
            arch: None,
            registry: config.registry.clone(),
        }
    }

    pub fn platform(&self) -> AppResult<Platform> {
        match (&self.os, &self.arch) {
            (Some(os), Some(arch)) => Ok(Platform {
                os: os.clone(),
                arch: arch.clone(),
            }),
            (os, arch) => {
                let detected = Platform::current()?;
                Ok(Platform {
                    os: os.clone().unwrap_or(detected.os),
                    arch: arch.clone().unwrap_or(detected.arch),
                })
            }
        }
    }
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 安装结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// 已有系统 Java，未执行下载
    AlreadySatisfied,
    Installed(RuntimeInstallation),
}

/// 获取并登记运行时：元数据 → 下载 → 校验 → 解压 → 记录
#[derive(Debug, Clone)]
pub struct Installer {
    paths: NjarPaths,
    fetcher: Fetcher,
}

impl Installer {
    pub fn new(paths: NjarPaths, fetcher: Fetcher) -> Self {
        Self { paths, fetcher }
    }

    /// 安装 openjdk{major_version}。
    ///
    /// 只有全部步骤成功后才写入版本记录；当前版本为空时顺带选中新版本。
    pub async fn install(
        &self,
        store: &mut VersionStore,
        locator: &dyn JavaLocator,
        major_version: u32,
        options: &InstallOptions,
        progress: Option<ProgressCallback<'_>>,
    ) -> AppResult<InstallOutcome> {
        if options.allow_system_java && locator.system_java_exists() {
            info!("已存在系统 Java，跳过 openjdk{} 的下载", major_version);
            return Ok(InstallOutcome::AlreadySatisfied);
        }

        let query = ReleaseQuery {
            registry: options.registry.clone(),
            major_version,
            openjdk_impl: options.openjdk_impl.clone(),
            release: options.release.clone(),
            jvm_type: options.jvm_type.clone(),
            platform: options.platform()?,
        };
        let release: ReleaseInfo = self.fetcher.fetch_json(&query.url()?).await?;
        let binary = release.first_binary()?;

        let downloads = self.paths.downloads_dir();
        let binary_file = self
            .fetcher
            .download(&binary.binary_link, &downloads, progress)
            .await?;
        let checksum_file = self
            .fetcher
            .download(&binary.checksum_link, &downloads, progress)
            .await?;

        info!("Verify...");
        let checksum_text = tokio::fs::read_to_string(&checksum_file).await?;
        let expected = parse_checksum_text(&checksum_text)
            .ok_or_else(|| AppError::invalid("checksum", format!("{} 为空", checksum_file.display())))?;
        if !verifier::verify(&binary_file, &expected).await {
            let actual = verifier::compute_digest(&binary_file)
                .await
                .unwrap_or_else(|_| "<unreadable>".to_string());
            error!("File and checksum don't match");
            return Err(AppError::ChecksumMismatch {
                file: binary_file.display().to_string(),
                expected,
                actual,
            });
        }

        let version = major_version.to_string();
        let installation = self.replace_version_dir(&version, &binary_file).await?;
        store.set(&version, installation.java_home());
        if store.current_version().is_empty() {
            store.set_current_version(&version);
        }
        store.save()?;

        info!(
            version = %version,
            home = %installation.java_home().display(),
            "openjdk{} 安装完成",
            major_version
        );
        Ok(InstallOutcome::Installed(installation))
    }

    /// 先解压到暂存目录并确认布局，成功后才替换 `versions/<id>`。
    ///
    /// 失败时暂存目录被清理，已登记的旧版本目录保持不变。
    async fn replace_version_dir(
        &self,
        version: &str,
        binary_file: &Path,
    ) -> AppResult<RuntimeInstallation> {
        let staging_dir = self.paths.staging_dir(version);
        if staging_dir.exists() {
            tokio::fs::remove_dir_all(&staging_dir).await?;
        }

        let staged = async {
            ArchiveJob::new(binary_file, &staging_dir).run_blocking().await?;
            RuntimeInstallation::locate(version, &staging_dir)
        }
        .await;
        if let Err(e) = staged {
            if let Err(cleanup) = tokio::fs::remove_dir_all(&staging_dir).await {
                warn!(dir = %staging_dir.display(), "清理暂存目录失败: {}", cleanup);
            }
            return Err(e);
        }

        let version_dir = self.paths.version_dir(version);
        if version_dir.exists() {
            tokio::fs::remove_dir_all(&version_dir).await?;
        }
        tokio::fs::rename(&staging_dir, &version_dir).await?;
        RuntimeInstallation::locate(version, &version_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.install.jvm_type = "jdk".to_string();
        config.registry = "http://mirror.local".to_string();

        let options = InstallOptions::from_config(&config);
        assert_eq!(options.jvm_type, "jdk");
        assert_eq!(options.registry, "http://mirror.local");
        assert!(options.allow_system_java);
    }

    #[test]
    fn test_platform_override() {
        let options = InstallOptions {
            os: Some("linux".to_string()),
            arch: Some("x64".to_string()),
            ..InstallOptions::default()
        };
        assert_eq!(options.platform().unwrap().to_string(), "linux-x64");
    }
}
