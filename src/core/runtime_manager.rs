use crate::core::constants::version::SYSTEM_VERSION;
use crate::environments::java::launcher::{JavaCommand, Launcher};
use crate::environments::java::locator::{HostJavaLocator, JavaLocator};
use crate::environments::java::version_store::VersionStore;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use crate::infrastructure::installer::{InstallOptions, InstallOutcome, Installer};
use crate::infrastructure::remote::fetcher::{Fetcher, ProgressCallback, RetryPolicy};
use crate::utils::paths::NjarPaths;
use crate::utils::validation::VersionArg;
use std::path::{Path, PathBuf};

/// 运行时管理器
///
/// 进程启动时创建一次，持有版本记录并串起安装与启动流程。
pub struct RuntimeManager {
    config: Config,
    store: VersionStore,
    locator: Box<dyn JavaLocator>,
    installer: Installer,
}

impl RuntimeManager {
    /// 使用宿主机探测器初始化
    pub fn bootstrap(paths: NjarPaths) -> AppResult<Self> {
        let config = Config::load(&paths.config_path())?;
        Self::with_locator(paths, config, Box::new(HostJavaLocator))
    }

    /// 读取 manifest 并登记系统 Java
    pub fn with_locator(
        paths: NjarPaths,
        config: Config,
        locator: Box<dyn JavaLocator>,
    ) -> AppResult<Self> {
        let store = VersionStore::initialize(&paths, locator.as_ref())?;
        let fetcher = Fetcher::new(RetryPolicy::from_config(&config.download))?;
        let installer = Installer::new(paths, fetcher);

        Ok(Self {
            config,
            store,
            locator,
            installer,
        })
    }

    /// 按配置生成默认安装参数
    pub fn install_options(&self) -> InstallOptions {
        InstallOptions::from_config(&self.config)
    }

    /// 安装指定主版本
    pub async fn install(
        &mut self,
        version: VersionArg,
        options: &InstallOptions,
        progress: Option<ProgressCallback<'_>>,
    ) -> AppResult<InstallOutcome> {
        let major = match version {
            VersionArg::Major(major) => major,
            VersionArg::System => {
                return Err(AppError::invalid("version", "system 无法被安装"));
            }
        };

        self.installer
            .install(&mut self.store, self.locator.as_ref(), major, options, progress)
            .await
    }

    /// 切换当前版本并保存
    pub fn use_version(&mut self, version: VersionArg) -> AppResult<()> {
        let id = version.id();
        if !self.store.contains(&id) {
            return Err(AppError::runtime_not_found(if id == SYSTEM_VERSION {
                "未发现系统 Java".to_string()
            } else {
                format!("openjdk{} 尚未安装", id)
            }));
        }
        self.store.set_current_version(&id).save()
    }

    /// 当前版本的 java 可执行文件
    pub fn which(&self) -> AppResult<PathBuf> {
        JavaCommand::current(&self.store)
    }

    pub fn versions(&self) -> Vec<String> {
        self.store.list_versions()
    }

    pub fn current_version(&self) -> &str {
        self.store.current_version()
    }

    fn launcher(&self) -> AppResult<Launcher> {
        Launcher::resolve(&self.store, self.locator.as_ref())
    }

    pub async fn run_jar(&self, jar_path: &Path, args: &[String]) -> AppResult<String> {
        self.launcher()?.run_jar(jar_path, args).await
    }

    pub async fn run_class(
        &self,
        class_name: &str,
        class_paths: &str,
        args: &[String],
    ) -> AppResult<String> {
        self.launcher()?.run_class(class_name, class_paths, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environments::java::locator::FixedJavaLocator;

    fn manager(root: &Path, system: Option<&str>) -> RuntimeManager {
        RuntimeManager::with_locator(
            NjarPaths::new(root),
            Config::default(),
            Box::new(FixedJavaLocator(system.map(PathBuf::from))),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_install_short_circuits_with_system_java() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path(), Some("/usr/lib/jvm/x"));
        let options = manager.install_options();

        let outcome = manager.install(VersionArg::Major(16), &options, None).await.unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadySatisfied);
        assert!(!dir.path().join("downloads").exists());
    }

    #[tokio::test]
    async fn test_install_system_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path(), None);
        let options = manager.install_options();

        assert!(matches!(
            manager.install(VersionArg::System, &options, None).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_use_requires_installed_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path(), Some("/usr/lib/jvm/x"));

        assert!(manager.use_version(VersionArg::Major(16)).is_err());
        assert_eq!(manager.current_version(), "system");

        manager.use_version(VersionArg::System).unwrap();
        let reloaded = self::manager(dir.path(), Some("/usr/lib/jvm/x"));
        assert_eq!(reloaded.current_version(), "system");
        assert_eq!(reloaded.versions(), vec!["system"]);
    }

    #[test]
    fn test_which_without_any_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), None);
        assert!(matches!(manager.which(), Err(AppError::RuntimeNotFound { .. })));
    }
}
